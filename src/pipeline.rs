use crate::browser::SharedBrowser;
use crate::config::WatchConfig;
use crate::error::Result;
use crate::form::{FetchedPage, fetch_schedule_markup};
use crate::notify::{LogNotifier, Notifier};
use crate::schedule::{ExtractionSource, MergedPeriod, ProcessedSchedule, extract_in, should_notify};
use crate::store::ScheduleStore;
use std::time::Instant;

/// What one cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Number of outage cells extracted
    pub cells: usize,
    pub periods: Vec<MergedPeriod>,
    pub source: ExtractionSource,
    /// Whether at least one notifier accepted the schedule
    pub notified: bool,
    /// Whether the schedule differed from the snapshot and replaced it
    pub snapshot_written: bool,
}

/// Runs fetch → extract → persist → merge → compare → notify cycles for one address.
///
/// Owns the shared browser and the snapshot; cycles take `&mut self`, so at
/// most one is ever in flight.
pub struct Watcher {
    config: WatchConfig,
    browser: SharedBrowser,
    store: ScheduleStore,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl Watcher {
    /// Create a watcher with the notifiers the configuration enables.
    ///
    /// The browser is not started until the first cycle.
    pub fn new(config: WatchConfig) -> Self {
        let notifiers = default_notifiers(&config);
        Self::with_notifiers(config, notifiers)
    }

    pub fn with_notifiers(config: WatchConfig, notifiers: Vec<Box<dyn Notifier>>) -> Self {
        Self {
            browser: SharedBrowser::new(config.browser.clone()),
            store: ScheduleStore::new(&config.storage_path, &config.snapshot_path),
            notifiers,
            config,
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    /// Run one full cycle against the live page
    pub fn run_cycle(&mut self) -> Result<CycleOutcome> {
        let started = Instant::now();
        log::info!("Starting cycle for {}", self.config.address.describe());

        let page = self.fetch()?;
        let outcome = self.process_markup(&page.html)?;

        log::info!(
            "Cycle complete in {:.1}s: {} outage cells, {} periods, notified: {}",
            started.elapsed().as_secs_f64(),
            outcome.cells,
            outcome.periods.len(),
            outcome.notified
        );
        Ok(outcome)
    }

    fn fetch(&mut self) -> Result<FetchedPage> {
        let config = &self.config;
        let result = self.browser.acquire().and_then(|session| {
            fetch_schedule_markup(
                session,
                &config.base_url,
                &config.address,
                &config.form,
                &config.user_agent,
                config.request_timeout,
            )
        });

        if let Err(e) = &result {
            if e.is_browser_failure() {
                self.browser.invalidate();
            }
        }
        result
    }

    /// Everything after the page was captured: extract, persist, compare and notify
    pub fn process_markup(&mut self, markup: &str) -> Result<CycleOutcome> {
        let extraction = extract_in(markup, &self.config.address, self.config.timezone);
        let source = extraction.source;
        let record = extraction.into_record();

        self.store.save_schedule(&record)?;
        log::info!("Stored {} outage cells at {}", record.outages.len(), self.store.schedule_path().display());

        let schedule = record.process();
        let snapshot = self.store.load_snapshot().unwrap_or_else(|e| {
            log::warn!("Could not read last notified schedule: {}", e);
            None
        });

        let mut outcome = CycleOutcome {
            cells: record.outages.len(),
            periods: schedule.periods.clone(),
            source,
            notified: false,
            snapshot_written: false,
        };

        if !should_notify(&schedule, snapshot.as_ref()) {
            log::info!("Schedule unchanged, skipping notification");
            return Ok(outcome);
        }

        log::info!("Schedule changed, notifying");
        outcome.notified = self.notify(&schedule);

        self.store.save_snapshot(&schedule)?;
        outcome.snapshot_written = true;

        Ok(outcome)
    }

    /// Deliver through every notifier; returns whether any of them succeeded
    fn notify(&self, schedule: &ProcessedSchedule) -> bool {
        let mut any_delivered = false;
        for notifier in &self.notifiers {
            let delivery = notifier.deliver(schedule);
            if delivery.delivered {
                any_delivered = true;
            } else {
                log::error!(
                    "Notifier {} failed: {}",
                    notifier.name(),
                    delivery.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        any_delivered
    }

    /// The stored schedule record merged into periods; `None` before the first cycle
    pub fn stored_schedule(&self) -> Result<Option<ProcessedSchedule>> {
        Ok(self.store.load_schedule()?.map(|record| record.process()))
    }

    /// Deliver the stored schedule through every notifier, whatever the snapshot says.
    ///
    /// Returns whether any notifier accepted it. The snapshot is left untouched.
    pub fn resend_stored(&self) -> Result<bool> {
        match self.stored_schedule()? {
            Some(schedule) => Ok(self.notify(&schedule)),
            None => {
                log::warn!("No stored schedule at {}", self.store.schedule_path().display());
                Ok(false)
            }
        }
    }

    /// Close the shared browser
    pub fn shutdown(&mut self) {
        self.browser.shutdown();
    }
}

fn default_notifiers(config: &WatchConfig) -> Vec<Box<dyn Notifier>> {
    let mut notifiers: Vec<Box<dyn Notifier>> = Vec::new();

    match &config.telegram {
        #[cfg(feature = "telegram")]
        Some(telegram) => {
            notifiers.push(Box::new(crate::notify::TelegramNotifier::new(telegram.clone(), config.request_timeout)));
        }
        #[cfg(not(feature = "telegram"))]
        Some(_) => log::warn!("Telegram is configured but this build has no telegram support"),
        None => log::warn!("Telegram not configured, changes will only be logged"),
    }

    if notifiers.is_empty() {
        notifiers.push(Box::new(LogNotifier));
    }
    notifiers
}
