//! # outage-watch
//!
//! Watches a power outage schedule published behind a JavaScript-driven address form,
//! using Chrome DevTools Protocol (CDP) through `headless_chrome`.
//!
//! ## Features
//!
//! - **Form Automation**: Fills the cascading city → street → building form, coping with
//!   disabled fields, asynchronous autocomplete lists and a blocking modal
//! - **Schedule Extraction**: Reads half-hour outage cells from the rendered table, with a JSON fallback
//! - **Period Merging**: Turns cells into contiguous `HH:MM` periods per date
//! - **Change Detection**: Notifies only when the schedule differs from the last notified one
//! - **Notification**: Telegram Bot API delivery (requires the `telegram` feature) or the log
//!
//! ## Running the Watcher
//!
//! ```bash
//! # Check every 15 minutes
//! ADDRESS_CITY="м. Київ" ADDRESS_STREET="вул. Хрещатик" ADDRESS_BUILDING="1" cargo run
//!
//! # One cycle with a visible browser (useful for debugging)
//! cargo run -- --city "м. Київ" --once --headed
//! ```
//!
//! ## Library Usage
//!
//! ### One Watch Cycle
//!
//! ```rust,no_run
//! use outage_watch::{AddressQuery, WatchConfig, Watcher};
//!
//! # fn main() -> outage_watch::Result<()> {
//! let address = AddressQuery::new("м. Київ").with_street("вул. Хрещатик").with_building("1");
//! let config = WatchConfig::new(address).with_storage_path("data/schedules.json");
//!
//! let mut watcher = Watcher::new(config);
//! let outcome = watcher.run_cycle()?;
//! println!("{} periods, notified: {}", outcome.periods.len(), outcome.notified);
//!
//! watcher.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! ### Offline Extraction
//!
//! ```rust
//! use outage_watch::{AddressQuery, extract};
//!
//! let html = r#"<div id="discon-fact"><table>
//!     <thead><tr><th></th><th>08-09</th><th>09-10</th></tr></thead>
//!     <tbody><tr><td>today</td><td class="cell-scheduled"></td><td class="cell-first-half"></td></tr></tbody>
//! </table></div>"#;
//!
//! let schedule = extract(html, &AddressQuery::new("Kyiv")).into_record().process();
//! assert_eq!(schedule.periods[0].start_time, "08:00");
//! assert_eq!(schedule.periods[0].end_time, "09:30");
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management and configuration
//! - [`form`]: The address form state machine and the page operations it drives
//! - [`schedule`]: Cell classification, extraction, merging and change detection
//! - [`store`]: JSON persistence of the schedule record and the notified snapshot
//! - [`notify`]: Message rendering and notification channels
//! - [`pipeline`]: The watch cycle tying everything together
//! - [`config`]: Watcher configuration
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod config;
pub mod error;
pub mod form;
pub mod notify;
pub mod pipeline;
pub mod schedule;
pub mod store;

pub use browser::{BrowserSession, BrowserSource, ConnectionOptions, LaunchOptions};
pub use config::{TelegramConfig, WatchConfig};
pub use error::{Result, WatchError};
pub use form::{FormController, FormReport, FormSettings, fetch_schedule_markup};
pub use notify::{Delivery, LogNotifier, Notifier, render_message};
pub use pipeline::{CycleOutcome, Watcher};
pub use schedule::{
    AddressQuery, CellClassification, CellRecord, DEFAULT_TIMEZONE, MergedPeriod, PersistedSchedule, ProcessedSchedule,
    extract, extract_in, merge_cells, schedules_equal, should_notify,
};
pub use store::ScheduleStore;

#[cfg(feature = "telegram")]
pub use notify::TelegramNotifier;
