use crate::browser::await_condition;
use crate::error::Result;
use crate::form::page::FormPage;
use crate::form::settings::{AddressField, FormSettings};
use crate::schedule::AddressQuery;
use std::time::Duration;

/// How the autocomplete choice was confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    /// Native click on the first suggestion
    Click,
    /// Click dispatched from inside the page
    DomClick,
    /// ArrowDown + Enter
    Keyboard,
}

/// What happened while filling one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: AddressField,
    pub interactable: bool,
    pub enabled_in_time: bool,
    pub force_enabled: bool,
    pub filled: bool,
    pub suggestions_visible: bool,
    /// `None` when even the keyboard fallback could not be sent
    pub selection: Option<SelectionMethod>,
}

impl FieldOutcome {
    fn new(field: AddressField) -> Self {
        Self {
            field,
            interactable: false,
            enabled_in_time: false,
            force_enabled: false,
            filled: false,
            suggestions_visible: false,
            selection: None,
        }
    }

    /// Whether every step succeeded on its primary path
    pub fn is_clean(&self) -> bool {
        self.interactable
            && self.enabled_in_time
            && self.filled
            && self.suggestions_visible
            && matches!(self.selection, Some(SelectionMethod::Click | SelectionMethod::DomClick))
    }
}

/// Soft-failure record of one pass through the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormReport {
    pub modal_dismissed: bool,
    pub fields: Vec<FieldOutcome>,
    /// Fields left out because the query has no value for them
    pub skipped: Vec<AddressField>,
    pub schedule_rendered: bool,
}

impl FormReport {
    /// Whether the rendered schedule may be less precise than requested
    pub fn is_degraded(&self) -> bool {
        !self.skipped.is_empty() || !self.schedule_rendered || self.fields.iter().any(|f| !f.is_clean())
    }

    pub fn outcome(&self, field: AddressField) -> Option<&FieldOutcome> {
        self.fields.iter().find(|f| f.field == field)
    }
}

/// Drives the cascading address form: city, then street, then building.
///
/// Every wait is bounded and every failure is soft: the controller logs it,
/// records it in the [`FormReport`] and moves on to the next step.
pub struct FormController<'a, P: FormPage + ?Sized> {
    page: &'a P,
    settings: &'a FormSettings,
}

impl<'a, P: FormPage + ?Sized> FormController<'a, P> {
    pub fn new(page: &'a P, settings: &'a FormSettings) -> Self {
        Self { page, settings }
    }

    /// Fill the form for `address` and wait for the schedule to render
    pub fn run(&self, address: &AddressQuery) -> FormReport {
        let mut report = FormReport { modal_dismissed: self.dismiss_modal(), ..Default::default() };

        for field in AddressField::ORDER {
            match field_value(address, field) {
                Some(value) => report.fields.push(self.fill_field(field, value)),
                None => {
                    log::warn!("No {} configured; the schedule may be less precise", field.name());
                    report.skipped.push(field);
                }
            }
        }

        report.schedule_rendered = self.await_schedule();
        report
    }

    /// Close the blocking modal if it shows up. Runs once, before the first field.
    fn dismiss_modal(&self) -> bool {
        let timings = &self.settings.timings;
        let closers = &self.settings.modal_close_selectors;
        let any_visible = |page: &P| -> Result<bool> {
            for selector in closers {
                if page.is_visible(selector)? {
                    return Ok(true);
                }
            }
            Ok(false)
        };

        if !self.wait_for(timings.modal_appear, any_visible) {
            log::debug!("No modal dialog appeared");
            return false;
        }

        match self.page.click_first_visible(closers) {
            Ok(true) => {}
            Ok(false) => {
                log::warn!("Modal close button vanished before it could be clicked");
                return false;
            }
            Err(e) => {
                log::warn!("Failed to click modal close button: {}", e);
                return false;
            }
        }

        let gone = self.wait_for(timings.modal_dismiss, |page| any_visible(page).map(|visible| !visible));
        if gone {
            log::debug!("Modal dialog dismissed");
        } else {
            log::warn!("Modal dialog still visible after closing it, continuing");
        }
        true
    }

    fn fill_field(&self, field: AddressField, value: &str) -> FieldOutcome {
        let timings = &self.settings.timings;
        let selector = self.settings.selector(field);
        let list = self.settings.suggestion_list(field);
        let mut outcome = FieldOutcome::new(field);

        log::debug!("Filling {} ({}) with '{}'", field.name(), selector, value);

        outcome.interactable = self.wait_for(timings.field_interactable, |page| page.is_visible(selector));
        if !outcome.interactable {
            log::warn!("Field {} not visible in time, continuing", selector);
        }

        outcome.enabled_in_time = self.wait_for(timings.field_enabled, |page| page.is_enabled(selector));
        if !outcome.enabled_in_time {
            log::warn!("Field {} did not become enabled, forcing it", selector);
            match self.page.force_enable(selector) {
                Ok(()) => outcome.force_enabled = true,
                Err(e) => log::warn!("Could not force-enable {}: {}", selector, e),
            }
        }

        if let Err(e) = self.page.focus_and_clear(selector) {
            log::warn!("Could not clear {}: {}", selector, e);
        }
        match self.page.set_value(selector, value) {
            Ok(()) => outcome.filled = true,
            Err(e) => log::warn!("Could not set value of {}: {}", selector, e),
        }

        outcome.suggestions_visible = self.wait_for(timings.suggestions, |page| page.suggestions_ready(&list));
        if outcome.suggestions_visible {
            outcome.selection = self.select_first_suggestion(field, &list);
        } else {
            log::warn!("Suggestion list {} did not appear for {}, using keyboard", list, selector);
        }

        if outcome.selection.is_none() {
            outcome.selection = self.keyboard_select(selector);
        }

        pause(timings.settle);
        outcome
    }

    fn select_first_suggestion(&self, field: AddressField, list: &str) -> Option<SelectionMethod> {
        let item = self.settings.first_suggestion(field);

        match self.page.click(&item) {
            Ok(()) => {
                log::debug!("Clicked first suggestion {}", item);
                return Some(SelectionMethod::Click);
            }
            Err(e) => log::debug!("Native click on {} failed: {}", item, e),
        }

        match self.page.dom_click_first(list) {
            Ok(true) => {
                log::debug!("Clicked first suggestion in {} from the page", list);
                Some(SelectionMethod::DomClick)
            }
            Ok(false) => {
                log::warn!("Suggestion list {} had no item to click", list);
                None
            }
            Err(e) => {
                log::warn!("Page click on {} failed: {}", list, e);
                None
            }
        }
    }

    fn keyboard_select(&self, selector: &str) -> Option<SelectionMethod> {
        let key_gap = self.settings.timings.key_gap;

        pause(key_gap);
        let sent = self.page.press_key("ArrowDown").and_then(|()| {
            pause(key_gap);
            self.page.press_key("Enter")
        });

        match sent {
            Ok(()) => Some(SelectionMethod::Keyboard),
            Err(e) => {
                log::warn!("Keyboard selection on {} failed: {}", selector, e);
                None
            }
        }
    }

    fn await_schedule(&self) -> bool {
        let table = self.settings.table_selector.as_str();
        let rendered = self.wait_for(self.settings.timings.schedule_render, |page| page.table_has_rows(table));

        if rendered {
            log::debug!("Schedule table rendered");
        } else {
            log::warn!("Schedule table {} has no rows after waiting, continuing", table);
        }
        rendered
    }

    /// Bounded wait on a page check; a failing check counts as "not yet"
    fn wait_for<F>(&self, timeout: Duration, mut check: F) -> bool
    where
        F: FnMut(&P) -> Result<bool>,
    {
        await_condition(
            || match check(self.page) {
                Ok(met) => met,
                Err(e) => {
                    log::debug!("Page check failed: {}", e);
                    false
                }
            },
            timeout,
            self.settings.timings.poll_interval,
        )
    }
}

fn field_value(address: &AddressQuery, field: AddressField) -> Option<&str> {
    let value = match field {
        AddressField::City => Some(address.city.as_str()),
        AddressField::Street => address.street.as_deref(),
        AddressField::Building => address.building.as_deref(),
    };
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn pause(duration: Duration) {
    if !duration.is_zero() {
        std::thread::sleep(duration);
    }
}
