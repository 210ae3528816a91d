//! Address form automation
//!
//! - settings: selectors and wait bounds of the cascading address form
//! - page: the page operations the controller relies on, implemented for a Chrome tab
//! - controller: the city → street → building state machine

pub mod controller;
pub mod page;
pub mod settings;

pub use controller::{FieldOutcome, FormController, FormReport, SelectionMethod};
pub use page::FormPage;
pub use settings::{AddressField, FormSettings, FormTimings};

use crate::browser::{BrowserSession, await_condition};
use crate::error::{Result, WatchError};
use crate::schedule::AddressQuery;
use std::time::Duration;

/// Rendered schedule page and how the form run went
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub html: String,
    pub report: FormReport,
}

/// Open the shutdowns page in a fresh tab, fill the address form and return the rendered markup.
///
/// Navigation failures and a missing form are fatal; everything after that is
/// soft and ends up in [`FetchedPage::report`]. The tab is closed on every path.
pub fn fetch_schedule_markup(
    session: &BrowserSession,
    url: &str,
    address: &AddressQuery,
    settings: &FormSettings,
    user_agent: &str,
    request_timeout: Duration,
) -> Result<FetchedPage> {
    let page = session.open_page()?;
    page.set_default_timeout(request_timeout);

    if let Err(e) = page.set_user_agent(user_agent, None, None) {
        log::warn!("Failed to set user agent: {}", e);
    }

    log::info!("Opening {} for {}", url, address.describe());
    page.navigate_to(url)
        .map_err(|e| WatchError::NavigationFailed(format!("{}: {}", url, e)))?;
    page.wait_until_navigated()
        .map_err(|e| WatchError::NavigationFailed(format!("{}: {}", url, e)))?;

    let form_selector = settings.form_selector.as_str();
    let form_found = await_condition(
        || page.exists(form_selector).unwrap_or(false),
        settings.timings.form_present,
        settings.timings.poll_interval,
    );
    if !form_found {
        return Err(WatchError::FormNotFound(form_selector.to_string()));
    }

    let report = FormController::new(&*page, settings).run(address);
    if report.is_degraded() {
        log::warn!("Address form finished with soft failures: {:?}", report);
    }

    let html = page.content()?;
    log::debug!("Captured {} bytes of page markup", html.len());

    Ok(FetchedPage { html, report })
}
