use crate::browser::{BrowserSource, DEFAULT_USER_AGENT};
use crate::error::{Result, WatchError};
use crate::form::{FormSettings, FormTimings};
use crate::schedule::{AddressQuery, DEFAULT_TIMEZONE};
use chrono_tz::Tz;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default shutdowns page
pub const DEFAULT_BASE_URL: &str = "https://www.dtek-krem.com.ua/ua/shutdowns";

pub const DEFAULT_STORAGE_PATH: &str = "data/schedules.json";

/// File name of the last notified schedule, stored next to the schedule record
pub const SNAPSHOT_FILE_NAME: &str = "notified.json";

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(15 * 60);

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Margin kept between the end of one interval and the browser's idle shutdown
const BROWSER_IDLE_MARGIN: Duration = Duration::from_secs(60);

/// Bot credentials for Telegram delivery
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl TelegramConfig {
    /// Both values are required; blank ones yield `None`
    pub fn from_parts(bot_token: Option<String>, chat_id: Option<String>) -> Option<Self> {
        let bot_token = bot_token.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;
        let chat_id = chat_id.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())?;
        Some(Self { bot_token, chat_id })
    }
}

/// Everything a watcher needs to run
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Page hosting the address form
    pub base_url: String,

    pub address: AddressQuery,

    /// Schedule record written every cycle
    pub storage_path: PathBuf,

    /// Last notified schedule
    pub snapshot_path: PathBuf,

    /// Time between two cycles
    pub interval: Duration,

    /// Page load bound, also used for the long waits in the form
    pub request_timeout: Duration,

    pub user_agent: String,

    /// Zone of the page's unix day markers
    pub timezone: Tz,

    /// Idle timeout always outlasts one interval, so the browser survives between cycles
    pub browser: BrowserSource,

    pub form: FormSettings,

    pub telegram: Option<TelegramConfig>,
}

impl WatchConfig {
    /// Configuration with defaults for everything but the address
    pub fn new(address: AddressQuery) -> Self {
        let storage_path = PathBuf::from(DEFAULT_STORAGE_PATH);
        let mut config = Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            address,
            snapshot_path: snapshot_path_for(&storage_path),
            storage_path,
            interval: DEFAULT_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timezone: DEFAULT_TIMEZONE,
            browser: BrowserSource::default(),
            form: FormSettings::default().with_timings(FormTimings::default().with_request_timeout(DEFAULT_REQUEST_TIMEOUT)),
            telegram: None,
        };
        config.fit_browser_idle();
        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the schedule file; the snapshot moves next to it
    pub fn with_storage_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_path = path.into();
        self.snapshot_path = snapshot_path_for(&self.storage_path);
        self
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self.fit_browser_idle();
        self
    }

    /// Set the request timeout and apply it to the form's long waits
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self.form.timings = self.form.timings.clone().with_request_timeout(timeout);
        self.fit_browser_idle();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_browser(mut self, browser: BrowserSource) -> Self {
        self.browser = browser;
        self.fit_browser_idle();
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_form(mut self, form: FormSettings) -> Self {
        self.form = form;
        self
    }

    pub fn with_telegram(mut self, telegram: Option<TelegramConfig>) -> Self {
        self.telegram = telegram;
        self
    }

    /// How long the browser must stay up without traffic: one interval, one request and a margin
    pub fn browser_idle_floor(&self) -> Duration {
        self.interval + self.request_timeout + BROWSER_IDLE_MARGIN
    }

    /// Raise the browser idle timeout to [`WatchConfig::browser_idle_floor`]; longer ones are kept
    fn fit_browser_idle(&mut self) {
        let floor = self.browser_idle_floor();
        match &mut self.browser {
            BrowserSource::Launch(options) => {
                options.idle_timeout = options.idle_timeout.max(floor);
            }
            BrowserSource::Connect(options) => {
                let floor_ms = u64::try_from(floor.as_millis()).unwrap_or(u64::MAX);
                options.timeout = options.timeout.max(floor_ms);
            }
        }
    }

    /// Reject configurations a cycle could never succeed with
    pub fn validate(&self) -> Result<()> {
        if self.address.city.trim().is_empty() {
            return Err(WatchError::InvalidConfig("address city is required".to_string()));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(WatchError::InvalidConfig(format!("base URL must be http(s): {}", self.base_url)));
        }
        if self.interval.is_zero() {
            return Err(WatchError::InvalidConfig("check interval must be positive".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(WatchError::InvalidConfig("request timeout must be positive".to_string()));
        }
        if self.storage_path == self.snapshot_path {
            return Err(WatchError::InvalidConfig(format!(
                "schedule and snapshot must be different files: {}",
                self.storage_path.display()
            )));
        }
        Ok(())
    }
}

/// `notified.json` in the directory of the schedule file
pub fn snapshot_path_for(storage_path: &Path) -> PathBuf {
    match storage_path.parent() {
        Some(dir) => dir.join(SNAPSHOT_FILE_NAME),
        None => PathBuf::from(SNAPSHOT_FILE_NAME),
    }
}
