use crate::{browser::config::{BrowserSource, ConnectionOptions, LaunchOptions},
            error::{Result, WatchError}};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, ops::Deref, sync::Arc, time::Duration};

/// Browser session that manages a Chrome/Chromium instance
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));
        launch_opts.args.push(OsStr::new("--disable-setuid-sandbox"));

        // Keep the browser alive between cycles (default is 30 seconds)
        launch_opts.idle_browser_timeout = options.idle_timeout;

        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));

        if let Some(path) = options.chrome_path {
            launch_opts.path = Some(path);
        }

        if let Some(dir) = options.user_data_dir {
            launch_opts.user_data_dir = Some(dir);
        }

        launch_opts.sandbox = options.sandbox;

        let browser = Browser::new(launch_opts).map_err(|e| WatchError::LaunchFailed(e.to_string()))?;

        Ok(Self { browser })
    }

    /// Connect to an existing browser instance via WebSocket
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url, Duration::from_millis(options.timeout))
            .map_err(|e| WatchError::LaunchFailed(format!("Failed to connect: {}", e)))?;

        Ok(Self { browser })
    }

    /// Launch or connect depending on the source
    pub fn open(source: &BrowserSource) -> Result<Self> {
        match source {
            BrowserSource::Launch(options) => Self::launch(options.clone()),
            BrowserSource::Connect(options) => Self::connect(options.clone()),
        }
    }

    /// Open a fresh tab that is closed when the returned guard goes out of scope
    pub fn open_page(&self) -> Result<PageGuard> {
        let tab = self
            .browser
            .new_tab()
            .map_err(|e| WatchError::TabOperationFailed(format!("Failed to create tab: {}", e)))?;

        Ok(PageGuard { tab })
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| WatchError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Close the browser
    pub fn close(&self) -> Result<()> {
        // headless_chrome has no explicit close; the process ends when Browser is dropped
        let tabs = self.get_tabs()?;
        for tab in tabs {
            let _ = tab.close(false); // Ignore errors on individual tab closes
        }
        Ok(())
    }
}

/// A tab scoped to one cycle; closed on drop, whatever path the cycle took
pub struct PageGuard {
    tab: Arc<Tab>,
}

impl PageGuard {
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }
}

impl Deref for PageGuard {
    type Target = Tab;

    fn deref(&self) -> &Tab {
        &self.tab
    }
}

impl Drop for PageGuard {
    fn drop(&mut self) {
        if let Err(e) = self.tab.close(true) {
            log::debug!("Failed to close page: {}", e);
        }
    }
}

/// The one browser shared across cycles: created on first use, reused after,
/// released by [`SharedBrowser::shutdown`]
pub struct SharedBrowser {
    source: BrowserSource,
    session: Option<BrowserSession>,
}

impl SharedBrowser {
    pub fn new(source: BrowserSource) -> Self {
        Self { source, session: None }
    }

    /// Whether a session is currently open
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Get the session, launching it if needed
    pub fn acquire(&mut self) -> Result<&BrowserSession> {
        if self.session.is_none() {
            log::info!("Starting browser session");
            self.session = Some(BrowserSession::open(&self.source)?);
        }

        self.session
            .as_ref()
            .ok_or_else(|| WatchError::LaunchFailed("browser session unavailable".to_string()))
    }

    /// Drop a session that is no longer usable so the next cycle starts a new one
    pub fn invalidate(&mut self) {
        if self.session.take().is_some() {
            log::warn!("Discarding browser session; it will be restarted on the next cycle");
        }
    }

    /// Close the session if one is open
    pub fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            log::info!("Closing browser session");
            if let Err(e) = session.close() {
                log::warn!("Failed to close browser cleanly: {}", e);
            }
        }
    }
}

impl Drop for SharedBrowser {
    fn drop(&mut self) {
        self.shutdown();
    }
}
