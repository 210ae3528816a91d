use std::path::PathBuf;
use std::time::Duration;

/// Default user agent presented to the schedule site
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/128.0 Safari/537.36";

/// Options for launching a new browser instance
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window
    pub headless: bool,

    /// Window width in pixels
    pub window_width: u32,

    /// Window height in pixels
    pub window_height: u32,

    /// Custom Chrome/Chromium binary
    pub chrome_path: Option<PathBuf>,

    /// Persistent profile directory
    pub user_data_dir: Option<PathBuf>,

    /// Chrome sandbox (disable when running as root in containers)
    pub sandbox: bool,

    /// How long the browser may sit idle between cycles before headless_chrome drops it
    pub idle_timeout: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 900,
            window_height: 900,
            chrome_path: None,
            user_data_dir: None,
            sandbox: false,
            idle_timeout: Duration::from_secs(60 * 60),
        }
    }
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn chrome_path(mut self, path: PathBuf) -> Self {
        self.chrome_path = Some(path);
        self
    }

    pub fn user_data_dir(mut self, dir: PathBuf) -> Self {
        self.user_data_dir = Some(dir);
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }
}

/// Options for attaching to an already running browser
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// DevTools WebSocket URL
    pub ws_url: String,

    /// Idle timeout of the DevTools connection in milliseconds
    pub timeout: u64,
}

impl ConnectionOptions {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self { ws_url: ws_url.into(), timeout: 60 * 60 * 1000 }
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Where the shared browser comes from
#[derive(Debug, Clone)]
pub enum BrowserSource {
    Launch(LaunchOptions),
    Connect(ConnectionOptions),
}

impl Default for BrowserSource {
    fn default() -> Self {
        BrowserSource::Launch(LaunchOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_defaults() {
        let opts = LaunchOptions::default();
        assert!(opts.headless);
        assert_eq!((opts.window_width, opts.window_height), (900, 900));
        assert!(!opts.sandbox);
        assert!(opts.chrome_path.is_none());
    }

    #[test]
    fn test_launch_builder() {
        let opts = LaunchOptions::new()
            .headless(false)
            .window_size(1280, 720)
            .chrome_path(PathBuf::from("/usr/bin/chromium"))
            .idle_timeout(Duration::from_secs(5));

        assert!(!opts.headless);
        assert_eq!(opts.window_width, 1280);
        assert_eq!(opts.chrome_path, Some(PathBuf::from("/usr/bin/chromium")));
        assert_eq!(opts.idle_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_connection_options() {
        let opts = ConnectionOptions::new("ws://localhost:9222").timeout(5000);
        assert_eq!(opts.ws_url, "ws://localhost:9222");
        assert_eq!(opts.timeout, 5000);
    }
}
