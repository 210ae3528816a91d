//! Browser session management
//!
//! - config: launch / connection options
//! - session: the Chrome session, per-cycle page guard and the lazily shared browser
//! - wait: the bounded polling primitive behind every wait on the page

pub mod config;
pub mod session;
pub mod wait;

pub use config::{BrowserSource, ConnectionOptions, DEFAULT_USER_AGENT, LaunchOptions};
pub use session::{BrowserSession, PageGuard, SharedBrowser};
pub use wait::await_condition;
