//! Outbound notification of a changed schedule
//!
//! - message: HTML rendering of a processed schedule
//! - logger: notifier that writes the message to the log
//! - telegram: Bot API delivery (requires the `telegram` feature)

pub mod logger;
pub mod message;
#[cfg(feature = "telegram")]
pub mod telegram;

pub use logger::LogNotifier;
pub use message::render_message;
#[cfg(feature = "telegram")]
pub use telegram::TelegramNotifier;

use crate::schedule::ProcessedSchedule;

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: bool,
    pub error: Option<String>,
}

impl Delivery {
    pub fn delivered() -> Self {
        Self { delivered: true, error: None }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self { delivered: false, error: Some(error.into()) }
    }
}

/// A channel a changed schedule is pushed to.
///
/// Delivery never fails the cycle; problems are reported through [`Delivery`].
pub trait Notifier: Send {
    /// Channel name used in logs
    fn name(&self) -> &str;

    fn deliver(&self, schedule: &ProcessedSchedule) -> Delivery;
}
