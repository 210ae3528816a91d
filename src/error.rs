use thiserror::Error;

/// Errors that can abort a watch cycle or a store operation
#[derive(Debug, Error)]
pub enum WatchError {
    /// Browser process could not be started
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Opening, configuring or closing a tab failed
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Page did not load
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript evaluation or a DOM call on the page failed
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    /// The address form never appeared on the loaded page
    #[error("Address form '{0}' not found on page")]
    FormNotFound(String),

    /// Markup or payload could not be interpreted
    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("Storage error at {path}: {source}")]
    Storage {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Outbound notification channel rejected the message
    #[error("Notification via {channel} failed: {reason}")]
    NotificationFailed { channel: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl WatchError {
    /// Whether the failure means the shared browser is unusable and should be relaunched
    pub fn is_browser_failure(&self) -> bool {
        matches!(self, WatchError::LaunchFailed(_) | WatchError::TabOperationFailed(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, WatchError>;
