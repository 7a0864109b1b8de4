use thiserror::Error;

#[derive(Error, Debug)]
pub enum UiError {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Element not found: '{selector}' never became {state}")]
    ElementNotFound { selector: String, state: String },

    #[error("Highlight failed: {0}")]
    Highlight(String),

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Failed to connect to Chrome: {0}")]
    ConnectionFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Step '{step}' failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<UiError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("CDP error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Data error: {0}")]
    Data(#[from] serde_json::Error),
}

impl UiError {
    /// Shorthand for an assertion failure with a formatted message.
    pub fn assertion(message: impl Into<String>) -> Self {
        UiError::Assertion(message.into())
    }

    /// True when the error means the target element was never present.
    pub fn is_not_found(&self) -> bool {
        match self {
            UiError::ElementNotFound { .. } => true,
            UiError::Step { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, UiError>;
