// Error types for lifecycle translation

use thiserror::Error;

/// Result type alias using ListenerError
pub type Result<T> = std::result::Result<T, ListenerError>;

/// Errors surfaced by listener callbacks
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The annotation source has no declaration for the test method
    #[error("no declaration found for test method `{0}`")]
    UnknownMethod(String),

    /// A runtime argument has no matching declared parameter
    #[error(
        "test method `{method}` declares {declared} parameter(s), but parameter {index} was requested"
    )]
    ParameterOutOfRange {
        method: String,
        index: usize,
        declared: usize,
    },

    /// The reporting sink failed to accept an event
    #[error(transparent)]
    Sink(#[from] SinkError),
}

impl ListenerError {
    /// Annotation lookup failures mean the test declaration itself is malformed
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownMethod(_) | Self::ParameterOutOfRange { .. }
        )
    }
}

/// Errors raised by an event sink
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write event: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize event: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sink rejected event: {0}")]
    Rejected(String),
}
