//! Observability subsystem
//!
//! - Structured logging through `tracing`
//! - Monotonic counters for the query lifecycle
//!
//! Observability is read-only: nothing here affects query execution, and a
//! logging failure never aborts the engine.

mod logging;
mod metrics;

pub use logging::init_logging;
pub use metrics::{MetricsRegistry, MetricsSnapshot};

use thiserror::Error;

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

/// Observability error
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// The log level directive did not parse
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// A global subscriber is already installed
    #[error("Logging already initialized")]
    AlreadyInitialized,
}

impl ObservabilityError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ObservabilityError::InvalidLevel(_) => "LOGQ_INVALID_LOG_LEVEL",
            ObservabilityError::AlreadyInitialized => "LOGQ_LOGGING_INITIALIZED",
        }
    }

    /// Observability errors are never fatal
    pub fn is_fatal(&self) -> bool {
        false
    }
}
