//! CLI-specific error types
//!
//! All CLI errors are fatal: `main` prints them and exits non-zero.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::observability::ObservabilityError;
use crate::query::QueryError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded
    #[error("{}: {0}", .0.code())]
    Config(#[from] ConfigError),

    /// The query engine rejected an operation
    #[error("{}: {0}", .0.code())]
    Query(#[from] QueryError),

    /// Logging could not be set up
    #[error("{}: {0}", .0.code())]
    Logging(#[from] ObservabilityError),

    /// Input data is malformed
    #[error("LOGQ_CLI_DATA_ERROR: line {line}: {message}")]
    Data {
        /// 1-based line number
        line: usize,
        /// What was wrong
        message: String,
    },

    /// I/O error (data file, stdout)
    #[error("LOGQ_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    /// JSON error on output
    #[error("LOGQ_CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The query stopped without reporting an end
    #[error("LOGQ_CLI_QUERY_ABORTED: {0}")]
    Aborted(String),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(e) => e.code(),
            CliError::Query(e) => e.code(),
            CliError::Logging(e) => e.code(),
            CliError::Data { .. } => "LOGQ_CLI_DATA_ERROR",
            CliError::Io(_) | CliError::Json(_) => "LOGQ_CLI_IO_ERROR",
            CliError::Aborted(_) => "LOGQ_CLI_QUERY_ABORTED",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
