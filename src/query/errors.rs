//! Query engine error types
//!
//! Cancellation is not an error: a cancelled query simply reaches its
//! terminal state.

use thiserror::Error;

use super::state::QueryState;
use super::QueryId;
use crate::buffer::BufferError;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Error raised by the query compiler collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CompileError {
    message: String,
}

impl CompileError {
    /// Create a compile error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Error raised by a running pipeline while producing rows
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct PipelineError(pub String);

/// Query engine errors
#[derive(Debug, Error)]
pub enum QueryError {
    /// Query text could not be compiled
    #[error("Invalid query: {0}")]
    Compile(#[from] CompileError),

    /// Unknown or removed query id
    #[error("Query not found: {0}")]
    NotFound(QueryId),

    /// Operation not allowed in the query's current state
    #[error("Query {id} is {state}, cannot {operation}")]
    InvalidState {
        /// Query id
        id: QueryId,
        /// State the query was in
        state: QueryState,
        /// Attempted operation
        operation: &'static str,
    },

    /// Overflow storage could not take more rows
    #[error("Query {id} ran out of overflow storage: {source}")]
    StorageExhausted {
        /// Query id
        id: QueryId,
        /// Underlying buffer failure
        #[source]
        source: BufferError,
    },

    /// Result buffer failure other than exhaustion
    #[error("Result buffer error: {0}")]
    Buffer(#[source] BufferError),

    /// The pipeline failed mid-query
    #[error("Query {id} pipeline failed: {source}")]
    Pipeline {
        /// Query id
        id: QueryId,
        /// Pipeline failure
        #[source]
        source: PipelineError,
    },

    /// Internal failure (poisoned lock, thread spawn)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryError {
    /// Wraps a buffer error, keeping exhaustion distinct.
    pub fn from_buffer(id: QueryId, source: BufferError) -> Self {
        if source.is_storage_exhausted() {
            QueryError::StorageExhausted { id, source }
        } else {
            QueryError::Buffer(source)
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Compile(_) => "LOGQ_COMPILE_ERROR",
            QueryError::NotFound(_) => "LOGQ_QUERY_NOT_FOUND",
            QueryError::InvalidState { .. } => "LOGQ_INVALID_STATE",
            QueryError::StorageExhausted { .. } => "LOGQ_STORAGE_EXHAUSTED",
            QueryError::Buffer(e) => e.code(),
            QueryError::Pipeline { .. } => "LOGQ_PIPELINE_FAILED",
            QueryError::Internal(_) => "LOGQ_INTERNAL",
        }
    }
}
