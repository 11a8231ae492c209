//! Result buffer error types
//!
//! Error codes:
//! - LOGQ_STORAGE_EXHAUSTED (overflow file could not be created or written)
//! - LOGQ_BUFFER_CORRUPTION (overflow record failed its checksum)
//! - LOGQ_BUFFER_READ_FAILED (overflow file could not be read)
//! - LOGQ_BUFFER_CLOSED (append after the buffer was released)

use std::io;

use thiserror::Error;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Result buffer errors
#[derive(Debug, Error)]
pub enum BufferError {
    /// Overflow storage could not be allocated or extended
    #[error("Overflow storage exhausted: {message}")]
    StorageExhausted {
        /// What was being attempted
        message: String,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Overflow record failed validation
    #[error("Overflow record corrupted at byte offset {offset}: {reason}")]
    Corruption {
        /// Byte offset of the record in the overflow file
        offset: u64,
        /// What failed
        reason: String,
    },

    /// Overflow record could not be read back
    #[error("Failed to read overflow record at byte offset {offset}")]
    ReadFailed {
        /// Byte offset of the record in the overflow file
        offset: u64,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// Row could not be encoded for the overflow file
    #[error("Failed to encode row: {0}")]
    Encode(#[from] serde_json::Error),

    /// Buffer was already closed
    #[error("Result buffer is closed")]
    Closed,

    /// A buffer lock was poisoned by a panicking thread
    #[error("Result buffer lock poisoned")]
    LockPoisoned,
}

impl BufferError {
    /// Create a storage exhausted error
    pub fn storage_exhausted(message: impl Into<String>, source: io::Error) -> Self {
        BufferError::StorageExhausted {
            message: message.into(),
            source,
        }
    }

    /// Create a corruption error at the given record offset
    pub fn corruption(offset: u64, reason: impl Into<String>) -> Self {
        BufferError::Corruption {
            offset,
            reason: reason.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            BufferError::StorageExhausted { .. } => "LOGQ_STORAGE_EXHAUSTED",
            BufferError::Corruption { .. } => "LOGQ_BUFFER_CORRUPTION",
            BufferError::ReadFailed { .. } => "LOGQ_BUFFER_READ_FAILED",
            BufferError::Encode(_) => "LOGQ_BUFFER_ENCODE_FAILED",
            BufferError::Closed => "LOGQ_BUFFER_CLOSED",
            BufferError::LockPoisoned => "LOGQ_BUFFER_LOCK_POISONED",
        }
    }

    /// Returns whether the error means the disk could not take more rows
    pub fn is_storage_exhausted(&self) -> bool {
        matches!(self, BufferError::StorageExhausted { .. })
    }
}
