//! Result buffer subsystem
//!
//! Holds the rows a query produces. Rows stay in memory up to a configured
//! threshold and are transparently spilled to a checksummed overflow file
//! beyond it.
//!
//! # Design Principles
//!
//! - Append-only while the query runs, immutable afterwards
//! - Random access by row index, uniform across memory and disk
//! - Checksum verified on every overflow read
//! - Overflow file deleted when the buffer is closed

mod errors;
mod record;
mod result_buffer;
mod spill;

use std::collections::BTreeMap;

use serde_json::Value;

pub use errors::{BufferError, BufferResult};
pub use record::{decode_row, encode_row};
pub use result_buffer::{estimate_row_size, Residency, ResultBuffer, SpillConfig};
pub use spill::SpillFile;

/// A single result row: field name to value.
pub type Row = BTreeMap<String, Value>;
