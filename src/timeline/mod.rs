//! Timeline aggregation
//!
//! Buckets result timestamps into fixed-width spans and keeps a sliding
//! window of the most recent bucket counts.

mod aggregator;
mod span;

pub use aggregator::{TimelineAggregator, TimelineSnapshot, DEFAULT_TIMELINE_SIZE};
pub use span::{SpanUnit, TimelineSpan};
