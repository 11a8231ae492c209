//! Sliding-window timestamp histogram
//!
//! Buckets are contiguous: bucket `i` of the window covers
//! `first_index + i`. New buckets are appended zero-filled and the oldest are
//! evicted once the window exceeds its capacity. Timestamps that fall before
//! the oldest retained bucket are ignored and counted in `dropped`.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::span::TimelineSpan;

/// Default number of retained buckets
pub const DEFAULT_TIMELINE_SIZE: usize = 10;

/// Read-only view of the bucket window
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineSnapshot {
    /// Span the buckets are measured in
    pub span: TimelineSpan,
    /// Start time of each bucket, oldest first
    pub bucket_starts: Vec<DateTime<Utc>>,
    /// Count per bucket, aligned with `bucket_starts`
    pub values: Vec<u64>,
}

impl TimelineSnapshot {
    /// Start of the oldest bucket, if any
    pub fn begin(&self) -> Option<DateTime<Utc>> {
        self.bucket_starts.first().copied()
    }

    /// Sum of all retained counts
    pub fn total(&self) -> u64 {
        self.values.iter().sum()
    }
}

/// Bounded ring of time-bucket counts
#[derive(Debug, Clone)]
pub struct TimelineAggregator {
    span: TimelineSpan,
    capacity: usize,
    /// Bucket index of `counts[0]`
    first_index: Option<i64>,
    counts: VecDeque<u64>,
    dropped: u64,
}

impl TimelineAggregator {
    /// Creates an aggregator keeping at most `capacity` buckets.
    pub fn new(span: TimelineSpan, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            span,
            capacity,
            first_index: None,
            counts: VecDeque::with_capacity(capacity),
            dropped: 0,
        }
    }

    /// The span this aggregator buckets by.
    pub fn span(&self) -> &TimelineSpan {
        &self.span
    }

    /// Maximum number of retained buckets.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Timestamps ignored because they predate the window.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Counts one timestamp given in epoch milliseconds.
    pub fn observe(&mut self, millis: i64) {
        let index = self.span.bucket_index(millis);

        let Some(first) = self.first_index else {
            self.first_index = Some(index);
            self.counts.push_back(1);
            return;
        };

        if index < first {
            self.dropped += 1;
            return;
        }

        let last = first + self.counts.len() as i64 - 1;
        if index <= last {
            self.counts[(index - first) as usize] += 1;
            return;
        }

        if index - last >= self.capacity as i64 {
            // Whole window moves past everything retained.
            self.counts.clear();
            self.counts.resize(self.capacity - 1, 0);
            self.counts.push_back(1);
            self.first_index = Some(index - self.capacity as i64 + 1);
            return;
        }

        for _ in last + 1..index {
            self.counts.push_back(0);
        }
        self.counts.push_back(1);

        let mut first = first;
        while self.counts.len() > self.capacity {
            self.counts.pop_front();
            first += 1;
        }
        self.first_index = Some(first);
    }

    /// Counts one timestamp.
    pub fn observe_time(&mut self, time: DateTime<Utc>) {
        self.observe(time.timestamp_millis());
    }

    /// Current window.
    pub fn snapshot(&self) -> TimelineSnapshot {
        let bucket_starts = match self.first_index {
            Some(first) => (0..self.counts.len() as i64)
                .map(|i| self.span.bucket_start(first + i))
                .collect(),
            None => Vec::new(),
        };

        TimelineSnapshot {
            span: self.span.clone(),
            bucket_starts,
            values: self.counts.iter().copied().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::span::SpanUnit;

    const MINUTE: i64 = 60_000;

    fn minute_aggregator(capacity: usize) -> TimelineAggregator {
        TimelineAggregator::new(TimelineSpan::new(SpanUnit::Minute, 1), capacity)
    }

    #[test]
    fn test_same_bucket_increments() {
        let mut agg = minute_aggregator(10);
        agg.observe(0);
        agg.observe(59_999);
        agg.observe(30_000);

        let snap = agg.snapshot();
        assert_eq!(snap.values, vec![3]);
        assert_eq!(snap.begin().unwrap().timestamp_millis(), 0);
    }

    #[test]
    fn test_gap_is_zero_filled() {
        let mut agg = minute_aggregator(10);
        agg.observe(0);
        agg.observe(3 * MINUTE + 5);

        assert_eq!(agg.snapshot().values, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_window_slides_and_evicts_oldest() {
        let mut agg = minute_aggregator(3);
        for minute in 0..5 {
            agg.observe(minute * MINUTE);
            agg.observe(minute * MINUTE + 1);
        }

        let snap = agg.snapshot();
        assert_eq!(snap.values, vec![2, 2, 2]);
        let starts: Vec<i64> = snap.bucket_starts.iter().map(|t| t.timestamp_millis()).collect();
        assert_eq!(starts, vec![2 * MINUTE, 3 * MINUTE, 4 * MINUTE]);
    }

    #[test]
    fn test_older_than_window_is_ignored() {
        let mut agg = minute_aggregator(2);
        agg.observe(10 * MINUTE);
        agg.observe(11 * MINUTE);
        agg.observe(0);

        assert_eq!(agg.snapshot().values, vec![1, 1]);
        assert_eq!(agg.dropped(), 1);
    }

    #[test]
    fn test_late_timestamp_inside_window_counts() {
        let mut agg = minute_aggregator(5);
        agg.observe(0);
        agg.observe(4 * MINUTE);
        agg.observe(2 * MINUTE);

        assert_eq!(agg.snapshot().values, vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn test_large_jump_resets_window() {
        let mut agg = minute_aggregator(4);
        agg.observe(0);
        agg.observe(1_000 * MINUTE);

        let snap = agg.snapshot();
        assert_eq!(snap.values, vec![0, 0, 0, 1]);
        assert_eq!(snap.begin().unwrap().timestamp_millis(), 997 * MINUTE);
    }

    #[test]
    fn test_empty_snapshot() {
        let agg = minute_aggregator(10);
        let snap = agg.snapshot();
        assert!(snap.values.is_empty());
        assert!(snap.begin().is_none());
    }
}
