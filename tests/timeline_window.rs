//! Timeline Window Tests
//!
//! Tests for:
//! - Only the latest `capacity` buckets are retained
//! - Gaps are zero-filled, late timestamps inside the window still count
//! - Timestamps older than the window are ignored and counted as dropped
//! - Timestamps are read from row fields as epoch millis or RFC 3339

use chrono::{TimeZone, Utc};
use logquery::timeline::{SpanUnit, TimelineAggregator, TimelineSpan};
use serde_json::json;

// =============================================================================
// Test Utilities
// =============================================================================

const MINUTE: i64 = 60_000;

fn minute_aggregator(capacity: usize) -> TimelineAggregator {
    TimelineAggregator::new(TimelineSpan::new(SpanUnit::Minute, 1), capacity)
}

// =============================================================================
// Sliding Window
// =============================================================================

#[test]
fn test_twenty_minutes_keep_latest_ten() {
    let mut aggregator = minute_aggregator(10);

    // Minute m gets m + 1 events.
    for minute in 0..20 {
        for second in 0..=minute {
            aggregator.observe(minute * MINUTE + second * 1000);
        }
    }

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.values, (11..=20).collect::<Vec<u64>>());
    assert_eq!(snapshot.bucket_starts.len(), 10);
    assert_eq!(
        snapshot.begin(),
        Some(Utc.timestamp_millis_opt(10 * MINUTE).unwrap())
    );
    assert_eq!(aggregator.dropped(), 0);
}

#[test]
fn test_old_timestamp_is_noop() {
    let mut aggregator = minute_aggregator(10);
    for minute in 0..20 {
        aggregator.observe(minute * MINUTE);
    }
    let before = aggregator.snapshot();

    aggregator.observe(3 * MINUTE);

    assert_eq!(aggregator.snapshot(), before);
    assert_eq!(aggregator.dropped(), 1);
}

#[test]
fn test_gap_is_zero_filled_and_late_arrival_counts() {
    let mut aggregator = minute_aggregator(10);
    aggregator.observe(0);
    aggregator.observe(4 * MINUTE);
    aggregator.observe(2 * MINUTE + 5);

    assert_eq!(aggregator.snapshot().values, vec![1, 0, 1, 0, 1]);
}

#[test]
fn test_jump_past_whole_window_resets() {
    let mut aggregator = minute_aggregator(3);
    aggregator.observe(0);
    aggregator.observe(MINUTE);
    aggregator.observe(100 * MINUTE);

    let snapshot = aggregator.snapshot();
    assert_eq!(snapshot.values, vec![0, 0, 1]);
    assert_eq!(
        snapshot.bucket_starts.last().copied(),
        Some(Utc.timestamp_millis_opt(100 * MINUTE).unwrap())
    );
}

#[test]
fn test_wider_spans_bucket_together() {
    let mut aggregator = TimelineAggregator::new(TimelineSpan::new(SpanUnit::Minute, 5), 4);
    for minute in 0..10 {
        aggregator.observe(minute * MINUTE);
    }
    assert_eq!(aggregator.snapshot().values, vec![5, 5]);
}

// =============================================================================
// Timestamp Extraction
// =============================================================================

#[test]
fn test_offset_timestamps_normalize_to_utc() {
    let span = TimelineSpan::default();
    assert_eq!(
        span.extract_millis(&json!("1970-01-01T01:00:00+01:00")),
        Some(0)
    );
    assert_eq!(span.extract_millis(&json!(90_000.7)), Some(90_000));
}

#[test]
fn test_custom_time_field() {
    let span = TimelineSpan::new(SpanUnit::Second, 10).with_field("ts");
    assert_eq!(span.time_field, "ts");
    assert_eq!(span.width_millis(), 10_000);
}
