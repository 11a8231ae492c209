//! Timeline span descriptors

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Calendar unit a span is measured in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanUnit {
    /// One second
    Second,
    /// One minute
    Minute,
    /// One hour
    Hour,
    /// One day
    Day,
}

impl SpanUnit {
    /// Length of one unit in milliseconds
    pub fn millis(&self) -> i64 {
        match self {
            SpanUnit::Second => 1_000,
            SpanUnit::Minute => 60_000,
            SpanUnit::Hour => 3_600_000,
            SpanUnit::Day => 86_400_000,
        }
    }

    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanUnit::Second => "second",
            SpanUnit::Minute => "minute",
            SpanUnit::Hour => "hour",
            SpanUnit::Day => "day",
        }
    }
}

impl fmt::Display for SpanUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bucket width plus the row field holding the timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineSpan {
    /// Row field carrying the timestamp
    #[serde(default = "default_time_field")]
    pub time_field: String,
    /// Unit of the bucket width
    pub unit: SpanUnit,
    /// Number of units per bucket
    pub amount: u32,
}

fn default_time_field() -> String {
    "_time".to_string()
}

impl Default for TimelineSpan {
    fn default() -> Self {
        Self {
            time_field: default_time_field(),
            unit: SpanUnit::Minute,
            amount: 1,
        }
    }
}

impl TimelineSpan {
    /// Span over the default `_time` field
    pub fn new(unit: SpanUnit, amount: u32) -> Self {
        Self {
            time_field: default_time_field(),
            unit,
            amount: amount.max(1),
        }
    }

    /// Use a different timestamp field
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.time_field = field.into();
        self
    }

    /// Bucket width in milliseconds
    pub fn width_millis(&self) -> i64 {
        self.unit.millis() * i64::from(self.amount.max(1))
    }

    /// Index of the bucket containing `millis` (epoch-based)
    pub fn bucket_index(&self, millis: i64) -> i64 {
        millis.div_euclid(self.width_millis())
    }

    /// Start time of bucket `index`
    pub fn bucket_start(&self, index: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(index.saturating_mul(self.width_millis()))
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Reads the span's timestamp field from a row value.
    ///
    /// Integers are epoch milliseconds; strings must be RFC 3339.
    pub fn extract_millis(&self, value: &Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.timestamp_millis()),
            _ => None,
        }
    }
}
