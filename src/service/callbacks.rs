//! Callbacks forwarding query progress to the push layer

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, trace, warn};

use super::push::PushApi;
use crate::buffer::{ResultBuffer, Row};
use crate::observability::MetricsRegistry;
use crate::query::{PageCallback, QueryId, TimelineCallback};
use crate::timeline::{TimelineSnapshot, TimelineSpan};

/// Result channel of a query
pub fn query_channel(resource: &str, id: QueryId) -> String {
    format!("{}-query-{}", resource, id)
}

/// Timeline channel of a query
pub fn timeline_channel(resource: &str, id: QueryId) -> String {
    format!("{}-query-timeline-{}", resource, id)
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PagePayload<'a> {
    PageLoaded {
        id: QueryId,
        result: &'a [Row],
        count: usize,
        offset: usize,
        limit: usize,
    },
    Eof {
        id: QueryId,
        total_count: usize,
    },
    Failed {
        id: QueryId,
        reason: &'a str,
    },
}

#[derive(Debug, Serialize)]
struct TimelinePayload<'a> {
    id: QueryId,
    span_field: &'static str,
    span_amount: u32,
    begin: Option<DateTime<Utc>>,
    values: &'a [u64],
    count: usize,
}

struct Outlet {
    org_id: String,
    channel: String,
    push: Arc<dyn PushApi>,
    metrics: Arc<MetricsRegistry>,
}

impl Outlet {
    fn send<T: Serialize>(&self, payload: &T) {
        let value = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(channel = %self.channel, error = %e, "failed to encode push payload");
                return;
            }
        };
        match self.push.push(&self.org_id, &self.channel, value) {
            Ok(()) => self.metrics.increment_pushes_sent(),
            Err(e) => debug!(channel = %self.channel, error = %e, "push dropped"),
        }
    }
}

/// Pushes the subscriber's result window on every page and the total on eof.
pub struct PushPageCallback {
    outlet: Outlet,
    offset: usize,
    limit: usize,
}

impl PushPageCallback {
    /// Creates a callback pushing to `channel` for `org_id`.
    pub fn new(
        org_id: impl Into<String>,
        channel: impl Into<String>,
        offset: usize,
        limit: usize,
        push: Arc<dyn PushApi>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            outlet: Outlet {
                org_id: org_id.into(),
                channel: channel.into(),
                push,
                metrics,
            },
            offset,
            limit,
        }
    }
}

impl PageCallback for PushPageCallback {
    fn offset(&self) -> usize {
        self.offset
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn on_page_loaded(&self, query_id: QueryId, result: &ResultBuffer) {
        let rows = match result.window(self.offset, self.limit) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(query_id, code = e.code(), error = %e, "failed to read result page");
                return;
            }
        };

        self.outlet.send(&PagePayload::PageLoaded {
            id: query_id,
            result: &rows,
            count: result.size(),
            offset: self.offset,
            limit: self.limit,
        });
    }

    fn on_eof(&self, query_id: QueryId, total_count: usize) {
        self.outlet.send(&PagePayload::Eof {
            id: query_id,
            total_count,
        });
    }

    fn on_failed(&self, query_id: QueryId, reason: &str) {
        self.outlet.send(&PagePayload::Failed {
            id: query_id,
            reason,
        });
    }
}

/// Pushes the timeline window periodically.
pub struct PushTimelineCallback {
    outlet: Outlet,
    span: TimelineSpan,
    size: usize,
}

impl PushTimelineCallback {
    /// Creates a callback pushing `size` buckets of `span` to `channel`.
    pub fn new(
        org_id: impl Into<String>,
        channel: impl Into<String>,
        span: TimelineSpan,
        size: usize,
        push: Arc<dyn PushApi>,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            outlet: Outlet {
                org_id: org_id.into(),
                channel: channel.into(),
                push,
                metrics,
            },
            span,
            size,
        }
    }
}

impl TimelineCallback for PushTimelineCallback {
    fn span(&self) -> TimelineSpan {
        self.span.clone()
    }

    fn size(&self) -> usize {
        self.size
    }

    fn on_timeline(&self, query_id: QueryId, snapshot: &TimelineSnapshot, count: usize) {
        trace!(
            query_id,
            span = %snapshot.span.unit,
            amount = snapshot.span.amount,
            buckets = snapshot.values.len(),
            count,
            "timeline update"
        );

        self.outlet.send(&TimelinePayload {
            id: query_id,
            span_field: snapshot.span.unit.as_str(),
            span_amount: snapshot.span.amount,
            begin: snapshot.begin(),
            values: &snapshot.values,
            count,
        });
    }
}
