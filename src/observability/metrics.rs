//! Metrics registry for the query engine
//!
//! - Counters only
//! - Monotonic increase
//! - Reset only on process start
//! - Thread-safe but lock-minimal

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of the engine
///
/// # Thread Safety
///
/// All counters use atomic operations. Relaxed ordering is enough since no
/// counter is used to synchronize anything else.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Queries compiled and registered
    queries_created: AtomicU64,
    /// Queries whose execution thread started
    queries_started: AtomicU64,
    /// Queries that exhausted their pipeline
    queries_ended: AtomicU64,
    /// Queries cancelled explicitly or by session loss
    queries_cancelled: AtomicU64,
    /// Queries terminated by a failure
    queries_failed: AtomicU64,
    /// Queries removed from the registry
    queries_removed: AtomicU64,
    /// Rows appended to result buffers
    rows_produced: AtomicU64,
    /// Rows written to overflow storage
    rows_spilled: AtomicU64,
    /// Sessions closed
    sessions_closed: AtomicU64,
    /// Push messages delivered
    pushes_sent: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Query lifecycle

    /// Increment queries created
    pub fn increment_queries_created(&self) {
        self.queries_created.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment queries started
    pub fn increment_queries_started(&self) {
        self.queries_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment queries ended
    pub fn increment_queries_ended(&self) {
        self.queries_ended.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment queries cancelled
    pub fn increment_queries_cancelled(&self) {
        self.queries_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment queries failed
    pub fn increment_queries_failed(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment queries removed
    pub fn increment_queries_removed(&self) {
        self.queries_removed.fetch_add(1, Ordering::Relaxed);
    }

    // Rows

    /// Increment rows produced
    pub fn increment_rows_produced(&self) {
        self.rows_produced.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment rows spilled
    pub fn increment_rows_spilled(&self) {
        self.rows_spilled.fetch_add(1, Ordering::Relaxed);
    }

    /// Get rows produced
    pub fn rows_produced(&self) -> u64 {
        self.rows_produced.load(Ordering::Relaxed)
    }

    // Sessions and push

    /// Increment sessions closed
    pub fn increment_sessions_closed(&self) {
        self.sessions_closed.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment pushes sent
    pub fn increment_pushes_sent(&self) {
        self.pushes_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current snapshot of all metrics as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_created: self.queries_created.load(Ordering::Relaxed),
            queries_started: self.queries_started.load(Ordering::Relaxed),
            queries_ended: self.queries_ended.load(Ordering::Relaxed),
            queries_cancelled: self.queries_cancelled.load(Ordering::Relaxed),
            queries_failed: self.queries_failed.load(Ordering::Relaxed),
            queries_removed: self.queries_removed.load(Ordering::Relaxed),
            rows_produced: self.rows_produced.load(Ordering::Relaxed),
            rows_spilled: self.rows_spilled.load(Ordering::Relaxed),
            sessions_closed: self.sessions_closed.load(Ordering::Relaxed),
            pushes_sent: self.pushes_sent.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_created: u64,
    pub queries_started: u64,
    pub queries_ended: u64,
    pub queries_cancelled: u64,
    pub queries_failed: u64,
    pub queries_removed: u64,
    pub rows_produced: u64,
    pub rows_spilled: u64,
    pub sessions_closed: u64,
    pub pushes_sent: u64,
}
