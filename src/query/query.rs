//! A single log query and its execution thread
//!
//! # Execution
//!
//! `start` spawns one dedicated OS thread per query. The thread drains the
//! compiled pipeline into the result buffer, feeds every attached timeline
//! aggregator, and fires page callbacks as pages fill up. A companion ticker
//! thread fires timeline callbacks on a fixed cadence for as long as the
//! query runs.
//!
//! # Cancellation
//!
//! Cooperative: `cancel` raises a flag the production loop checks after
//! every row. Nothing is forcibly terminated.
//!
//! # Locking
//!
//! Callbacks are always invoked with no query lock held.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::callback::{
    CallbackId, CallbackRegistry, FinalNotice, PageCallback, Registration, TimelineCallback,
    TimelineSubscription,
};
use super::compiler::Pipeline;
use super::errors::{QueryError, QueryResult};
use super::state::QueryState;
use super::QueryId;
use crate::buffer::{Residency, ResultBuffer, Row, SpillConfig};
use crate::observability::MetricsRegistry;

/// Per-query execution settings
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// Spill thresholds for the result buffer
    pub spill: SpillConfig,
    /// Cadence of timeline notifications while running
    pub timeline_interval: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            spill: SpillConfig::default(),
            timeline_interval: Duration::from_secs(2),
        }
    }
}

/// Lifecycle timestamps
#[derive(Debug, Clone, Copy)]
struct QueryTimes {
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
}

/// Serializable description of a query, as listed to clients
#[derive(Debug, Clone, Serialize)]
pub struct QuerySummary {
    /// Query id
    pub id: QueryId,
    /// Original query text
    pub query_string: String,
    /// Current state
    pub state: QueryState,
    /// Whether the query ended normally
    pub is_end: bool,
    /// Whether the query was cancelled or failed
    pub is_cancelled: bool,
    /// Rows produced so far
    pub rows: usize,
    /// Failure reason, if terminated abnormally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Start time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    /// Time the query reached a terminal state
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

enum Outcome {
    Exhausted,
    Cancelled,
    Failed(QueryError),
}

/// A compiled query with its result buffer and subscribers.
pub struct Query {
    id: QueryId,
    text: String,
    state: Mutex<QueryState>,
    cancel_requested: AtomicBool,
    pipeline: Mutex<Option<Box<dyn Pipeline>>>,
    result: ResultBuffer,
    callbacks: CallbackRegistry,
    timelines: RwLock<Vec<Arc<TimelineSubscription>>>,
    timeline_interval: Duration,
    times: Mutex<QueryTimes>,
    failure: Mutex<Option<String>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Set once every terminal notification has been delivered
    settled: Mutex<bool>,
    settled_cv: Condvar,
    metrics: Arc<MetricsRegistry>,
}

impl std::fmt::Debug for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("state", &self.state())
            .field("rows", &self.result.size())
            .finish()
    }
}

impl Query {
    /// Creates a query in the `Created` state.
    pub fn new(
        id: QueryId,
        text: impl Into<String>,
        pipeline: Box<dyn Pipeline>,
        options: QueryOptions,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            state: Mutex::new(QueryState::Created),
            cancel_requested: AtomicBool::new(false),
            pipeline: Mutex::new(Some(pipeline)),
            result: ResultBuffer::new(options.spill),
            callbacks: CallbackRegistry::new(),
            timelines: RwLock::new(Vec::new()),
            timeline_interval: options.timeline_interval,
            times: Mutex::new(QueryTimes {
                created_at: Utc::now(),
                started_at: None,
                finished_at: None,
            }),
            failure: Mutex::new(None),
            worker: Mutex::new(None),
            settled: Mutex::new(false),
            settled_cv: Condvar::new(),
            metrics,
        }
    }

    /// Query id
    pub fn id(&self) -> QueryId {
        self.id
    }

    /// Original query text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current state
    pub fn state(&self) -> QueryState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(QueryState::Cancelled)
    }

    /// Whether the query ended normally
    pub fn is_end(&self) -> bool {
        self.state() == QueryState::Ended
    }

    /// Whether the query was cancelled or failed
    pub fn is_cancelled(&self) -> bool {
        self.state() == QueryState::Cancelled
    }

    /// The result rows produced so far
    pub fn result(&self) -> &ResultBuffer {
        &self.result
    }

    /// Failure reason if the query was terminated abnormally
    pub fn failure(&self) -> Option<String> {
        self.failure.lock().ok().and_then(|f| f.clone())
    }

    /// Timestamps older than a timeline window, summed over subscribers
    pub fn dropped_timestamps(&self) -> u64 {
        self.timelines
            .read()
            .map(|t| t.iter().map(|s| s.dropped()).sum())
            .unwrap_or(0)
    }

    /// Describes the query for listings.
    pub fn summary(&self) -> QuerySummary {
        let state = self.state();
        let times = self.times.lock().map(|t| *t).unwrap_or(QueryTimes {
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
        });

        QuerySummary {
            id: self.id,
            query_string: self.text.clone(),
            state,
            is_end: state == QueryState::Ended,
            is_cancelled: state == QueryState::Cancelled,
            rows: self.result.size(),
            failure: self.failure(),
            created_at: times.created_at,
            started_at: times.started_at,
            finished_at: times.finished_at,
        }
    }

    fn lock_state(&self) -> QueryResult<MutexGuard<'_, QueryState>> {
        self.state
            .lock()
            .map_err(|_| QueryError::Internal("Lock poisoned".into()))
    }

    fn invalid_state(&self, state: QueryState, operation: &'static str) -> QueryError {
        QueryError::InvalidState {
            id: self.id,
            state,
            operation,
        }
    }

    /// Starts execution on a dedicated thread.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the query is `Created`.
    pub fn start(self: &Arc<Self>) -> QueryResult<()> {
        let worker = self.lock_worker()?;
        self.spawn_worker(worker)
    }

    /// Attaches the given subscribers and starts execution as one step.
    ///
    /// Concurrent starts are serialized: only the caller that finds the
    /// query `Created` attaches anything.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the query is `Created`; no subscriber is
    /// attached in that case.
    pub fn start_with(
        self: &Arc<Self>,
        page: Option<Arc<dyn PageCallback>>,
        timeline: Option<Arc<dyn TimelineCallback>>,
    ) -> QueryResult<()> {
        let worker = self.lock_worker()?;

        let state = self.state();
        if state != QueryState::Created {
            return Err(self.invalid_state(state, "start"));
        }
        if let Some(callback) = page {
            self.register_page_callback(callback)?;
        }
        if let Some(callback) = timeline {
            self.register_timeline_callback(callback)?;
        }

        self.spawn_worker(worker)
    }

    // Held across the spawn so `release` cannot miss the handle.
    fn lock_worker(&self) -> QueryResult<MutexGuard<'_, Option<JoinHandle<()>>>> {
        self.worker
            .lock()
            .map_err(|_| QueryError::Internal("Lock poisoned".into()))
    }

    fn spawn_worker(
        self: &Arc<Self>,
        mut worker: MutexGuard<'_, Option<JoinHandle<()>>>,
    ) -> QueryResult<()> {
        {
            let mut state = self.lock_state()?;
            if *state != QueryState::Created {
                return Err(self.invalid_state(*state, "start"));
            }
            *state = QueryState::Running;
        }
        if let Ok(mut times) = self.times.lock() {
            times.started_at = Some(Utc::now());
        }

        let pipeline = self
            .pipeline
            .lock()
            .map_err(|_| QueryError::Internal("Lock poisoned".into()))?
            .take()
            .ok_or_else(|| QueryError::Internal(format!("Query {} has no pipeline", self.id)))?;

        let query = Arc::clone(self);
        let spawned = thread::Builder::new()
            .name(format!("log-query-{}", self.id))
            .spawn(move || query.run(pipeline));

        match spawned {
            Ok(handle) => {
                *worker = Some(handle);
                self.metrics.increment_queries_started();
                info!(query_id = self.id, query = %self.text, "log query started");
                Ok(())
            }
            Err(e) => {
                drop(worker);
                let err = QueryError::Internal(format!("Failed to spawn query thread: {}", e));
                self.finish_failed(&err);
                Err(err)
            }
        }
    }

    /// Requests cancellation. Idempotent.
    ///
    /// A query that never started becomes `Cancelled` immediately; a running
    /// query stops after its current row.
    pub fn cancel(&self) {
        self.cancel_requested.store(true, Ordering::Release);

        let cancelled_before_start = match self.state.lock() {
            Ok(mut state) if *state == QueryState::Created => {
                *state = QueryState::Cancelled;
                true
            }
            Ok(state) => {
                if *state == QueryState::Running {
                    debug!(query_id = self.id, "log query cancellation requested");
                }
                false
            }
            Err(_) => false,
        };

        if cancelled_before_start {
            if let Ok(mut pipeline) = self.pipeline.lock() {
                pipeline.take();
            }
            let _ = self.callbacks.close();
            self.mark_finished();
            self.metrics.increment_queries_cancelled();
            info!(query_id = self.id, "log query cancelled before start");
            self.settle();
        }
    }

    /// Whether cancellation was requested.
    pub fn is_cancel_requested(&self) -> bool {
        self.cancel_requested.load(Ordering::Acquire)
    }

    /// Attaches a page subscriber.
    ///
    /// On an already ended query the subscriber gets its eof immediately and
    /// is not retained; `Ok(None)` is returned in that case.
    ///
    /// # Errors
    ///
    /// `InvalidState` if the query was cancelled.
    pub fn register_page_callback(
        &self,
        callback: Arc<dyn PageCallback>,
    ) -> QueryResult<Option<CallbackId>> {
        let state = self.state();
        if state == QueryState::Cancelled {
            return Err(self.invalid_state(state, "register a page callback"));
        }

        match self.callbacks.register(Arc::clone(&callback))? {
            Registration::Registered(id) => Ok(Some(id)),
            Registration::AlreadyEnded => {
                let state = self.state();
                if state != QueryState::Ended {
                    return Err(self.invalid_state(state, "register a page callback"));
                }
                callback.on_eof(self.id, self.result.size());
                Ok(None)
            }
        }
    }

    /// Detaches a page subscriber. Returns whether it was attached.
    pub fn unregister_page_callback(&self, id: CallbackId) -> QueryResult<bool> {
        self.callbacks.unregister(id)
    }

    /// Number of attached page subscribers.
    pub fn page_callback_count(&self) -> usize {
        self.callbacks.len()
    }

    /// Attaches a timeline subscriber.
    ///
    /// # Errors
    ///
    /// `InvalidState` once the query is terminal.
    pub fn register_timeline_callback(&self, callback: Arc<dyn TimelineCallback>) -> QueryResult<()> {
        let state = self.state();
        if state.is_terminal() {
            return Err(self.invalid_state(state, "register a timeline callback"));
        }

        self.timelines
            .write()
            .map_err(|_| QueryError::Internal("Lock poisoned".into()))?
            .push(Arc::new(TimelineSubscription::new(callback)));
        Ok(())
    }

    /// Blocks until the query is terminal and every final notification has
    /// been delivered, or `timeout` elapses. Returns whether it settled.
    pub fn wait(&self, timeout: Duration) -> bool {
        let Ok(settled) = self.settled.lock() else {
            return false;
        };
        match self.settled_cv.wait_timeout_while(settled, timeout, |s| !*s) {
            Ok((settled, _)) => *settled,
            Err(_) => false,
        }
    }

    /// Cancels, waits for the execution thread and releases the result
    /// buffer. Called when the query is removed from its registry.
    pub(crate) fn release(&self) {
        self.cancel();

        let handle = self.worker.lock().ok().and_then(|mut w| w.take());
        if let Some(handle) = handle {
            if handle.thread().id() == thread::current().id() {
                // Removed from one of its own callbacks; the loop exits on
                // the cancellation flag.
                debug!(query_id = self.id, "log query released from its own thread");
            } else if handle.join().is_err() {
                warn!(query_id = self.id, "log query thread panicked");
            }
        }

        self.result.close();
    }

    fn run(self: Arc<Self>, pipeline: Box<dyn Pipeline>) {
        let ticker = self.spawn_ticker();

        let outcome = self.produce(pipeline);

        if let Some((stop, handle)) = ticker {
            drop(stop);
            if handle.join().is_err() {
                warn!(query_id = self.id, "timeline ticker panicked");
            }
        }

        match outcome {
            Outcome::Exhausted => self.finish_ended(),
            Outcome::Cancelled => self.finish_cancelled(),
            Outcome::Failed(err) => self.finish_failed(&err),
        }
    }

    fn produce(&self, mut pipeline: Box<dyn Pipeline>) -> Outcome {
        loop {
            if self.is_cancel_requested() {
                return Outcome::Cancelled;
            }

            let row = match pipeline.next_row() {
                Ok(Some(row)) => row,
                Ok(None) => return Outcome::Exhausted,
                Err(source) => {
                    return Outcome::Failed(QueryError::Pipeline {
                        id: self.id,
                        source,
                    })
                }
            };

            if let Err(err) = self.accept_row(row) {
                return Outcome::Failed(err);
            }

            let due = match self.callbacks.on_rows(1) {
                Ok(due) => due,
                Err(err) => return Outcome::Failed(err),
            };
            if self.is_cancel_requested() {
                return Outcome::Cancelled;
            }
            for callback in due {
                callback.on_page_loaded(self.id, &self.result);
            }
        }
    }

    fn accept_row(&self, row: Row) -> QueryResult<()> {
        if let Ok(timelines) = self.timelines.read() {
            for timeline in timelines.iter() {
                timeline.observe_row(&row);
            }
        }

        let residency = self
            .result
            .append(row)
            .map_err(|e| QueryError::from_buffer(self.id, e))?;

        self.metrics.increment_rows_produced();
        if residency == Residency::Disk {
            self.metrics.increment_rows_spilled();
        }
        Ok(())
    }

    fn spawn_ticker(self: &Arc<Self>) -> Option<(mpsc::Sender<()>, JoinHandle<()>)> {
        let (stop, stopped) = mpsc::channel::<()>();
        let query = Arc::clone(self);
        let interval = self.timeline_interval;

        let spawned = thread::Builder::new()
            .name(format!("log-query-{}-timeline", self.id))
            .spawn(move || loop {
                match stopped.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => query.fire_timelines(),
                    _ => break,
                }
            });

        match spawned {
            Ok(handle) => Some((stop, handle)),
            Err(e) => {
                warn!(query_id = self.id, error = %e, "failed to spawn timeline ticker");
                None
            }
        }
    }

    fn fire_timelines(&self) {
        if self.is_cancel_requested() {
            return;
        }
        let subscriptions: Vec<Arc<TimelineSubscription>> = match self.timelines.read() {
            Ok(t) => t.clone(),
            Err(_) => return,
        };
        let count = self.result.size();
        for subscription in subscriptions {
            subscription.fire(self.id, count);
        }
        trace!(query_id = self.id, count, "timeline callbacks fired");
    }

    /// Moves to the terminal state `next` and closes the page registry under
    /// the state lock, so a subscriber that observes `next` can no longer be
    /// handed a final page. `None` if the transition is not allowed.
    fn terminate(&self, next: QueryState) -> Option<Vec<FinalNotice>> {
        let mut state = self.state.lock().ok()?;
        if !state.can_transition_to(next) {
            return None;
        }
        *state = next;
        Some(self.callbacks.close().unwrap_or_default())
    }

    fn mark_finished(&self) {
        if let Ok(mut times) = self.times.lock() {
            times.finished_at = Some(Utc::now());
        }
    }

    fn settle(&self) {
        if let Ok(mut settled) = self.settled.lock() {
            *settled = true;
        }
        self.settled_cv.notify_all();
    }

    fn finish_ended(&self) {
        let Some(notices) = self.terminate(QueryState::Ended) else {
            self.settle();
            return;
        };
        self.mark_finished();

        self.fire_timelines();

        let total = self.result.size();
        for notice in notices {
            if notice.never_fired && total > 0 {
                notice.callback.on_page_loaded(self.id, &self.result);
            }
            notice.callback.on_eof(self.id, total);
        }

        self.metrics.increment_queries_ended();
        info!(query_id = self.id, total_count = total, "log query ended");
        self.settle();
    }

    fn finish_cancelled(&self) {
        if self.terminate(QueryState::Cancelled).is_some() {
            self.mark_finished();
            self.metrics.increment_queries_cancelled();
            info!(
                query_id = self.id,
                rows = self.result.size(),
                "log query cancelled"
            );
        }
        self.settle();
    }

    fn finish_failed(&self, err: &QueryError) {
        let Some(notices) = self.terminate(QueryState::Cancelled) else {
            self.settle();
            return;
        };
        self.mark_finished();

        let reason = err.to_string();
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(reason.clone());
        }

        for notice in notices {
            notice.callback.on_failed(self.id, &reason);
        }

        self.result.close();
        self.metrics.increment_queries_failed();
        warn!(query_id = self.id, code = err.code(), error = %reason, "log query failed");
        self.settle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compiler::IterPipeline;
    use crate::query::errors::PipelineError;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    const WAIT: Duration = Duration::from_secs(10);

    fn rows(n: usize) -> impl Iterator<Item = Row> + Send {
        (0..n).map(|i| {
            let mut row = Row::new();
            row.insert("n".to_string(), json!(i));
            row.insert("_time".to_string(), json!(i as i64 * 1_000));
            row
        })
    }

    fn query_over(n: usize, dir: &TempDir) -> Arc<Query> {
        let options = QueryOptions {
            spill: SpillConfig::with_rows(dir.path(), 16),
            timeline_interval: Duration::from_millis(20),
        };
        Arc::new(Query::new(
            1,
            "table test",
            Box::new(IterPipeline::new(rows(n))),
            options,
            Arc::new(MetricsRegistry::new()),
        ))
    }

    #[derive(Default)]
    struct Recorder {
        limit: usize,
        pages: AtomicUsize,
        eofs: Mutex<Vec<usize>>,
        failures: Mutex<Vec<String>>,
    }

    impl PageCallback for Recorder {
        fn offset(&self) -> usize {
            0
        }
        fn limit(&self) -> usize {
            self.limit
        }
        fn on_page_loaded(&self, _: QueryId, _: &ResultBuffer) {
            self.pages.fetch_add(1, Ordering::SeqCst);
        }
        fn on_eof(&self, _: QueryId, total: usize) {
            self.eofs.lock().unwrap().push(total);
        }
        fn on_failed(&self, _: QueryId, reason: &str) {
            self.failures.lock().unwrap().push(reason.to_string());
        }
    }

    fn recorder(limit: usize) -> Arc<Recorder> {
        Arc::new(Recorder {
            limit,
            ..Default::default()
        })
    }

    #[test]
    fn test_runs_to_end() {
        let dir = TempDir::new().unwrap();
        let query = query_over(40, &dir);
        let rec = recorder(10);
        query.register_page_callback(rec.clone()).unwrap();

        query.start().unwrap();
        assert!(query.wait(WAIT));

        assert_eq!(query.state(), QueryState::Ended);
        assert_eq!(query.result().size(), 40);
        assert!(query.result().is_spilled());
        assert_eq!(rec.pages.load(Ordering::SeqCst), 4);
        assert_eq!(*rec.eofs.lock().unwrap(), vec![40]);
    }

    #[test]
    fn test_start_twice_is_invalid() {
        let dir = TempDir::new().unwrap();
        let query = query_over(1, &dir);
        query.start().unwrap();

        let err = query.start().unwrap_err();
        assert_eq!(err.code(), "LOGQ_INVALID_STATE");
        assert!(query.wait(WAIT));
    }

    #[test]
    fn test_cancel_before_start() {
        let dir = TempDir::new().unwrap();
        let query = query_over(10, &dir);
        query.cancel();
        query.cancel();

        assert_eq!(query.state(), QueryState::Cancelled);
        assert_eq!(query.result().size(), 0);
        assert!(query.wait(Duration::from_millis(1)));
        assert!(query.start().is_err());
    }

    #[test]
    fn test_small_query_gets_partial_page_then_eof() {
        let dir = TempDir::new().unwrap();
        let query = query_over(7, &dir);
        let rec = recorder(100);
        query.register_page_callback(rec.clone()).unwrap();

        query.start().unwrap();
        assert!(query.wait(WAIT));

        assert_eq!(rec.pages.load(Ordering::SeqCst), 1);
        assert_eq!(*rec.eofs.lock().unwrap(), vec![7]);
    }

    #[test]
    fn test_register_after_end_fires_eof_once() {
        let dir = TempDir::new().unwrap();
        let query = query_over(5, &dir);
        query.start().unwrap();
        assert!(query.wait(WAIT));

        let rec = recorder(2);
        assert_eq!(query.register_page_callback(rec.clone()).unwrap(), None);
        assert_eq!(rec.pages.load(Ordering::SeqCst), 0);
        assert_eq!(*rec.eofs.lock().unwrap(), vec![5]);
    }

    #[test]
    fn test_pipeline_failure_cancels_and_notifies() {
        struct Failing(usize);
        impl Pipeline for Failing {
            fn next_row(&mut self) -> Result<Option<Row>, PipelineError> {
                if self.0 == 0 {
                    return Err(PipelineError("source went away".into()));
                }
                self.0 -= 1;
                Ok(Some(Row::new()))
            }
        }

        let query = Arc::new(Query::new(
            9,
            "broken",
            Box::new(Failing(3)),
            QueryOptions::default(),
            Arc::new(MetricsRegistry::new()),
        ));
        let rec = recorder(100);
        query.register_page_callback(rec.clone()).unwrap();

        query.start().unwrap();
        assert!(query.wait(WAIT));

        assert_eq!(query.state(), QueryState::Cancelled);
        assert!(query.failure().unwrap().contains("source went away"));
        assert_eq!(rec.failures.lock().unwrap().len(), 1);
        assert!(rec.eofs.lock().unwrap().is_empty());
        assert!(query.result().is_closed());
    }

    #[test]
    fn test_no_timeline_push_once_cancel_requested() {
        struct Counting(AtomicUsize);
        impl TimelineCallback for Counting {
            fn on_timeline(&self, _: QueryId, _: &crate::timeline::TimelineSnapshot, _: usize) {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }

        let dir = TempDir::new().unwrap();
        let query = query_over(3, &dir);
        let timeline = Arc::new(Counting(AtomicUsize::new(0)));
        query.register_timeline_callback(timeline.clone()).unwrap();

        query.fire_timelines();
        assert_eq!(timeline.0.load(Ordering::SeqCst), 1);

        query.cancel();
        query.fire_timelines();
        assert_eq!(timeline.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_on_cancelled_is_invalid() {
        let dir = TempDir::new().unwrap();
        let query = query_over(1, &dir);
        query.cancel();
        assert!(query.register_page_callback(recorder(1)).is_err());
    }
}
