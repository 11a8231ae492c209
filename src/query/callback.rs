//! Page and timeline subscribers
//!
//! Subscribers are trait objects. The registry only decides *which*
//! callbacks are due; the query fires them after releasing the registry lock
//! so a slow subscriber never stalls row production for long.

use std::sync::{Arc, Mutex};

use super::errors::{QueryError, QueryResult};
use super::QueryId;
use crate::buffer::{ResultBuffer, Row};
use crate::timeline::{TimelineAggregator, TimelineSnapshot, TimelineSpan, DEFAULT_TIMELINE_SIZE};

/// Handle returned when a page callback is registered
pub type CallbackId = u64;

/// Subscriber notified as pages of results become available.
pub trait PageCallback: Send + Sync {
    /// First row of the subscriber's page.
    fn offset(&self) -> usize;

    /// Page size; also the number of new rows between notifications.
    fn limit(&self) -> usize;

    /// A page worth of new rows is available.
    fn on_page_loaded(&self, query_id: QueryId, result: &ResultBuffer);

    /// The query ended normally with `total_count` rows.
    fn on_eof(&self, query_id: QueryId, total_count: usize);

    /// The query was terminated by a failure.
    fn on_failed(&self, _query_id: QueryId, _reason: &str) {}
}

/// Subscriber receiving periodic timestamp histograms.
pub trait TimelineCallback: Send + Sync {
    /// Bucket width and timestamp field.
    fn span(&self) -> TimelineSpan {
        TimelineSpan::default()
    }

    /// Number of buckets to retain.
    fn size(&self) -> usize {
        DEFAULT_TIMELINE_SIZE
    }

    /// Current bucket window plus the number of rows produced so far.
    fn on_timeline(&self, query_id: QueryId, snapshot: &TimelineSnapshot, count: usize);
}

/// Outcome of registering a page callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Callback is attached and will be notified
    Registered(CallbackId),
    /// The query already ended; the caller delivers eof immediately
    AlreadyEnded,
}

struct PageEntry {
    id: CallbackId,
    callback: Arc<dyn PageCallback>,
    /// Rows produced since the last notification
    pending: usize,
    fired: bool,
}

#[derive(Default)]
struct RegistryInner {
    next_id: CallbackId,
    pages: Vec<PageEntry>,
    closed: bool,
}

/// Per-query set of page subscribers, in registration order.
#[derive(Default)]
pub struct CallbackRegistry {
    inner: Mutex<RegistryInner>,
}

/// A callback due for its final notification
pub struct FinalNotice {
    /// The subscriber
    pub callback: Arc<dyn PageCallback>,
    /// Whether it has never received a page
    pub never_fired: bool,
}

impl CallbackRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> QueryResult<std::sync::MutexGuard<'_, RegistryInner>> {
        self.inner
            .lock()
            .map_err(|_| QueryError::Internal("Lock poisoned".into()))
    }

    /// Adds a subscriber unless the registry was already closed by the end
    /// of the query.
    pub fn register(&self, callback: Arc<dyn PageCallback>) -> QueryResult<Registration> {
        let mut inner = self.lock()?;
        if inner.closed {
            return Ok(Registration::AlreadyEnded);
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.pages.push(PageEntry {
            id,
            callback,
            pending: 0,
            fired: false,
        });
        Ok(Registration::Registered(id))
    }

    /// Removes a subscriber. Returns whether it was present.
    pub fn unregister(&self, id: CallbackId) -> QueryResult<bool> {
        let mut inner = self.lock()?;
        let before = inner.pages.len();
        inner.pages.retain(|e| e.id != id);
        Ok(inner.pages.len() != before)
    }

    /// Records `produced` new rows and returns the callbacks whose page is due.
    pub fn on_rows(&self, produced: usize) -> QueryResult<Vec<Arc<dyn PageCallback>>> {
        let mut inner = self.lock()?;
        let mut due = Vec::new();
        for entry in inner.pages.iter_mut() {
            entry.pending += produced;
            if entry.pending >= entry.callback.limit().max(1) {
                entry.pending = 0;
                entry.fired = true;
                due.push(Arc::clone(&entry.callback));
            }
        }
        Ok(due)
    }

    /// Closes the registry and hands back every subscriber, in registration
    /// order, for its final notification. Later registrations see
    /// `AlreadyEnded`.
    pub fn close(&self) -> QueryResult<Vec<FinalNotice>> {
        let mut inner = self.lock()?;
        inner.closed = true;
        Ok(inner
            .pages
            .drain(..)
            .map(|e| FinalNotice {
                callback: e.callback,
                never_fired: !e.fired,
            })
            .collect())
    }

    /// Number of attached subscribers.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|i| i.pages.len()).unwrap_or(0)
    }

    /// Returns true if no subscriber is attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A timeline subscriber paired with its aggregator.
pub struct TimelineSubscription {
    callback: Arc<dyn TimelineCallback>,
    aggregator: Mutex<TimelineAggregator>,
}

impl TimelineSubscription {
    /// Builds the aggregator from the callback's span and size.
    pub fn new(callback: Arc<dyn TimelineCallback>) -> Self {
        let aggregator = TimelineAggregator::new(callback.span(), callback.size());
        Self {
            callback,
            aggregator: Mutex::new(aggregator),
        }
    }

    /// Feeds the row's timestamp, if it carries one.
    pub fn observe_row(&self, row: &Row) {
        if let Ok(mut aggregator) = self.aggregator.lock() {
            let span = aggregator.span();
            let millis = row
                .get(&span.time_field)
                .and_then(|value| span.extract_millis(value));
            if let Some(millis) = millis {
                aggregator.observe(millis);
            }
        }
    }

    /// Current window of the aggregator.
    pub fn snapshot(&self) -> Option<TimelineSnapshot> {
        self.aggregator.lock().ok().map(|a| a.snapshot())
    }

    /// Timestamps ignored because they predate the window.
    pub fn dropped(&self) -> u64 {
        self.aggregator.lock().map(|a| a.dropped()).unwrap_or(0)
    }

    /// Snapshots the aggregator and notifies the subscriber.
    pub fn fire(&self, query_id: QueryId, count: usize) {
        if let Some(snapshot) = self.snapshot() {
            self.callback.on_timeline(query_id, &snapshot, count);
        }
    }
}
