//! Query registry
//!
//! Allocates query ids and owns every live `Query`. Lookups hand out `Arc`
//! clones, so a query being removed stays valid for callers already holding
//! it; removal cancels it, joins its thread and releases its buffer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use super::compiler::QueryCompiler;
use super::errors::{QueryError, QueryResult};
use super::query::{Query, QueryOptions};
use super::QueryId;
use crate::observability::MetricsRegistry;

/// Registry of live queries, keyed by id.
pub struct QueryRegistry {
    compiler: Arc<dyn QueryCompiler>,
    options: QueryOptions,
    next_id: AtomicU32,
    queries: RwLock<HashMap<QueryId, Arc<Query>>>,
    metrics: Arc<MetricsRegistry>,
}

impl QueryRegistry {
    /// Creates an empty registry. Ids start at 1.
    pub fn new(
        compiler: Arc<dyn QueryCompiler>,
        options: QueryOptions,
        metrics: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            compiler,
            options,
            next_id: AtomicU32::new(1),
            queries: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    /// Compiles `text` and registers a new query in the `Created` state.
    ///
    /// # Errors
    ///
    /// `Compile` if the text is invalid; no query is registered then.
    pub fn create(&self, text: &str) -> QueryResult<Arc<Query>> {
        let pipeline = self.compiler.compile(text)?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let query = Arc::new(Query::new(
            id,
            text,
            pipeline,
            self.options.clone(),
            Arc::clone(&self.metrics),
        ));

        self.queries
            .write()
            .map_err(|_| QueryError::Internal("Lock poisoned".into()))?
            .insert(id, Arc::clone(&query));

        self.metrics.increment_queries_created();
        info!(query_id = id, query = %text, "log query created");
        Ok(query)
    }

    /// Looks up a query. `None` if unknown or removed.
    pub fn get(&self, id: QueryId) -> Option<Arc<Query>> {
        self.queries.read().ok().and_then(|q| q.get(&id).cloned())
    }

    /// Looks up a query, failing with `NotFound`.
    pub fn require(&self, id: QueryId) -> QueryResult<Arc<Query>> {
        self.get(id).ok_or(QueryError::NotFound(id))
    }

    /// Removes a query, cancelling it and releasing its result buffer.
    /// Returns whether it was present; removing an unknown id is a no-op.
    pub fn remove(&self, id: QueryId) -> bool {
        let removed = match self.queries.write() {
            Ok(mut queries) => queries.remove(&id),
            Err(_) => None,
        };

        match removed {
            Some(query) => {
                // Outside the map lock: release may wait for the query thread.
                query.release();
                self.metrics.increment_queries_removed();
                info!(query_id = id, "log query removed");
                true
            }
            None => {
                debug!(query_id = id, "remove of unknown log query ignored");
                false
            }
        }
    }

    /// All live queries, ordered by id.
    pub fn list(&self) -> Vec<Arc<Query>> {
        let mut queries: Vec<Arc<Query>> = self
            .queries
            .read()
            .map(|q| q.values().cloned().collect())
            .unwrap_or_default();
        queries.sort_by_key(|q| q.id());
        queries
    }

    /// Number of live queries.
    pub fn len(&self) -> usize {
        self.queries.read().map(|q| q.len()).unwrap_or(0)
    }

    /// Returns true if no query is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shared metrics.
    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Removes every query. Used on service shutdown.
    pub fn clear(&self) {
        let ids: Vec<QueryId> = self.list().iter().map(|q| q.id()).collect();
        for id in ids {
            self.remove(id);
        }
    }
}

impl std::fmt::Debug for QueryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryRegistry")
            .field("queries", &self.len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .finish()
    }
}
