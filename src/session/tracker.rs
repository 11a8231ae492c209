//! Session ownership of queries
//!
//! The tracker only records which session created which query. It never
//! keeps a query alive: lifetime belongs to the `QueryRegistry`, and a
//! session close is routed back through the registry to cancel and remove.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, info, warn};

use crate::query::{Query, QueryError, QueryId, QueryRegistry, QueryResult};

/// Opaque session identifier supplied by the transport layer
pub type SessionId = String;

/// Maps sessions to the queries they created.
pub struct SessionQueryTracker {
    registry: Arc<QueryRegistry>,
    sessions: Mutex<HashMap<SessionId, Vec<QueryId>>>,
}

impl SessionQueryTracker {
    /// Creates a tracker routing removals through `registry`.
    pub fn new(registry: Arc<QueryRegistry>) -> Self {
        Self {
            registry,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> QueryResult<MutexGuard<'_, HashMap<SessionId, Vec<QueryId>>>> {
        self.sessions
            .lock()
            .map_err(|_| QueryError::Internal("Lock poisoned".into()))
    }

    /// Compiles `text` into a new query owned by `session`.
    ///
    /// Creation and ownership are recorded under the session lock, so a
    /// concurrent `on_session_closed` either sees the new query or runs
    /// before it exists.
    pub fn create_owned(&self, session: &str, text: &str) -> QueryResult<Arc<Query>> {
        let mut sessions = self.lock()?;
        let query = self.registry.create(text)?;
        sessions
            .entry(session.to_string())
            .or_default()
            .push(query.id());
        Ok(query)
    }

    /// Records that `session` owns `id`.
    pub fn on_query_created(&self, session: &str, id: QueryId) -> QueryResult<()> {
        let mut sessions = self.lock()?;
        let owned = sessions.entry(session.to_string()).or_default();
        if !owned.contains(&id) {
            owned.push(id);
        }
        Ok(())
    }

    /// Forgets `id` after an explicit removal.
    pub fn on_query_removed(&self, id: QueryId) {
        match self.lock() {
            Ok(mut sessions) => sessions.retain(|_, owned| {
                owned.retain(|q| *q != id);
                !owned.is_empty()
            }),
            Err(e) => warn!(query_id = id, error = %e, "session map unavailable"),
        }
    }

    /// Cancels and removes every query owned by `session`, then drops the
    /// session entry. Returns the ids that were owned.
    pub fn on_session_closed(&self, session: &str) -> Vec<QueryId> {
        let owned = match self.lock() {
            Ok(mut sessions) => sessions.remove(session).unwrap_or_default(),
            Err(e) => {
                warn!(session = session, error = %e, "session map unavailable");
                Vec::new()
            }
        };

        // Outside the session lock: removal joins each query thread.
        for id in &owned {
            if let Some(query) = self.registry.get(*id) {
                query.cancel();
            }
            self.registry.remove(*id);
        }

        if owned.is_empty() {
            debug!(session = session, "closed session owned no log queries");
        } else {
            info!(session = session, queries = ?owned, "log queries of closed session removed");
        }
        owned
    }

    /// Ids owned by `session`, in creation order.
    pub fn queries_of(&self, session: &str) -> Vec<QueryId> {
        self.lock()
            .ok()
            .and_then(|s| s.get(session).cloned())
            .unwrap_or_default()
    }

    /// Number of sessions owning at least one query.
    pub fn session_count(&self) -> usize {
        self.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Row;
    use crate::observability::MetricsRegistry;
    use crate::query::{IterPipeline, Pipeline, QueryCompiler, QueryOptions, QueryState};
    use crate::query::CompileError;

    fn registry() -> Arc<QueryRegistry> {
        let compiler = |_: &str| -> Result<Box<dyn Pipeline>, CompileError> {
            Ok(Box::new(IterPipeline::new((0..3).map(|_| Row::new()))))
        };
        let compiler: Arc<dyn QueryCompiler> = Arc::new(compiler);
        Arc::new(QueryRegistry::new(
            compiler,
            QueryOptions::default(),
            Arc::new(MetricsRegistry::new()),
        ))
    }

    #[test]
    fn test_session_close_removes_owned_queries() {
        let registry = registry();
        let tracker = SessionQueryTracker::new(Arc::clone(&registry));

        let a = registry.create("a").unwrap();
        let b = registry.create("b").unwrap();
        let other = registry.create("c").unwrap();
        tracker.on_query_created("s1", a.id()).unwrap();
        tracker.on_query_created("s1", b.id()).unwrap();
        tracker.on_query_created("s2", other.id()).unwrap();

        let removed = tracker.on_session_closed("s1");

        assert_eq!(removed, vec![a.id(), b.id()]);
        assert!(registry.get(a.id()).is_none());
        assert!(registry.get(b.id()).is_none());
        assert_eq!(a.state(), QueryState::Cancelled);
        assert!(registry.get(other.id()).is_some());
        assert_eq!(tracker.session_count(), 1);
    }

    #[test]
    fn test_explicit_removal_clears_entry() {
        let registry = registry();
        let tracker = SessionQueryTracker::new(Arc::clone(&registry));
        let query = registry.create("a").unwrap();
        tracker.on_query_created("s1", query.id()).unwrap();

        tracker.on_query_removed(query.id());

        assert!(tracker.queries_of("s1").is_empty());
        assert_eq!(tracker.session_count(), 0);
    }

    #[test]
    fn test_close_during_create_removes_new_query() {
        use std::sync::Barrier;
        use std::thread;
        use std::time::Duration;

        let compiling = Arc::new(Barrier::new(2));
        let gate = Arc::clone(&compiling);
        let compiler = move |_: &str| -> Result<Box<dyn Pipeline>, CompileError> {
            gate.wait();
            thread::sleep(Duration::from_millis(20));
            Ok(Box::new(IterPipeline::new((0..3).map(|_| Row::new()))))
        };
        let compiler: Arc<dyn QueryCompiler> = Arc::new(compiler);
        let registry = Arc::new(QueryRegistry::new(
            compiler,
            QueryOptions::default(),
            Arc::new(MetricsRegistry::new()),
        ));
        let tracker = Arc::new(SessionQueryTracker::new(Arc::clone(&registry)));

        let creator = {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || tracker.create_owned("s1", "slow").unwrap().id())
        };
        compiling.wait();
        let closer = {
            let tracker = Arc::clone(&tracker);
            thread::spawn(move || tracker.on_session_closed("s1"))
        };

        let id = creator.join().unwrap();
        assert_eq!(closer.join().unwrap(), vec![id]);
        assert!(registry.is_empty());
        assert_eq!(tracker.session_count(), 0);
    }

    #[test]
    fn test_create_owned_records_owner() {
        let registry = registry();
        let tracker = SessionQueryTracker::new(Arc::clone(&registry));

        let a = tracker.create_owned("s1", "a").unwrap();
        let b = tracker.create_owned("s1", "b").unwrap();

        assert_eq!(tracker.queries_of("s1"), vec![a.id(), b.id()]);
        assert!(registry.get(a.id()).is_some());
    }

    #[test]
    fn test_poisoned_session_map_is_an_error() {
        let tracker = Arc::new(SessionQueryTracker::new(registry()));
        let poisoner = Arc::clone(&tracker);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.sessions.lock().unwrap();
            panic!("poison the session map");
        })
        .join();

        let err = tracker.create_owned("s1", "a").unwrap_err();
        assert!(matches!(err, QueryError::Internal(_)));
        assert!(tracker.on_query_created("s1", 1).is_err());
        assert!(tracker.on_session_closed("s1").is_empty());
    }

    #[test]
    fn test_unknown_session_close_is_noop() {
        let tracker = SessionQueryTracker::new(registry());
        assert!(tracker.on_session_closed("ghost").is_empty());
    }
}
