//! Log query service facade
//!
//! Ties the registry, session ownership and the push layer together behind
//! the operations a transport exposes to clients.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::callbacks::{query_channel, timeline_channel, PushPageCallback, PushTimelineCallback};
use super::push::PushApi;
use crate::buffer::Row;
use crate::config::EngineConfig;
use crate::observability::MetricsRegistry;
use crate::query::{
    PageCallback, QueryCompiler, QueryError, QueryId, QueryRegistry, QueryResult, QuerySummary,
    TimelineCallback,
};
use crate::session::SessionQueryTracker;
use crate::timeline::TimelineSpan;

/// Parameters of `start_query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartQuery {
    /// Organization that receives pushes
    pub org_id: String,
    /// Query to start
    pub id: QueryId,
    /// First row of the pushed page
    pub offset: usize,
    /// Page size
    pub limit: usize,
    /// Buckets per timeline (engine default when absent)
    #[serde(default)]
    pub timeline_limit: Option<usize>,
    /// Timeline bucket width (one minute when absent)
    #[serde(default)]
    pub timeline_span: Option<TimelineSpan>,
}

/// A window of results plus the current total
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultPage {
    /// Rows in the requested window
    pub result: Vec<Row>,
    /// Rows produced so far
    pub count: usize,
}

/// Service facade over the query engine.
pub struct LogQueryService {
    config: EngineConfig,
    registry: Arc<QueryRegistry>,
    sessions: SessionQueryTracker,
    push: Arc<dyn PushApi>,
    metrics: Arc<MetricsRegistry>,
}

impl LogQueryService {
    /// Creates the service.
    pub fn new(
        config: EngineConfig,
        compiler: Arc<dyn QueryCompiler>,
        push: Arc<dyn PushApi>,
    ) -> Self {
        let metrics = Arc::new(MetricsRegistry::new());
        let registry = Arc::new(QueryRegistry::new(
            compiler,
            config.query_options(),
            Arc::clone(&metrics),
        ));
        let sessions = SessionQueryTracker::new(Arc::clone(&registry));

        info!(
            spill_dir = %config.spill_dir.display(),
            memory_rows = config.memory_row_threshold,
            resource = %config.channel_resource,
            "log query service started"
        );

        Self {
            config,
            registry,
            sessions,
            push,
            metrics,
        }
    }

    /// Compiles `text` and registers it under `session`.
    pub fn create_query(&self, text: &str, session: &str) -> QueryResult<QueryId> {
        let query = self.sessions.create_owned(session, text)?;
        Ok(query.id())
    }

    /// Cancels and removes a query. Unknown ids are ignored.
    pub fn remove_query(&self, id: QueryId) {
        self.sessions.on_query_removed(id);
        self.registry.remove(id);
    }

    /// Attaches push subscribers for the client and starts the query.
    ///
    /// A timeline subscriber is attached only when the request names a
    /// timeline size or span.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id, `InvalidState` unless the query is
    /// `Created`.
    pub fn start_query(&self, request: StartQuery) -> QueryResult<()> {
        let query = self.registry.require(request.id)?;
        let resource = &self.config.channel_resource;

        let page: Arc<dyn PageCallback> = Arc::new(PushPageCallback::new(
            request.org_id.clone(),
            query_channel(resource, request.id),
            request.offset,
            request.limit,
            Arc::clone(&self.push),
            Arc::clone(&self.metrics),
        ));

        let timeline = if request.timeline_limit.is_some() || request.timeline_span.is_some() {
            let callback: Arc<dyn TimelineCallback> = Arc::new(PushTimelineCallback::new(
                request.org_id,
                timeline_channel(resource, request.id),
                request.timeline_span.unwrap_or_default(),
                request
                    .timeline_limit
                    .unwrap_or(self.config.default_timeline_size),
                Arc::clone(&self.push),
                Arc::clone(&self.metrics),
            ));
            Some(callback)
        } else {
            None
        };

        query.start_with(Some(page), timeline)
    }

    /// Reads `limit` rows from `offset` of a query's results.
    pub fn get_result(&self, id: QueryId, offset: usize, limit: usize) -> QueryResult<ResultPage> {
        let query = self.registry.require(id)?;
        let result = query
            .result()
            .window(offset, limit)
            .map_err(|e| QueryError::from_buffer(id, e))?;

        Ok(ResultPage {
            result,
            count: query.result().size(),
        })
    }

    /// Summaries of all live queries, ordered by id.
    pub fn queries(&self) -> Vec<QuerySummary> {
        self.registry.list().iter().map(|q| q.summary()).collect()
    }

    /// Cancels and removes every query owned by `session`.
    pub fn session_closed(&self, session: &str) -> Vec<QueryId> {
        let removed = self.sessions.on_session_closed(session);
        self.metrics.increment_sessions_closed();
        removed
    }

    /// Query registry.
    pub fn registry(&self) -> &Arc<QueryRegistry> {
        &self.registry
    }

    /// Session ownership.
    pub fn sessions(&self) -> &SessionQueryTracker {
        &self.sessions
    }

    /// Engine metrics.
    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl Drop for LogQueryService {
    fn drop(&mut self) {
        self.registry.clear();
    }
}
