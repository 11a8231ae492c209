//! Query lifecycle
//!
//! A query is compiled into a pull-based `Pipeline`, registered in the
//! `QueryRegistry`, and executed on its own thread once started. Rows land in
//! the query's `ResultBuffer`; page and timeline subscribers are notified as
//! results accumulate.
//!
//! ```text
//! QueryRegistry::create ──▶ Query (Created) ──start──▶ log-query-<id> thread
//!                                                   │
//!                     ResultBuffer ◀── rows ────────┤
//!                TimelineAggregator ◀── timestamps ─┤
//!           page / timeline callbacks ◀── progress ─┘
//! ```

mod callback;
mod compiler;
mod errors;
#[allow(clippy::module_inception)]
mod query;
mod registry;
mod state;

/// Query identifier, allocated by the registry starting at 1
pub type QueryId = u32;

pub use callback::{
    CallbackId, CallbackRegistry, FinalNotice, PageCallback, Registration, TimelineCallback,
    TimelineSubscription,
};
pub use compiler::{IterPipeline, LogSetCompiler, Pipeline, QueryCompiler};
pub use errors::{CompileError, PipelineError, QueryError, QueryResult};
pub use query::{Query, QueryOptions, QuerySummary};
pub use registry::QueryRegistry;
pub use state::QueryState;
