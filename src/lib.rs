//! logquery - Log query execution and streaming-result engine
//!
//! Runs each submitted query on its own thread, buffers its (possibly very
//! large) result set with spill-to-disk, and streams paged results and
//! timeline histograms to remote subscribers. Queries never outlive the
//! session that created them.

pub mod buffer;
pub mod cli;
pub mod config;
pub mod observability;
pub mod query;
pub mod service;
pub mod session;
pub mod timeline;

pub use buffer::{ResultBuffer, Row};
pub use config::EngineConfig;
pub use query::{Query, QueryError, QueryId, QueryRegistry, QueryState};
pub use service::{LogQueryService, StartQuery};
pub use session::SessionQueryTracker;
