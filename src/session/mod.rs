//! Session lifecycle coupling
//!
//! No query may outlive the session that created it.

mod tracker;

pub use tracker::{SessionId, SessionQueryTracker};
