//! Query state machine
//!
//! ```text
//! Created ──start──▶ Running ──exhausted──▶ Ended
//!    │                  │
//!    └──cancel──▶ Cancelled ◀──cancel / failure
//! ```
//!
//! Transitions are monotonic. Nothing leaves a terminal state.

use std::fmt;

use serde::Serialize;

/// Lifecycle state of a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryState {
    /// Compiled, not started
    Created,
    /// Producing rows on its own thread
    Running,
    /// Pipeline exhausted its input
    Ended,
    /// Cancelled explicitly, by session loss, or by a fatal failure
    Cancelled,
}

impl QueryState {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryState::Created => "created",
            QueryState::Running => "running",
            QueryState::Ended => "ended",
            QueryState::Cancelled => "cancelled",
        }
    }

    /// Ended or Cancelled
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueryState::Ended | QueryState::Cancelled)
    }

    /// Whether `self → next` is a legal transition.
    pub fn can_transition_to(&self, next: QueryState) -> bool {
        matches!(
            (self, next),
            (QueryState::Created, QueryState::Running)
                | (QueryState::Created, QueryState::Cancelled)
                | (QueryState::Running, QueryState::Ended)
                | (QueryState::Running, QueryState::Cancelled)
        )
    }
}

impl fmt::Display for QueryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions() {
        assert!(QueryState::Created.can_transition_to(QueryState::Running));
        assert!(QueryState::Created.can_transition_to(QueryState::Cancelled));
        assert!(QueryState::Running.can_transition_to(QueryState::Ended));
        assert!(QueryState::Running.can_transition_to(QueryState::Cancelled));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for terminal in [QueryState::Ended, QueryState::Cancelled] {
            assert!(terminal.is_terminal());
            for next in [
                QueryState::Created,
                QueryState::Running,
                QueryState::Ended,
                QueryState::Cancelled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_no_skipping_running() {
        assert!(!QueryState::Created.can_transition_to(QueryState::Ended));
        assert!(!QueryState::Running.can_transition_to(QueryState::Created));
    }
}
