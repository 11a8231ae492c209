//! Structured logging setup
//!
//! The engine logs through `tracing`. Binaries install a `fmt` subscriber
//! once at startup; a `RUST_LOG` environment filter wins over the
//! configured level.

use tracing_subscriber::{fmt, EnvFilter};

use super::{ObservabilityError, ObservabilityResult};

/// Installs the global subscriber at `level` (an `EnvFilter` directive such
/// as `info` or `logquery=debug`).
///
/// # Errors
///
/// Fails if the directive does not parse or a subscriber is already
/// installed.
pub fn init_logging(level: &str) -> ObservabilityResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| ObservabilityError::InvalidLevel(format!("{}: {}", level, e)))?,
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|_| ObservabilityError::AlreadyInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let _ = init_logging("warn");
        assert!(matches!(
            init_logging("warn"),
            Err(ObservabilityError::AlreadyInitialized)
        ));
    }
}
