//! CLI module for the log query engine
//!
//! Provides command-line interface for:
//! - run: execute a query over a JSON-lines file and stream its events
//! - check-config: validate an engine configuration file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check_config, run, run_command, run_query, RunOptions};
pub use errors::{CliError, CliResult};
pub use io::{read_rows, read_rows_from, write_line, write_response};
