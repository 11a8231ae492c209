//! CLI argument definitions using clap
//!
//! Commands:
//! - logquery run --data <rows.jsonl> --table <name> --query <text>
//! - logquery check-config --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Log query engine: runs a query over JSON-lines logs and streams results
#[derive(Parser, Debug)]
#[command(name = "logquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log filter directive (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a query and print every pushed event as a JSON line
    Run {
        /// JSON-lines file, one row object per line
        #[arg(long)]
        data: PathBuf,

        /// Table name the rows are registered under
        #[arg(long, default_value = "logs")]
        table: String,

        /// Query text, e.g. "table logs | search level == \"error\" | limit 10"
        #[arg(long)]
        query: String,

        /// First row of each pushed page
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Rows per pushed page
        #[arg(long, default_value_t = 100)]
        limit: usize,

        /// Buckets per timeline
        #[arg(long)]
        timeline: Option<usize>,

        /// Path to engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file and print the effective settings
    CheckConfig {
        /// Path to engine configuration file
        #[arg(long, default_value = "./logquery.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
