//! CLI command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::observability::{init_logging, ObservabilityError};
use crate::query::LogSetCompiler;
use crate::service::{query_channel, ChannelPush, LogQueryService, PushReceiver, StartQuery};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_rows, write_line, write_response};

/// Organization pushes are addressed to
const CLI_ORG: &str = "local";

/// Parse arguments, set up logging and run the command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match init_logging(&cli.log_level) {
        Ok(()) | Err(ObservabilityError::AlreadyInitialized) => {}
        Err(e) => return Err(e.into()),
    }
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run {
            data,
            table,
            query,
            offset,
            limit,
            timeline,
            config,
        } => run_query(&RunOptions {
            data,
            table,
            query,
            offset,
            limit,
            timeline,
            config,
        }),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Arguments of the `run` command
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// JSON-lines data file
    pub data: PathBuf,
    /// Table the rows are registered under
    pub table: String,
    /// Query text
    pub query: String,
    /// First row of each pushed page
    pub offset: usize,
    /// Rows per pushed page
    pub limit: usize,
    /// Buckets per timeline
    pub timeline: Option<usize>,
    /// Engine configuration file
    pub config: Option<PathBuf>,
}

/// Load the config file, or defaults when none is given
fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::load(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Run one query to completion, printing every pushed message
pub fn run_query(options: &RunOptions) -> CliResult<()> {
    let config = load_config(options.config.as_deref())?;
    let rows = read_rows(&options.data)?;
    info!(rows = rows.len(), table = %options.table, "loaded rows");

    let compiler = LogSetCompiler::new();
    compiler.add_table(options.table.clone(), rows);

    let (push, mut receiver) = ChannelPush::new();
    let service = LogQueryService::new(config, Arc::new(compiler), Arc::new(push));

    // One throwaway session per run; closing it releases the query.
    let session = Uuid::new_v4().to_string();
    let id = service.create_query(&options.query, &session)?;
    service.start_query(StartQuery {
        org_id: CLI_ORG.to_string(),
        id,
        offset: options.offset,
        limit: options.limit,
        timeline_limit: options.timeline,
        timeline_span: None,
    })?;

    let result_channel = query_channel(&service.config().channel_resource, id);
    let outcome = drain(&mut receiver, &result_channel);

    debug!(metrics = %service.metrics().to_json(), "query finished");
    service.session_closed(&session);
    outcome
}

/// Print pushed messages until the result channel reports eof or failure
fn drain(receiver: &mut PushReceiver, result_channel: &str) -> CliResult<()> {
    while let Some(message) = receiver.blocking_recv() {
        write_line(&message)?;

        if message.channel != result_channel {
            continue;
        }
        match message.payload.get("type").and_then(Value::as_str) {
            Some("eof") => return Ok(()),
            Some("failed") => {
                let reason = message
                    .payload
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown failure");
                return Err(CliError::Aborted(reason.to_string()));
            }
            _ => {}
        }
    }
    Err(CliError::Aborted("push channel closed".into()))
}

/// Validate a config file and print the effective settings
pub fn check_config(path: &Path) -> CliResult<()> {
    let config = EngineConfig::load(path)?;
    write_response(serde_json::to_value(&config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_rows(dir: &TempDir, n: usize) -> PathBuf {
        let path = dir.path().join("rows.jsonl");
        let body: String = (0..n)
            .map(|i| format!("{{\"n\":{},\"_time\":{}}}\n", i, i * 1000))
            .collect();
        fs::write(&path, body).unwrap();
        path
    }

    fn options(dir: &TempDir, data: PathBuf, query: &str) -> RunOptions {
        let config = dir.path().join("engine.json");
        fs::write(
            &config,
            format!(
                r#"{{"spill_dir": {}, "memory_row_threshold": 4}}"#,
                serde_json::to_string(dir.path()).unwrap()
            ),
        )
        .unwrap();

        RunOptions {
            data,
            table: "logs".into(),
            query: query.into(),
            offset: 0,
            limit: 5,
            timeline: Some(3),
            config: Some(config),
        }
    }

    #[test]
    fn test_run_query_to_eof() {
        let dir = TempDir::new().unwrap();
        let data = write_rows(&dir, 12);
        run_query(&options(&dir, data, "table logs | limit 8")).unwrap();
    }

    #[test]
    fn test_run_query_compile_error() {
        let dir = TempDir::new().unwrap();
        let data = write_rows(&dir, 1);
        let err = run_query(&options(&dir, data, "table other")).unwrap_err();
        assert_eq!(err.code(), "LOGQ_COMPILE_ERROR");
    }

    #[test]
    fn test_check_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("engine.json");
        fs::write(&path, r#"{"default_timeline_size": 0}"#).unwrap();
        assert_eq!(check_config(&path).unwrap_err().code(), "LOGQ_CONFIG_INVALID");

        fs::write(&path, "{}").unwrap();
        check_config(&path).unwrap();
    }
}
