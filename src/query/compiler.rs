//! Query compiler contract and the in-memory reference compiler
//!
//! The engine never interprets query text itself. A `QueryCompiler` turns
//! text into a `Pipeline`, a pull-based row source the query's thread drains.
//!
//! `LogSetCompiler` is a deliberately small collaborator over named in-memory
//! tables, used by the CLI and tests:
//!
//! ```text
//! table <name> [| search <field> == <value>] [| fields a,b] [| limit <n>]
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::Value;

use super::errors::{CompileError, PipelineError};
use crate::buffer::Row;

/// Pull-based row source produced by compiling a query.
pub trait Pipeline: Send {
    /// Produces the next row, or `None` once the input is exhausted.
    fn next_row(&mut self) -> Result<Option<Row>, PipelineError>;
}

/// Turns query text into an executable pipeline.
pub trait QueryCompiler: Send + Sync {
    /// Compile `text`, failing with `CompileError` if it is invalid.
    fn compile(&self, text: &str) -> Result<Box<dyn Pipeline>, CompileError>;
}

impl<F> QueryCompiler for F
where
    F: Fn(&str) -> Result<Box<dyn Pipeline>, CompileError> + Send + Sync,
{
    fn compile(&self, text: &str) -> Result<Box<dyn Pipeline>, CompileError> {
        self(text)
    }
}

/// Adapts any row iterator into a pipeline.
pub struct IterPipeline<I> {
    rows: I,
}

impl<I> IterPipeline<I>
where
    I: Iterator<Item = Row> + Send,
{
    /// Wraps `rows`.
    pub fn new(rows: I) -> Self {
        Self { rows }
    }
}

impl<I> Pipeline for IterPipeline<I>
where
    I: Iterator<Item = Row> + Send,
{
    fn next_row(&mut self) -> Result<Option<Row>, PipelineError> {
        Ok(self.rows.next())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    Search { field: String, value: Value },
    Fields(Vec<String>),
    Limit(usize),
}

/// Compiler over named in-memory log tables.
#[derive(Debug, Default)]
pub struct LogSetCompiler {
    tables: RwLock<HashMap<String, Arc<Vec<Row>>>>,
}

impl LogSetCompiler {
    /// Creates a compiler with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a table.
    pub fn add_table(&self, name: impl Into<String>, rows: Vec<Row>) {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(name.into(), Arc::new(rows));
        }
    }

    /// Names of the registered tables, sorted.
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tables
            .read()
            .map(|t| t.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    fn parse_stage(command: &str) -> Result<Stage, CompileError> {
        let (keyword, rest) = command
            .split_once(char::is_whitespace)
            .map(|(k, r)| (k, r.trim()))
            .unwrap_or((command, ""));

        match keyword {
            "search" => {
                let (field, value) = rest.split_once("==").ok_or_else(|| {
                    CompileError::new(format!("search expects <field> == <value>: {}", command))
                })?;
                let field = field.trim();
                if field.is_empty() {
                    return Err(CompileError::new("search field is empty"));
                }
                Ok(Stage::Search {
                    field: field.to_string(),
                    value: parse_literal(value.trim()),
                })
            }
            "fields" => {
                let fields: Vec<String> = rest
                    .split(',')
                    .map(|f| f.trim().to_string())
                    .filter(|f| !f.is_empty())
                    .collect();
                if fields.is_empty() {
                    return Err(CompileError::new("fields expects at least one field"));
                }
                Ok(Stage::Fields(fields))
            }
            "limit" => rest
                .parse::<usize>()
                .map(Stage::Limit)
                .map_err(|_| CompileError::new(format!("limit expects a count: {}", command))),
            "table" => Err(CompileError::new("table must be the first command")),
            other => Err(CompileError::new(format!("unknown command: {}", other))),
        }
    }
}

impl QueryCompiler for LogSetCompiler {
    fn compile(&self, text: &str) -> Result<Box<dyn Pipeline>, CompileError> {
        let mut commands = text.split('|').map(str::trim);

        let source = commands.next().unwrap_or("");
        let name = source
            .strip_prefix("table")
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| CompileError::new("query must start with 'table <name>'"))?;

        let rows = self
            .tables
            .read()
            .map_err(|_| CompileError::new("table catalog unavailable"))?
            .get(name)
            .cloned()
            .ok_or_else(|| CompileError::new(format!("table not found: {}", name)))?;

        let stages = commands
            .map(Self::parse_stage)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Box::new(LogSetPipeline {
            rows,
            position: 0,
            emitted: 0,
            stages,
        }))
    }
}

fn parse_literal(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

struct LogSetPipeline {
    rows: Arc<Vec<Row>>,
    position: usize,
    emitted: usize,
    stages: Vec<Stage>,
}

impl Pipeline for LogSetPipeline {
    fn next_row(&mut self) -> Result<Option<Row>, PipelineError> {
        'rows: while self.position < self.rows.len() {
            let mut row = self.rows[self.position].clone();
            self.position += 1;

            for stage in &self.stages {
                match stage {
                    Stage::Search { field, value } => {
                        if row.get(field) != Some(value) {
                            continue 'rows;
                        }
                    }
                    Stage::Fields(fields) => {
                        row.retain(|k, _| fields.contains(k));
                    }
                    Stage::Limit(n) => {
                        if self.emitted >= *n {
                            self.position = self.rows.len();
                            return Ok(None);
                        }
                    }
                }
            }

            self.emitted += 1;
            return Ok(Some(row));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn log_row(n: i64, status: i64) -> Row {
        let mut row = Row::new();
        row.insert("_time".to_string(), json!(n * 1_000));
        row.insert("status".to_string(), json!(status));
        row.insert("line".to_string(), json!(format!("request {}", n)));
        row
    }

    fn compiler() -> LogSetCompiler {
        let compiler = LogSetCompiler::new();
        compiler.add_table(
            "web",
            (0..10).map(|n| log_row(n, if n % 2 == 0 { 200 } else { 500 })).collect(),
        );
        compiler
    }

    fn drain(mut pipeline: Box<dyn Pipeline>) -> Vec<Row> {
        let mut rows = Vec::new();
        while let Some(row) = pipeline.next_row().unwrap() {
            rows.push(row);
        }
        rows
    }

    #[test]
    fn test_table_scan() {
        let rows = drain(compiler().compile("table web").unwrap());
        assert_eq!(rows.len(), 10);
    }

    #[test]
    fn test_search_fields_limit() {
        let rows = drain(
            compiler()
                .compile("table web | search status == 500 | fields line | limit 2")
                .unwrap(),
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys().collect::<Vec<_>>(), vec!["line"]);
        assert_eq!(rows[0]["line"], json!("request 1"));
    }

    #[test]
    fn test_compile_errors() {
        let compiler = compiler();
        assert!(compiler.compile("").is_err());
        assert!(compiler.compile("table").is_err());
        assert!(compiler.compile("table missing").is_err());
        assert!(compiler.compile("table web | explode").is_err());
        assert!(compiler.compile("table web | limit lots").is_err());
        assert!(compiler.compile("table web | table web").is_err());
    }

    #[test]
    fn test_closure_compiler() {
        let compiler = |_: &str| -> Result<Box<dyn Pipeline>, CompileError> {
            Ok(Box::new(IterPipeline::new((0..3).map(|n| log_row(n, 200)))))
        };
        assert_eq!(drain(compiler.compile("anything").unwrap()).len(), 3);
    }
}
