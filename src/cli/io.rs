//! JSON I/O handling for CLI
//!
//! - Input: JSON-lines row files, one object per line
//! - Output: one JSON object per line on stdout
//! - UTF-8 only

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use super::errors::{CliError, CliResult};
use crate::buffer::Row;

/// Reads rows from a JSON-lines file. Blank lines are skipped.
pub fn read_rows(path: &Path) -> CliResult<Vec<Row>> {
    read_rows_from(BufReader::new(File::open(path)?))
}

/// Reads JSON-lines rows from any reader.
pub fn read_rows_from<R: BufRead>(reader: R) -> CliResult<Vec<Row>> {
    let mut rows = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(&line).map_err(|e| CliError::Data {
            line: index + 1,
            message: e.to_string(),
        })?;
        match value {
            Value::Object(map) => rows.push(map.into_iter().collect()),
            _ => {
                return Err(CliError::Data {
                    line: index + 1,
                    message: "expected a JSON object".into(),
                })
            }
        }
    }
    Ok(rows)
}

/// Writes one JSON line to stdout
pub fn write_line<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&serde_json::json!({
        "status": "ok",
        "data": data
    }))
}
