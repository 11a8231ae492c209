//! Ordered result row store with transparent spill to disk
//!
//! The first rows of a result live in memory. Once either the row-count or
//! the byte threshold is crossed, every later row goes to an overflow file.
//! Reads see one contiguous sequence regardless of where a row lives.
//!
//! # Concurrency
//!
//! Exactly one writer (the owning query's execution thread) appends. Any
//! number of readers may call `size` and `window` concurrently. A row is
//! stored in its region before the published size is bumped, so readers
//! never observe a row index that is not yet readable.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use serde_json::Value;
use tracing::{debug, info, warn};

use super::errors::{BufferError, BufferResult};
use super::spill::SpillFile;
use super::Row;

/// Thresholds controlling when rows leave memory.
#[derive(Debug, Clone)]
pub struct SpillConfig {
    /// Directory holding overflow files
    pub dir: PathBuf,
    /// Maximum rows kept in memory
    pub memory_rows: usize,
    /// Maximum estimated bytes kept in memory
    pub memory_bytes: usize,
}

impl Default for SpillConfig {
    fn default() -> Self {
        Self {
            dir: std::env::temp_dir(),
            memory_rows: 10_000,
            memory_bytes: 64 * 1024 * 1024,
        }
    }
}

impl SpillConfig {
    /// Config spilling after `memory_rows` rows into `dir`.
    pub fn with_rows(dir: impl Into<PathBuf>, memory_rows: usize) -> Self {
        Self {
            dir: dir.into(),
            memory_rows,
            ..Self::default()
        }
    }
}

/// Where an appended row ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residency {
    /// Row is held in memory
    Memory,
    /// Row was written to the overflow file
    Disk,
}

/// Append-only, randomly indexable result rows.
#[derive(Debug)]
pub struct ResultBuffer {
    config: SpillConfig,
    /// Rows kept in memory; frozen once spilling starts
    resident: RwLock<Vec<Row>>,
    /// Estimated size of the resident rows
    resident_bytes: AtomicUsize,
    /// Overflow file, created on first spill
    spill: Mutex<Option<SpillFile>>,
    /// Set once the first row went to disk
    spilling: AtomicBool,
    /// Published row count
    len: AtomicUsize,
    closed: AtomicBool,
}

impl ResultBuffer {
    /// Creates an empty buffer.
    pub fn new(config: SpillConfig) -> Self {
        Self {
            config,
            resident: RwLock::new(Vec::new()),
            resident_bytes: AtomicUsize::new(0),
            spill: Mutex::new(None),
            spilling: AtomicBool::new(false),
            len: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Appends a row at the end of the result.
    ///
    /// # Errors
    ///
    /// - `StorageExhausted` if the overflow file cannot be created or grown
    /// - `Closed` if the buffer was already released
    pub fn append(&self, row: Row) -> BufferResult<Residency> {
        if self.closed.load(Ordering::Acquire) {
            return Err(BufferError::Closed);
        }

        if !self.spilling.load(Ordering::Acquire) {
            let estimate = estimate_row_size(&row);
            let mut resident = self.resident.write().map_err(|_| BufferError::LockPoisoned)?;
            let bytes = self.resident_bytes.load(Ordering::Relaxed);

            if resident.len() < self.config.memory_rows
                && bytes.saturating_add(estimate) <= self.config.memory_bytes
            {
                resident.push(row);
                self.resident_bytes.fetch_add(estimate, Ordering::Relaxed);
                self.len.fetch_add(1, Ordering::Release);
                return Ok(Residency::Memory);
            }

            info!(
                resident_rows = resident.len(),
                resident_bytes = bytes,
                dir = %self.config.dir.display(),
                "result buffer threshold reached, spilling to disk"
            );
            self.spilling.store(true, Ordering::Release);
        }

        let mut spill = self.spill.lock().map_err(|_| BufferError::LockPoisoned)?;
        if spill.is_none() {
            *spill = Some(SpillFile::create(&self.config.dir)?);
        }
        if let Some(file) = spill.as_mut() {
            file.append(&row)?;
        }
        self.len.fetch_add(1, Ordering::Release);

        Ok(Residency::Disk)
    }

    /// Returns rows `[offset, min(offset + limit, size))`.
    ///
    /// Never waits for rows that have not been produced yet; an offset at or
    /// past the current size yields an empty vector.
    pub fn window(&self, offset: usize, limit: usize) -> BufferResult<Vec<Row>> {
        if self.closed.load(Ordering::Acquire) {
            return Ok(Vec::new());
        }

        let len = self.len.load(Ordering::Acquire);
        let end = offset.saturating_add(limit).min(len);
        if offset >= end {
            return Ok(Vec::new());
        }

        let mut rows = Vec::with_capacity(end - offset);
        let resident_len = {
            let resident = self.resident.read().map_err(|_| BufferError::LockPoisoned)?;
            let resident_len = resident.len();
            if offset < resident_len {
                rows.extend_from_slice(&resident[offset..end.min(resident_len)]);
            }
            resident_len
        };

        if end > resident_len {
            let start = offset.max(resident_len) - resident_len;
            let mut spill = self.spill.lock().map_err(|_| BufferError::LockPoisoned)?;
            if let Some(file) = spill.as_mut() {
                rows.extend(file.read_range(start, end - resident_len)?);
            }
        }

        Ok(rows)
    }

    /// Current number of rows.
    pub fn size(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    /// Returns true if no rows were appended.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns whether rows have started going to disk.
    pub fn is_spilled(&self) -> bool {
        self.spilling.load(Ordering::Acquire)
    }

    /// Number of rows held in memory.
    pub fn resident_rows(&self) -> usize {
        self.resident.read().map(|r| r.len()).unwrap_or(0)
    }

    /// Number of rows held in the overflow file.
    pub fn spilled_rows(&self) -> usize {
        self.spill
            .lock()
            .map(|s| s.as_ref().map(|f| f.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Path of the overflow file, if one was created.
    pub fn spill_path(&self) -> Option<PathBuf> {
        self.spill
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|f| f.path().to_path_buf()))
    }

    /// Directory overflow files are created in.
    pub fn spill_dir(&self) -> &Path {
        &self.config.dir
    }

    /// Returns whether `close` was called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Releases memory and deletes the overflow file. Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        if let Ok(mut resident) = self.resident.write() {
            resident.clear();
            resident.shrink_to_fit();
        }
        self.resident_bytes.store(0, Ordering::Relaxed);

        let file = self.spill.lock().ok().and_then(|mut s| s.take());
        if let Some(file) = file {
            let path = file.path().to_path_buf();
            match file.close() {
                Ok(()) => debug!(path = %path.display(), "overflow file deleted"),
                Err(e) => warn!(path = %path.display(), error = %e, "failed to delete overflow file"),
            }
        }
    }
}

/// Rough in-memory footprint of a row.
pub fn estimate_row_size(row: &Row) -> usize {
    row.iter()
        .map(|(key, value)| key.len() + estimate_value_size(value))
        .sum::<usize>()
        + std::mem::size_of::<Row>()
}

fn estimate_value_size(value: &Value) -> usize {
    let base = std::mem::size_of::<Value>();
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) => base,
        Value::String(s) => base + s.len(),
        Value::Array(items) => base + items.iter().map(estimate_value_size).sum::<usize>(),
        Value::Object(map) => {
            base + map
                .iter()
                .map(|(k, v)| k.len() + estimate_value_size(v))
                .sum::<usize>()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn row(n: usize) -> Row {
        let mut row = Row::new();
        row.insert("n".to_string(), json!(n));
        row
    }

    fn numbers(rows: &[Row]) -> Vec<usize> {
        rows.iter().map(|r| r["n"].as_u64().unwrap() as usize).collect()
    }

    #[test]
    fn test_memory_only_window() {
        let dir = TempDir::new().unwrap();
        let buffer = ResultBuffer::new(SpillConfig::with_rows(dir.path(), 100));

        for n in 0..10 {
            assert_eq!(buffer.append(row(n)).unwrap(), Residency::Memory);
        }

        assert_eq!(numbers(&buffer.window(3, 4).unwrap()), vec![3, 4, 5, 6]);
        assert!(!buffer.is_spilled());
        assert!(buffer.spill_path().is_none());
    }

    #[test]
    fn test_window_straddles_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let buffer = ResultBuffer::new(SpillConfig::with_rows(dir.path(), 5));

        for n in 0..12 {
            buffer.append(row(n)).unwrap();
        }

        assert_eq!(buffer.resident_rows(), 5);
        assert_eq!(buffer.spilled_rows(), 7);
        assert_eq!(numbers(&buffer.window(3, 5).unwrap()), vec![3, 4, 5, 6, 7]);
        assert_eq!(numbers(&buffer.window(9, 100).unwrap()), vec![9, 10, 11]);
    }

    #[test]
    fn test_window_past_end_is_empty() {
        let dir = TempDir::new().unwrap();
        let buffer = ResultBuffer::new(SpillConfig::with_rows(dir.path(), 2));
        for n in 0..3 {
            buffer.append(row(n)).unwrap();
        }

        assert!(buffer.window(3, 10).unwrap().is_empty());
        assert!(buffer.window(50, 10).unwrap().is_empty());
        assert!(buffer.window(0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_byte_threshold_triggers_spill() {
        let dir = TempDir::new().unwrap();
        let config = SpillConfig {
            dir: dir.path().to_path_buf(),
            memory_rows: 1_000,
            memory_bytes: estimate_row_size(&row(0)) * 3,
        };
        let buffer = ResultBuffer::new(config);

        for n in 0..6 {
            buffer.append(row(n)).unwrap();
        }

        assert!(buffer.is_spilled());
        assert_eq!(buffer.resident_rows(), 3);
        assert_eq!(buffer.size(), 6);
    }

    #[test]
    fn test_close_releases_everything() {
        let dir = TempDir::new().unwrap();
        let buffer = ResultBuffer::new(SpillConfig::with_rows(dir.path(), 1));
        buffer.append(row(0)).unwrap();
        buffer.append(row(1)).unwrap();

        let path = buffer.spill_path().unwrap();
        assert!(path.exists());

        buffer.close();
        buffer.close();

        assert!(!path.exists());
        assert!(buffer.window(0, 10).unwrap().is_empty());
        assert!(matches!(buffer.append(row(2)), Err(BufferError::Closed)));
    }

    #[test]
    fn test_missing_spill_dir_is_storage_exhausted() {
        let dir = TempDir::new().unwrap();
        let buffer = ResultBuffer::new(SpillConfig::with_rows(dir.path().join("gone"), 1));
        buffer.append(row(0)).unwrap();

        let err = buffer.append(row(1)).unwrap_err();
        assert!(err.is_storage_exhausted());
        assert_eq!(buffer.size(), 1);
    }
}
