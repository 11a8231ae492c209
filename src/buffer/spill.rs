//! Overflow file for rows past the in-memory threshold
//!
//! The file is a private temporary file: it is deleted when the buffer is
//! closed, or when the process drops the handle. Rows are appended as framed
//! records (see `record`) and located through an in-memory offset index.

use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use tempfile::{Builder, NamedTempFile};

use super::errors::{BufferError, BufferResult};
use super::record::{decode_row, encode_row};
use super::Row;

/// Append-only overflow file with random row access.
#[derive(Debug)]
pub struct SpillFile {
    /// Backing temporary file
    file: NamedTempFile,
    /// Next write position
    write_offset: u64,
    /// (offset, length) of every record, in row order
    index: Vec<(u64, u32)>,
}

impl SpillFile {
    /// Creates a new overflow file inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageExhausted` if the file cannot be created.
    pub fn create(dir: &Path) -> BufferResult<Self> {
        let file = Builder::new()
            .prefix("logquery-")
            .suffix(".spill")
            .tempfile_in(dir)
            .map_err(|e| {
                BufferError::storage_exhausted(
                    format!("Failed to create overflow file in {}", dir.display()),
                    e,
                )
            })?;

        Ok(Self {
            file,
            write_offset: 0,
            index: Vec::new(),
        })
    }

    /// Returns the path of the overflow file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Number of rows stored in the file.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true if no rows were spilled yet.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total bytes written.
    pub fn bytes_written(&self) -> u64 {
        self.write_offset
    }

    /// Appends a row, returning the number of bytes written.
    ///
    /// A failed write leaves the index untouched; the next append overwrites
    /// whatever partial bytes were left behind.
    pub fn append(&mut self, row: &Row) -> BufferResult<usize> {
        let record = encode_row(row)?;
        let offset = self.write_offset;

        let file = self.file.as_file_mut();
        file.seek(SeekFrom::Start(offset))
            .and_then(|_| file.write_all(&record))
            .map_err(|e| {
                BufferError::storage_exhausted(
                    format!("Failed to write overflow record at offset {}", offset),
                    e,
                )
            })?;

        self.index.push((offset, record.len() as u32));
        self.write_offset += record.len() as u64;
        Ok(record.len())
    }

    /// Reads rows `[start, end)` of the file, clamped to what was written.
    pub fn read_range(&mut self, start: usize, end: usize) -> BufferResult<Vec<Row>> {
        let end = end.min(self.index.len());
        if start >= end {
            return Ok(Vec::new());
        }

        // Records are contiguous, so the whole range is one read.
        let first_offset = self.index[start].0;
        let (last_offset, last_len) = self.index[end - 1];
        let span = (last_offset + last_len as u64 - first_offset) as usize;

        let mut bytes = vec![0u8; span];
        let file = self.file.as_file_mut();
        file.seek(SeekFrom::Start(first_offset))
            .and_then(|_| file.read_exact(&mut bytes))
            .map_err(|e| BufferError::ReadFailed {
                offset: first_offset,
                source: e,
            })?;

        let mut rows = Vec::with_capacity(end - start);
        for &(offset, len) in &self.index[start..end] {
            let from = (offset - first_offset) as usize;
            let to = from + len as usize;
            rows.push(decode_row(&bytes[from..to], offset)?);
        }

        Ok(rows)
    }

    /// Deletes the overflow file.
    pub fn close(self) -> std::io::Result<()> {
        self.file.close()
    }
}
