//! Overflow record framing
//!
//! Rows that spill past the memory threshold are written as:
//!
//! ```text
//! +------------------+
//! | Record Length    | (u32 LE, includes itself and the checksum)
//! +------------------+
//! | Row Payload      | (JSON object)
//! +------------------+
//! | Checksum         | (u32 LE)
//! +------------------+
//! ```
//!
//! Checksum is CRC32 (IEEE) over the length field and the payload.

use super::errors::{BufferError, BufferResult};
use super::Row;

/// Length prefix plus trailing checksum.
pub const RECORD_OVERHEAD: usize = 4 + 4;

/// Encodes a row into a framed overflow record.
pub fn encode_row(row: &Row) -> BufferResult<Vec<u8>> {
    let payload = serde_json::to_vec(row)?;
    let record_length = (RECORD_OVERHEAD + payload.len()) as u32;

    let mut record = Vec::with_capacity(record_length as usize);
    record.extend_from_slice(&record_length.to_le_bytes());
    record.extend_from_slice(&payload);

    let checksum = crc32fast::hash(&record);
    record.extend_from_slice(&checksum.to_le_bytes());

    Ok(record)
}

/// Decodes a framed overflow record read from `offset`.
///
/// `data` must hold exactly one record.
pub fn decode_row(data: &[u8], offset: u64) -> BufferResult<Row> {
    if data.len() < RECORD_OVERHEAD {
        return Err(BufferError::corruption(
            offset,
            format!("Record too short: {} bytes", data.len()),
        ));
    }

    let record_length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if record_length != data.len() {
        return Err(BufferError::corruption(
            offset,
            format!(
                "Record length mismatch: header says {}, read {}",
                record_length,
                data.len()
            ),
        ));
    }

    let checksum_offset = record_length - 4;
    let stored = u32::from_le_bytes([
        data[checksum_offset],
        data[checksum_offset + 1],
        data[checksum_offset + 2],
        data[checksum_offset + 3],
    ]);
    let computed = crc32fast::hash(&data[..checksum_offset]);

    if computed != stored {
        return Err(BufferError::corruption(
            offset,
            format!(
                "Checksum mismatch: computed {:08x}, stored {:08x}",
                computed, stored
            ),
        ));
    }

    serde_json::from_slice(&data[4..checksum_offset])
        .map_err(|e| BufferError::corruption(offset, format!("Invalid row payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_row() -> Row {
        let mut row = Row::new();
        row.insert("_time".to_string(), json!(1_700_000_000_000i64));
        row.insert("line".to_string(), json!("GET /index.html 200"));
        row
    }

    #[test]
    fn test_encode_decode() {
        let row = sample_row();
        let encoded = encode_row(&row).unwrap();
        let decoded = decode_row(&encoded, 0).unwrap();
        assert_eq!(decoded, row);
    }

    #[test]
    fn test_length_prefix_covers_whole_record() {
        let encoded = encode_row(&sample_row()).unwrap();
        let len = u32::from_le_bytes([encoded[0], encoded[1], encoded[2], encoded[3]]) as usize;
        assert_eq!(len, encoded.len());
    }

    #[test]
    fn test_corrupted_payload_rejected() {
        let mut encoded = encode_row(&sample_row()).unwrap();
        let mid = encoded.len() / 2;
        encoded[mid] ^= 0xFF;

        let err = decode_row(&encoded, 64).unwrap_err();
        assert_eq!(err.code(), "LOGQ_BUFFER_CORRUPTION");
        assert!(err.to_string().contains("Checksum"));
    }

    #[test]
    fn test_truncated_record_rejected() {
        let encoded = encode_row(&sample_row()).unwrap();
        let err = decode_row(&encoded[..encoded.len() - 2], 0).unwrap_err();
        assert!(matches!(err, BufferError::Corruption { .. }));
    }
}
