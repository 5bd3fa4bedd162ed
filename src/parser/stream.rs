//! Stream decoding orchestration
//!
//! Drives segmentation, frame location and record decoding over a whole
//! input stream. The cursor over each segment is strictly increasing, so a
//! single corrupted frame can never stall the scan or block extraction of
//! later valid frames in the same segment. Nothing here returns an error:
//! the contract is "always return whatever could be recovered".

use crate::parser::locate::find_record_start;
use crate::parser::record::read_record;
use crate::parser::segment::iter_segments;
use crate::types::AvlRecord;

/// Decode every recoverable record from one segment.
pub fn decode_segment(segment: &[u8]) -> Vec<AvlRecord> {
    let mut records = Vec::new();
    let mut pos = 0usize;
    while pos < segment.len() {
        let start = match find_record_start(segment, pos) {
            Some(start) => start,
            None => break,
        };
        let outcome = read_record(segment, start);
        match outcome.record {
            Some(record) => {
                records.push(record);
                pos = outcome.next_offset.max(start + 1);
            }
            None => pos = start + 1,
        }
    }
    records
}

/// Decode every recoverable record from a raw hex stream.
///
/// Records are returned in the order they appear across segments. Malformed
/// fragments and unparseable spans are skipped silently.
pub fn parse_avl_hex(raw_hex: &str) -> Vec<AvlRecord> {
    let mut records = Vec::new();
    for segment in iter_segments(raw_hex) {
        records.extend(decode_segment(&segment));
    }
    records
}

/// Decode every recoverable record from a raw byte buffer.
///
/// The buffer is hex-encoded and run through [`parse_avl_hex`], so delimiter
/// handling is identical between the file and network ingest paths.
pub fn parse_avl_bytes(data: &[u8]) -> Vec<AvlRecord> {
    parse_avl_hex(&hex::encode_upper(data))
}
