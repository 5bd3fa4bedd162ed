//! Frame-start location heuristic
//!
//! The outer framing of the device stream cannot be trusted (packets arrive
//! truncated or mid-stream), so record boundaries are re-derived by content:
//! scan byte by byte for an 8-byte big-endian window that decodes to a
//! plausible millisecond timestamp, then bounds-check the fields that would
//! follow it in a minimal GPS block. Favors recovering partial data over
//! strict protocol conformance.

use crate::parser::helpers::read_u64;

/// Lowest accepted record timestamp: 2015-01-01T00:00:00Z in ms.
pub const MIN_TS_MS: u64 = 1_420_070_400_000;
/// Highest accepted record timestamp: 2035-01-01T00:00:00Z in ms.
pub const MAX_TS_MS: u64 = 2_051_222_400_000;

/// Highest valid packet priority class.
pub const MAX_PRIORITY: u8 = 3;
/// Highest plausible satellites-in-view count.
pub const MAX_SATELLITES: u8 = 32;

/// Bytes in a minimal GPS block plus trailing satellites and speed fields:
/// timestamp(8) + priority(1) + lon(4) + lat(4) + altitude(2) + angle(2)
/// + satellites(1) + speed(2).
pub const MIN_RECORD_LEN: usize = 8 + 1 + 4 + 4 + 2 + 2 + 1 + 2;

/// Scan forward from `start` for the next plausible record start.
///
/// A candidate offset is accepted when its 8-byte window decodes to a
/// timestamp within `[MIN_TS_MS, MAX_TS_MS]`, the priority byte after it is
/// at most [`MAX_PRIORITY`], and the satellite-count byte at its fixed
/// relative position is either past the buffer end or at most
/// [`MAX_SATELLITES`]. Returns `None` once fewer than [`MIN_RECORD_LEN`]
/// bytes remain past the candidate.
pub fn find_record_start(data: &[u8], start: usize) -> Option<usize> {
    let limit = data.len().saturating_sub(MIN_RECORD_LEN);
    for offset in start..limit {
        let ts = match read_u64(data, offset) {
            Some(ts) => ts,
            None => break,
        };
        if !(MIN_TS_MS..=MAX_TS_MS).contains(&ts) {
            continue;
        }

        // Sanity checks on the priority and satellite-count bytes that a
        // real record would place after the timestamp.
        let priority = match data.get(offset + 8) {
            Some(&p) => p,
            None => continue,
        };
        if priority > MAX_PRIORITY {
            continue;
        }
        let sat_pos = offset + 8 + 1 + 4 + 4 + 2 + 2;
        if let Some(&sats) = data.get(sat_pos) {
            if sats > MAX_SATELLITES {
                continue;
            }
        }
        return Some(offset);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2021-05-01T00:00:00Z, comfortably inside the plausibility window.
    const VALID_TS: u64 = 1_619_827_200_000;

    fn candidate(ts: u64, priority: u8, sats: u8) -> Vec<u8> {
        let mut data = ts.to_be_bytes().to_vec();
        data.push(priority);
        data.extend_from_slice(&[0u8; 12]); // lon + lat + altitude + angle
        data.push(sats);
        data.extend_from_slice(&[0u8; 10]); // speed + trailing slack
        data
    }

    #[test]
    fn test_short_buffers_never_match() {
        for len in 0..=MIN_RECORD_LEN {
            let data = vec![0u8; len];
            assert_eq!(find_record_start(&data, 0), None, "len {}", len);
        }
    }

    #[test]
    fn test_locates_valid_candidate() {
        let data = candidate(VALID_TS, 0, 7);
        assert_eq!(find_record_start(&data, 0), Some(0));
    }

    #[test]
    fn test_skips_leading_garbage() {
        let mut data = vec![0xFF; 5];
        data.extend_from_slice(&candidate(VALID_TS, 1, 12));
        assert_eq!(find_record_start(&data, 0), Some(5));
    }

    #[test]
    fn test_timestamp_bounds_inclusive() {
        assert_eq!(find_record_start(&candidate(MIN_TS_MS, 0, 0), 0), Some(0));
        assert_eq!(find_record_start(&candidate(MIN_TS_MS - 1, 0, 0), 0), None);
        assert_eq!(find_record_start(&candidate(MAX_TS_MS, 0, 0), 0), Some(0));
        assert_eq!(find_record_start(&candidate(MAX_TS_MS + 1, 0, 0), 0), None);
    }

    #[test]
    fn test_rejects_bad_priority() {
        let data = candidate(VALID_TS, 4, 7);
        assert_eq!(find_record_start(&data, 0), None);
    }

    #[test]
    fn test_rejects_bad_satellite_count() {
        let data = candidate(VALID_TS, 0, 33);
        assert_eq!(find_record_start(&data, 0), None);
    }

    #[test]
    fn test_respects_start_offset() {
        let data = candidate(VALID_TS, 0, 7);
        assert_eq!(find_record_start(&data, 1), None);
    }
}
