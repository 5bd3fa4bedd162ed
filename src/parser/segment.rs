//! Stream segmentation
//!
//! Devices deliver a flattened hex stream where each top-level packet is
//! preceded by a fixed delimiter pattern. Splitting on the delimiter yields
//! independent candidate segments; everything after that is handled by the
//! frame-recovery heuristics, so malformed fragments are dropped here rather
//! than surfaced as errors.

/// Hex delimiter preceding each top-level packet (bytes `59 D9 00 10`).
pub const SEGMENT_DELIMITER: &str = "59D90010";

/// Split a raw hex stream into candidate segments.
///
/// The input is trimmed and uppercased, then split on [`SEGMENT_DELIMITER`].
/// A fragment with an odd number of hex digits is assumed to carry one
/// malformed trailing digit and is truncated by one character before
/// conversion. Fragments that still fail hex conversion are skipped.
/// Empty input yields an empty sequence.
pub fn iter_segments(raw_hex: &str) -> impl Iterator<Item = Vec<u8>> {
    let clean = raw_hex.trim().to_ascii_uppercase();

    let fragments: Vec<String> = if clean.is_empty() {
        Vec::new()
    } else {
        clean
            .split(SEGMENT_DELIMITER)
            .filter(|part| !part.is_empty())
            .map(str::to_owned)
            .collect()
    };

    fragments.into_iter().filter_map(|mut part| {
        if part.len() % 2 != 0 {
            part.truncate(part.len() - 1);
        }
        hex::decode(&part).ok()
    })
}
