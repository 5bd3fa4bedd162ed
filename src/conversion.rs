//! Data conversion utilities for AVL decoding
//!
//! The wire format stores coordinates as signed fixed-point integers in
//! 1e-7 degree units; everything else on the wire is already in its final
//! unit (meters, degrees, km/h).

/// Fixed-point scale of wire coordinates: degrees * 10_000_000.
pub const COORDINATE_SCALE: f64 = 10_000_000.0;

/// Convert a raw signed fixed-point coordinate to degrees.
pub fn convert_coordinate(raw_value: i32) -> f64 {
    raw_value as f64 / COORDINATE_SCALE
}
