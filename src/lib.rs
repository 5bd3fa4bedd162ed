//! AVL Parser Library
//!
//! A Rust library for decoding Teltonika-style AVL (Automatic Vehicle
//! Location) telemetry streams into structured GPS + accelerometer records.
//! The decoder re-derives record boundaries by content instead of trusting
//! the outer framing, so truncated and partially corrupted streams still
//! yield every recoverable record.
//!
//! # Features
//!
//! - **`csv`** (default): Enable CSV export functionality
//! - **`cli`** (default): Build the command-line interface binary
//! - **`json`**: Enable record export in JSON format
//! - **`serde`**: Enable serialization/deserialization of types
//!
//! # Quick Start
//!
//! Decode a hex stream and walk the records:
//! ```rust
//! use avl_parser::parse_avl_hex;
//!
//! let records = parse_avl_hex("59D90010...");
//! for record in &records {
//!     println!("{} {:.7},{:.7}", record.iso_timestamp(), record.latitude, record.longitude);
//! }
//! ```
//!
//! # Public API
//!
//! ## Decoding Functions
//! - [`parse_avl_hex`] - Decode every recoverable record from a hex stream
//! - [`parse_avl_bytes`] - Decode every recoverable record from a byte buffer
//! - [`decode_segment`] - Decode one delimiter-split segment
//! - [`iter_segments`] - Split a hex stream into candidate segments
//! - [`find_record_start`] - Locate the next plausible record offset
//! - [`read_record`] - Decode a single record at a confirmed offset
//!
//! ## Data Types
//! - [`AvlRecord`] - One decoded position + motion sample
//! - [`AxisAccel`] - Optional triaxial accelerometer readings
//! - [`RecordOutcome`] - Decode attempt result with a definite next offset
//!
//! ## Export Functions
//! - [`export::write_records_csv`] / [`export::append_records_csv`] - CSV output
//! - `export::records_to_json` - JSON output (behind the `json` feature)
//!
//! ## Collector
//! - [`server::Collector`] - TCP listener with the device identity handshake

// Module declarations
pub mod conversion;
pub mod error;
pub mod export;
pub mod parser;
pub mod server;
pub mod types;

// Re-export everything from modules for convenience
#[allow(ambiguous_glob_reexports)]
pub use conversion::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;

pub use error::AvlError;

// Re-export Result type for convenience
pub use anyhow::Result;
