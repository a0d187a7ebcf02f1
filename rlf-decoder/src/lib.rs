//! RLF Decoder Library
//!
//! A stateless, reusable library for decoding REMUS-100 AUV `.RLF` mission
//! logs into per-sensor time series and discrete event logs.
//!
//! # Architecture
//!
//! The format was reverse-engineered - there is no vendor spec - so the
//! decoder is defensive and self-diagnosing rather than trusting the input:
//! - Scans an in-memory buffer for marker-delimited frames
//! - Groups frames by record type, preserving file order
//! - Decodes known types into physical-unit fields via fixed layout tables
//! - Reconstructs a monotonic elapsed-time axis, unwrapping the embedded
//!   ms-since-midnight clock across UTC midnight rollovers
//! - Assigns positional timestamps to the one clockless record type by
//!   interpolating a reference series over byte offsets
//!
//! The library does NOT:
//! - Read files or parse arguments (the caller hands it a byte buffer)
//! - Validate frame checksums (read, surfaced, never verified)
//! - Support streaming or partial buffers
//! - Render or export anything
//!
//! All higher-level functionality is in the application layer (rlf-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use rlf_decoder::{decode, DecoderConfig};
//!
//! let data = std::fs::read("mission.rlf").unwrap();
//! let dataset = decode(&data, &DecoderConfig::new());
//!
//! if let Some(nav) = dataset.series("Navigation") {
//!     let depth = nav.column("depth").unwrap();
//!     let t = nav.t_hrs.as_ref().unwrap();
//!     println!("{} samples over {:.2} h", depth.len(), t.last().unwrap());
//! }
//! for line in &dataset.summary {
//!     println!("{:<24} 0x{:04x} {:>8}", line.display_name, line.type_code, line.count);
//! }
//! ```

// Public modules
pub mod config;
pub mod decoder;
pub mod registry;
pub mod scanner;
pub mod timeline;
pub mod types;

// Re-export main types for convenience
pub use config::DecoderConfig;
pub use decoder::decode;
pub use types::{
    Column, ColumnStats, DecodeError, DecodedRecord, Diagnostics, Entry, EntryList, FieldValue,
    MissionDataset, RawGroup, Result, Series, SingleStruct, TypeSummary,
};

// Internal modules (not exposed in public API)
mod records;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: an empty buffer decodes to an empty, valid dataset
        let dataset = decode(&[], &DecoderConfig::new());
        assert!(dataset.records.is_empty());
        assert!(dataset.diagnostics.untimed.is_empty());
    }
}
