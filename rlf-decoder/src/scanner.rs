//! Frame scanner and record demultiplexer
//!
//! The log is a sequence of marker-delimited frames:
//!
//! ```text
//! marker(2B: EB 90) | checksum(2B LE) | type(2B LE) | length(2B LE) | payload
//! ```
//!
//! The scanner walks the buffer linearly, resynchronizing byte-by-byte on
//! anything that is not a marker, and stops at the first partial trailing
//! frame. The checksum is read and carried but never verified; no checksum
//! algorithm is assumed for this format.
//!
//! The demultiplexer groups the scanned frames by type code, preserving file
//! order. File order is the sole basis for the chronological-order
//! assumption used by timestamp reconstruction.

use byteorder::{ByteOrder, LittleEndian};
use std::collections::BTreeMap;

/// Frame marker bytes
pub const MARKER: [u8; 2] = [0xEB, 0x90];

/// Marker plus checksum, type code, and payload length
pub const HEADER_SIZE: usize = 8;

/// A single frame as found in the buffer
///
/// Ephemeral: produced by [`scan`], consumed by [`demultiplex`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawFrame {
    /// Byte offset of the frame marker in the buffer
    pub offset: usize,
    /// Frame checksum, read but not validated
    pub checksum: u16,
    /// Record type code
    pub type_code: u16,
    /// Payload bytes (may be empty)
    pub payload: Vec<u8>,
}

/// Result of one scanner pass
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Complete frames in file order
    pub frames: Vec<RawFrame>,
    /// Partial trailing frames discarded (0 or 1 per pass)
    pub truncated_frames: usize,
    /// Non-marker bytes skipped while resynchronizing
    pub bytes_skipped: usize,
}

/// Scan a buffer for complete frames
///
/// A buffer with zero recognizable frames yields an empty outcome; that is
/// not an error. A frame whose header or declared payload runs past the end
/// of the buffer stops the scan and is counted as truncated, never raised.
pub fn scan(data: &[u8]) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let mut pos = 0;

    while pos + MARKER.len() <= data.len() {
        if data[pos..pos + 2] != MARKER {
            pos += 1;
            outcome.bytes_skipped += 1;
            continue;
        }

        if pos + HEADER_SIZE > data.len() {
            // Marker found but the header runs off the end
            outcome.truncated_frames += 1;
            log::debug!("truncated header at offset {}", pos);
            return outcome;
        }

        let checksum = LittleEndian::read_u16(&data[pos + 2..pos + 4]);
        let type_code = LittleEndian::read_u16(&data[pos + 4..pos + 6]);
        let length = LittleEndian::read_u16(&data[pos + 6..pos + 8]) as usize;
        let payload_end = pos + HEADER_SIZE + length;

        if payload_end > data.len() {
            outcome.truncated_frames += 1;
            log::debug!(
                "truncated payload at offset {}: declared {} bytes, {} remain",
                pos,
                length,
                data.len() - pos - HEADER_SIZE
            );
            return outcome;
        }

        outcome.frames.push(RawFrame {
            offset: pos,
            checksum,
            type_code,
            payload: data[pos + HEADER_SIZE..payload_end].to_vec(),
        });
        pos = payload_end;
    }

    // At most one stray byte can remain here
    outcome.bytes_skipped += data.len() - pos;
    outcome
}

/// One frame inside a type group: payload plus where it sat in the file
///
/// The byte offset survives demultiplexing because positional time
/// reconstruction needs it.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedFrame {
    /// Byte offset of the frame marker in the buffer
    pub offset: usize,
    /// Payload bytes
    pub payload: Vec<u8>,
}

/// Frames grouped by record type code, per-type file order preserved
#[derive(Debug, Default)]
pub struct FrameGroups {
    groups: BTreeMap<u16, Vec<GroupedFrame>>,
}

impl FrameGroups {
    /// Frames of one type, in file order
    pub fn get(&self, type_code: u16) -> Option<&[GroupedFrame]> {
        self.groups.get(&type_code).map(Vec::as_slice)
    }

    /// Iterate over (type code, frames) in ascending code order
    pub fn iter(&self) -> impl Iterator<Item = (u16, &[GroupedFrame])> {
        self.groups.iter().map(|(&c, f)| (c, f.as_slice()))
    }

    /// Consume the groups, yielding owned frames per type
    pub fn into_iter(self) -> impl Iterator<Item = (u16, Vec<GroupedFrame>)> {
        self.groups.into_iter()
    }

    /// Number of distinct type codes
    pub fn type_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of frames across all types
    pub fn frame_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Group scanned frames by type code
///
/// Pure grouping - no decoding. The groups are retained in the dataset for
/// diagnostics and to allow re-decoding without rescanning.
pub fn demultiplex(frames: Vec<RawFrame>) -> FrameGroups {
    let mut groups: BTreeMap<u16, Vec<GroupedFrame>> = BTreeMap::new();
    for frame in frames {
        groups.entry(frame.type_code).or_default().push(GroupedFrame {
            offset: frame.offset,
            payload: frame.payload,
        });
    }
    FrameGroups { groups }
}
