//! Core types for the RLF decoder library
//!
//! This module defines everything the decoder emits: the three decoded record
//! shapes (dense series, per-event entry lists, one-shot structs), the field
//! value union, and the final mission dataset with its diagnostic sections.
//! The decoder is a pure transformation and never fails as a whole - errors
//! here classify individual payloads that were skipped.

use chrono::NaiveTime;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Result type for per-payload decode operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors that classify why an individual payload was skipped
///
/// These are never fatal: a malformed payload is counted and the rest of its
/// record type still decodes.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("payload too short: {got} bytes, need at least {need}")]
    PayloadTooShort { got: usize, need: usize },

    #[error("bad discriminator at offset {offset}: expected 0x{expected:02X}, found 0x{found:02X}")]
    BadDiscriminator {
        offset: usize,
        expected: u8,
        found: u8,
    },

    #[error("payload carries no usable text")]
    EmptyText,
}

/// A decoded field value
///
/// `Missing` is the distinguished marker for sentinel-valued readings in
/// entry lists; dense series carry the same concept as NaN samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Floating-point value (after scaling/offset)
    Float(f64),
    /// Integer value (counters, flags, millivolt readings)
    Integer(i64),
    /// Text value (names, messages, identity strings)
    Text(String),
    /// No valid reading
    Missing,
}

impl FieldValue {
    /// Convert to f64 where the value is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Text(_) | FieldValue::Missing => None,
        }
    }

    /// Borrow the text content, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Float(v) => write!(f, "{:.3}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Missing => write!(f, "-"),
        }
    }
}

/// One named column of a dense series
#[derive(Debug, Clone, Serialize)]
pub struct Column {
    /// Field name from the record layout
    pub name: &'static str,
    /// Decoded physical values, one per decoded payload; NaN marks a
    /// sentinel "no valid reading"
    pub values: Vec<f64>,
}

/// Dense, parallel-array decoded form for fixed-layout, high-rate types
///
/// All columns have equal length. `t_hrs` is present when the type embeds a
/// clock (hours from the series' own first sample) or, for the clockless
/// modem log, when positional interpolation succeeded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Series {
    /// Columns in layout order
    pub columns: Vec<Column>,
    /// Elapsed hours, aligned with the columns
    pub t_hrs: Option<Vec<f64>>,
    /// UTC time of day of the first sample's embedded clock
    pub start_clock: Option<NaiveTime>,
}

impl Series {
    /// Number of decoded samples
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// True if no payload of this type decoded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a column by field name
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Min/max/mean over the finite samples of a column
    ///
    /// Sentinel (NaN) samples are excluded, so aggregates are never
    /// corrupted by "no valid reading" markers. Returns None for an unknown
    /// column or one with no finite samples.
    pub fn stats(&self, name: &str) -> Option<ColumnStats> {
        let values = self.column(name)?;
        let mut count = 0usize;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in values {
            if v.is_finite() {
                count += 1;
                min = min.min(v);
                max = max.max(v);
                sum += v;
            }
        }
        if count == 0 {
            return None;
        }
        Some(ColumnStats {
            count,
            min,
            max,
            mean: sum / count as f64,
        })
    }
}

/// Aggregate over the finite samples of one series column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnStats {
    /// Number of finite samples
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// One decoded event: field name to value
pub type Entry = BTreeMap<String, FieldValue>;

/// Per-event decoded form for variable-shaped types
///
/// Consumers get random access to one event's full field set rather than
/// column-wise aggregation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntryList {
    /// Decoded entries in file order
    pub entries: Vec<Entry>,
    /// Elapsed hours on the reference series' axis, aligned with entries;
    /// None when the type is clockless and no reference series was available
    pub t_hrs: Option<Vec<f64>>,
}

impl EntryList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Flat field map for one-shot, non-repeating record types
#[derive(Debug, Clone, Default, Serialize)]
pub struct SingleStruct {
    pub fields: BTreeMap<String, FieldValue>,
}

impl SingleStruct {
    /// Look up a field by name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

/// A decoded record group - one of the three output shapes
///
/// Modeled as a sum type so consumers handle each shape exhaustively and a
/// new shape is caught at compile time.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "shape")]
pub enum DecodedRecord {
    Series(Series),
    Entries(EntryList),
    Single(SingleStruct),
}

impl DecodedRecord {
    pub fn as_series(&self) -> Option<&Series> {
        match self {
            DecodedRecord::Series(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_entries(&self) -> Option<&EntryList> {
        match self {
            DecodedRecord::Entries(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_single(&self) -> Option<&SingleStruct> {
        match self {
            DecodedRecord::Single(s) => Some(s),
            _ => None,
        }
    }
}

/// Raw per-type frame-group view, retained for diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct RawGroup {
    /// Record type code
    pub type_code: u16,
    /// Registry display name (synthesized for unknown codes)
    pub display_name: String,
    /// Number of frames of this type
    pub count: usize,
    /// Payload length of each frame, in file order
    pub payload_sizes: Vec<usize>,
    /// Sum of payload lengths
    pub total_payload_bytes: usize,
    /// Raw payload bytes; None when the config discards them after decoding
    #[serde(skip_serializing)]
    pub payloads: Option<Vec<Vec<u8>>>,
}

/// Per-type summary line
#[derive(Debug, Clone, Serialize)]
pub struct TypeSummary {
    /// Record type code
    pub type_code: u16,
    /// Registry display name (synthesized for unknown codes)
    pub display_name: String,
    /// Number of frames of this type
    pub count: usize,
    /// Payload length of the first frame
    pub first_payload_len: usize,
    /// True if a decoder ran for this type
    pub decoded: bool,
    /// Malformed payloads skipped during decode
    pub skipped: usize,
}

/// Parse-level diagnostics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    /// Complete frames recovered from the buffer
    pub total_frames: usize,
    /// Partial trailing frames discarded at end of buffer
    pub truncated_frames: usize,
    /// Non-marker bytes skipped while resynchronizing
    pub bytes_skipped: usize,
    /// Display names of clockless types whose positional timestamps could
    /// not be reconstructed (missing or untimed reference series)
    pub untimed: Vec<String>,
}

/// The decoded mission log
///
/// Diagnostic sections live in dedicated fields rather than sharing the
/// record namespace, so they can never collide with a display name.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MissionDataset {
    /// Decoded records, addressable by display name
    pub records: BTreeMap<String, DecodedRecord>,
    /// Raw frame groups per type code, decoded or not
    pub raw_groups: BTreeMap<u16, RawGroup>,
    /// Per-type summary, ordered by type code
    pub summary: Vec<TypeSummary>,
    /// What was skipped or degraded during the parse
    pub diagnostics: Diagnostics,
}

impl MissionDataset {
    /// Look up a decoded record by display name
    pub fn record(&self, display_name: &str) -> Option<&DecodedRecord> {
        self.records.get(display_name)
    }

    /// Look up a decoded series by display name
    pub fn series(&self, display_name: &str) -> Option<&Series> {
        self.record(display_name).and_then(DecodedRecord::as_series)
    }

    /// Look up a decoded entry list by display name
    pub fn entries(&self, display_name: &str) -> Option<&EntryList> {
        self.record(display_name).and_then(DecodedRecord::as_entries)
    }
}
