//! Table-driven decoding for dense record types
//!
//! Every fixed-layout type is described by a [`SeriesLayout`]: a const table
//! of named fields (byte offset, primitive kind, optional scale/bias), an
//! optional embedded-clock offset, and an optional one-byte discriminator.
//! One generic routine walks the payload group and fills parallel columns,
//! so adding a dense type is a data change, not new code.
//!
//! Field offsets, widths, and scale factors are reverse-engineered, fixed
//! knowledge; nothing here infers a layout from the data.

use super::DecodeOutcome;
use crate::scanner::GroupedFrame;
use crate::timeline;
use crate::types::{Column, DecodeError, DecodedRecord, Result, Series};
use byteorder::{ByteOrder, LittleEndian};

/// Primitive field kinds, all little-endian
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    U16,
    U32,
    F32,
    F64,
}

impl FieldKind {
    /// Width of the field in bytes
    pub fn width(self) -> usize {
        match self {
            FieldKind::U8 => 1,
            FieldKind::U16 => 2,
            FieldKind::U32 | FieldKind::F32 => 4,
            FieldKind::F64 => 8,
        }
    }
}

/// The f32 bit pattern that marks "no valid reading" in range/altitude
/// fields, compared with the original's tolerance rather than bit equality
pub const SENTINEL_F32: f32 = -32.768;
const SENTINEL_TOLERANCE: f64 = 0.01;

/// One field of a dense record layout
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
    /// physical = raw * scale + bias
    pub scale: f64,
    pub bias: f64,
    /// True if [`SENTINEL_F32`] maps this field to the missing marker
    pub sentinel: bool,
}

/// Plain field, no scaling
pub const fn field(name: &'static str, offset: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        kind,
        scale: 1.0,
        bias: 0.0,
        sentinel: false,
    }
}

/// Field with a linear calibration
pub const fn scaled(
    name: &'static str,
    offset: usize,
    kind: FieldKind,
    scale: f64,
    bias: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        kind,
        scale,
        bias,
        sentinel: false,
    }
}

/// Field whose sentinel pattern decodes to the missing marker
pub const fn sentinel(name: &'static str, offset: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        offset,
        kind,
        scale: 1.0,
        bias: 0.0,
        sentinel: true,
    }
}

/// Fixed layout of one dense record type
#[derive(Debug)]
pub struct SeriesLayout {
    /// Payloads shorter than this are skipped and counted
    pub min_len: usize,
    /// Byte offset of the embedded u32 clock, if the type carries one
    pub clock_offset: Option<usize>,
    /// (offset, expected value) of a one-byte discriminator, if any
    pub discriminator: Option<(usize, u8)>,
    /// Fields in layout order
    pub fields: &'static [FieldSpec],
}

/// Extract one field from a payload as a physical value
///
/// The payload must already be length-checked against the layout.
fn extract(payload: &[u8], spec: &FieldSpec) -> f64 {
    let raw = match spec.kind {
        FieldKind::U8 => payload[spec.offset] as f64,
        FieldKind::U16 => LittleEndian::read_u16(&payload[spec.offset..]) as f64,
        FieldKind::U32 => LittleEndian::read_u32(&payload[spec.offset..]) as f64,
        FieldKind::F32 => LittleEndian::read_f32(&payload[spec.offset..]) as f64,
        FieldKind::F64 => LittleEndian::read_f64(&payload[spec.offset..]),
    };
    if spec.sentinel && (raw - SENTINEL_F32 as f64).abs() < SENTINEL_TOLERANCE {
        return f64::NAN;
    }
    raw * spec.scale + spec.bias
}

/// Check a payload against the layout's structural requirements
fn validate(payload: &[u8], layout: &SeriesLayout) -> Result<()> {
    if payload.len() < layout.min_len {
        return Err(DecodeError::PayloadTooShort {
            got: payload.len(),
            need: layout.min_len,
        });
    }
    if let Some((offset, expected)) = layout.discriminator {
        let found = payload[offset];
        if found != expected {
            return Err(DecodeError::BadDiscriminator {
                offset,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Decode one type's payload group into a dense series
///
/// Malformed payloads are skipped and counted; they never abort the rest of
/// the group. If the layout carries a clock, the series gets an unwrapped
/// `t_hrs` axis zeroed on its own first sample, plus the UTC time of day of
/// that sample.
pub fn decode_series(frames: &[GroupedFrame], layout: &SeriesLayout) -> DecodeOutcome {
    let mut columns: Vec<Vec<f64>> = layout
        .fields
        .iter()
        .map(|_| Vec::with_capacity(frames.len()))
        .collect();
    let mut clock_raw: Vec<u32> = Vec::new();
    let mut offsets = Vec::with_capacity(frames.len());
    let mut skipped = 0usize;

    for frame in frames {
        if let Err(e) = validate(&frame.payload, layout) {
            skipped += 1;
            log::debug!("skipping payload at offset {}: {}", frame.offset, e);
            continue;
        }
        for (values, spec) in columns.iter_mut().zip(layout.fields) {
            values.push(extract(&frame.payload, spec));
        }
        if let Some(off) = layout.clock_offset {
            clock_raw.push(LittleEndian::read_u32(&frame.payload[off..]));
        }
        offsets.push(frame.offset);
    }

    let t_hrs = if clock_raw.is_empty() {
        None
    } else {
        Some(timeline::elapsed_hours(&clock_raw))
    };
    let start_clock = clock_raw.first().and_then(|&r| timeline::time_of_day(r));

    let series = Series {
        columns: layout
            .fields
            .iter()
            .zip(columns)
            .map(|(spec, values)| Column {
                name: spec.name,
                values,
            })
            .collect(),
        t_hrs,
        start_clock,
    };

    DecodeOutcome {
        record: DecodedRecord::Series(series),
        offsets,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    const TEST_FIELDS: &[FieldSpec] = &[
        field("depth", 0, FieldKind::F32),
        sentinel("altitude", 4, FieldKind::F32),
        scaled("setpoint", 8, FieldKind::U16, 0.1, 0.0),
    ];

    const TEST_LAYOUT: SeriesLayout = SeriesLayout {
        min_len: 14,
        clock_offset: Some(10),
        discriminator: None,
        fields: TEST_FIELDS,
    };

    fn payload(depth: f32, altitude: f32, setpoint: u16, clock: u32) -> Vec<u8> {
        let mut p = Vec::new();
        p.write_f32::<LittleEndian>(depth).unwrap();
        p.write_f32::<LittleEndian>(altitude).unwrap();
        p.write_u16::<LittleEndian>(setpoint).unwrap();
        p.write_u32::<LittleEndian>(clock).unwrap();
        p
    }

    fn frames(payloads: Vec<Vec<u8>>) -> Vec<GroupedFrame> {
        payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| GroupedFrame {
                offset: i * 64,
                payload,
            })
            .collect()
    }

    #[test]
    fn test_decode_series_basic() {
        let group = frames(vec![
            payload(4.0, 2.5, 40, 1000),
            payload(5.0, 3.0, 45, 2000),
        ]);
        let outcome = decode_series(&group, &TEST_LAYOUT);
        let series = outcome.record.as_series().unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.column("depth").unwrap(), &[4.0, 5.0]);
        assert_eq!(series.column("setpoint").unwrap(), &[4.0, 4.5]);
        assert_eq!(outcome.offsets, vec![0, 64]);
        assert_eq!(outcome.skipped, 0);

        let t = series.t_hrs.as_ref().unwrap();
        assert_eq!(t[0], 0.0);
        assert!(t[1] > 0.0);
    }

    #[test]
    fn test_decode_series_sentinel_to_nan() {
        let group = frames(vec![payload(4.0, SENTINEL_F32, 0, 0)]);
        let outcome = decode_series(&group, &TEST_LAYOUT);
        let series = outcome.record.as_series().unwrap();

        assert!(series.column("altitude").unwrap()[0].is_nan());
        // depth is not a sentinel field: the literal survives
        assert_eq!(series.column("depth").unwrap()[0], 4.0);
    }

    #[test]
    fn test_decode_series_skips_short_payload() {
        let group = frames(vec![
            payload(1.0, 1.0, 10, 100),
            vec![0u8; 4],
            payload(2.0, 2.0, 20, 200),
        ]);
        let outcome = decode_series(&group, &TEST_LAYOUT);
        let series = outcome.record.as_series().unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.offsets, vec![0, 128]);
    }

    #[test]
    fn test_decode_series_discriminator() {
        const GUARDED: SeriesLayout = SeriesLayout {
            min_len: 14,
            clock_offset: None,
            discriminator: Some((13, 0x15)),
            fields: TEST_FIELDS,
        };
        let mut good = payload(1.0, 1.0, 10, 0);
        good[13] = 0x15;
        let bad = payload(2.0, 2.0, 20, 0);

        let outcome = decode_series(&frames(vec![good, bad]), &GUARDED);
        assert_eq!(outcome.record.as_series().unwrap().len(), 1);
        assert_eq!(outcome.skipped, 1);
    }

    #[test]
    fn test_empty_group() {
        let outcome = decode_series(&[], &TEST_LAYOUT);
        let series = outcome.record.as_series().unwrap();
        assert!(series.is_empty());
        assert!(series.t_hrs.is_none());
        assert!(series.start_clock.is_none());
    }
}
