//! Decoders for one-shot record types
//!
//! These types describe the vehicle rather than the mission: a name, a
//! startup info log, a manufacturer string. They are logged a handful of
//! times per mission with identical content, so they collapse to a single
//! flat field map.

use super::{cstr, DecodeOutcome};
use crate::scanner::GroupedFrame;
use crate::types::{DecodedRecord, FieldValue, SingleStruct};

/// Vehicle Name (0x03F4, 35 bytes)
///
/// A 0x15 sub-type byte followed by the null-terminated vehicle name.
/// The first well-formed payload wins; malformed ones before it are
/// counted as skipped.
pub fn decode_vehicle_name(frames: &[GroupedFrame]) -> DecodeOutcome {
    let mut single = SingleStruct::default();
    let mut skipped = 0usize;

    for frame in frames {
        let p = &frame.payload;
        if p.len() < 2 || p[0] != 0x15 {
            skipped += 1;
            log::debug!("malformed vehicle-name payload at offset {}", frame.offset);
            continue;
        }
        let name = cstr(&p[1..]);
        if name.is_empty() {
            skipped += 1;
            continue;
        }
        single.fields.insert("name".into(), FieldValue::Text(name));
        break;
    }

    DecodeOutcome {
        record: DecodedRecord::Single(single),
        offsets: Vec::new(),
        skipped,
    }
}

/// Vehicle Info startup log (0x040D, variable length)
///
/// Each payload holds one `label\nvalue` pair logged at vehicle startup
/// (serial number, firmware versions, fitted sensors). All pairs fold into
/// one map.
pub fn decode_vehicle_info(frames: &[GroupedFrame]) -> DecodeOutcome {
    let mut single = SingleStruct::default();
    let mut skipped = 0usize;

    for frame in frames {
        let p = &frame.payload;
        if p.len() < 3 {
            skipped += 1;
            continue;
        }
        let text = cstr(&p[2..]);
        let text = text.trim();
        if text.is_empty() {
            skipped += 1;
            continue;
        }
        let (label, value) = match text.split_once('\n') {
            Some((l, v)) => (l.trim().to_string(), v.trim().to_string()),
            None => (text.to_string(), String::new()),
        };
        single.fields.insert(label, FieldValue::Text(value));
    }

    DecodeOutcome {
        record: DecodedRecord::Single(single),
        offsets: Vec::new(),
        skipped,
    }
}

/// Manufacturer Info (0x0416, 108 bytes)
pub fn decode_manufacturer(frames: &[GroupedFrame]) -> DecodeOutcome {
    let mut single = SingleStruct::default();
    let mut skipped = 0usize;

    for frame in frames {
        let p = &frame.payload;
        if p.len() < 2 {
            skipped += 1;
            continue;
        }
        let info = cstr(&p[1..]);
        if info.is_empty() {
            skipped += 1;
            continue;
        }
        single.fields.insert("info".into(), FieldValue::Text(info));
        break;
    }

    DecodeOutcome {
        record: DecodedRecord::Single(single),
        offsets: Vec::new(),
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped(payloads: Vec<Vec<u8>>) -> Vec<GroupedFrame> {
        payloads
            .into_iter()
            .map(|payload| GroupedFrame { offset: 0, payload })
            .collect()
    }

    #[test]
    fn test_vehicle_name() {
        let mut p = vec![0x15];
        p.extend_from_slice(b"Aukai\0\0\0");
        let outcome = decode_vehicle_name(&grouped(vec![p]));
        let single = outcome.record.as_single().unwrap();
        assert_eq!(single.get("name"), Some(&FieldValue::Text("Aukai".into())));
    }

    #[test]
    fn test_vehicle_name_bad_discriminator_skipped() {
        let mut bad = vec![0x00];
        bad.extend_from_slice(b"Wrong\0");
        let mut good = vec![0x15];
        good.extend_from_slice(b"Aukai\0");

        let outcome = decode_vehicle_name(&grouped(vec![bad, good]));
        assert_eq!(outcome.skipped, 1);
        let single = outcome.record.as_single().unwrap();
        assert_eq!(single.get("name"), Some(&FieldValue::Text("Aukai".into())));
    }

    #[test]
    fn test_vehicle_info_pairs() {
        let mk = |text: &str| {
            let mut p = vec![0u8, 0u8];
            p.extend_from_slice(text.as_bytes());
            p.push(0);
            p
        };
        let outcome = decode_vehicle_info(&grouped(vec![
            mk("Vehicle Serial Number\nSN 256"),
            mk("RDI ADCP\nNavigator Broadband DVL Version 19.13"),
            mk("Bare label"),
        ]));
        let single = outcome.record.as_single().unwrap();
        assert_eq!(
            single.get("Vehicle Serial Number"),
            Some(&FieldValue::Text("SN 256".into()))
        );
        assert_eq!(single.get("Bare label"), Some(&FieldValue::Text("".into())));
        assert_eq!(single.fields.len(), 3);
    }

    #[test]
    fn test_manufacturer_first_payload_wins() {
        let mut p = vec![0x00];
        p.extend_from_slice(b"Manufactured by Hydroid, Inc.\0");
        let outcome = decode_manufacturer(&grouped(vec![p.clone(), p]));
        let single = outcome.record.as_single().unwrap();
        assert_eq!(
            single.get("info"),
            Some(&FieldValue::Text("Manufactured by Hydroid, Inc.".into()))
        );
        assert_eq!(outcome.skipped, 0);
    }
}
