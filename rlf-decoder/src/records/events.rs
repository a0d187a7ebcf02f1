//! Decoders for per-event record types
//!
//! These types are inherently per-event rather than dense: consumers need
//! one event's full field set (a waypoint's name next to its position, a
//! battery bank's identity strings next to its voltages), so they decode
//! to entry lists, not series.

use super::{cstr, DecodeOutcome};
use crate::scanner::GroupedFrame;
use crate::types::{DecodeError, DecodedRecord, Entry, EntryList, FieldValue, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Acoustic Modem Log (0x0424)
///
/// Each payload is a flag byte, a padding byte, and a null-terminated
/// message of the form `{dir}({source}) {counter}:{message}` where dir is
/// `>` (outgoing) or `<` (incoming). This is the one known record type with
/// no embedded clock; its `t_hrs` is filled in later by positional
/// interpolation when a reference series is available.
pub fn decode_modem_log(frames: &[GroupedFrame]) -> DecodeOutcome {
    let mut entries = Vec::with_capacity(frames.len());
    let mut offsets = Vec::with_capacity(frames.len());
    let mut skipped = 0usize;

    for frame in frames {
        match modem_entry(&frame.payload) {
            Ok(entry) => {
                entries.push(entry);
                offsets.push(frame.offset);
            }
            Err(e) => {
                skipped += 1;
                log::debug!("skipping modem payload at offset {}: {}", frame.offset, e);
            }
        }
    }

    DecodeOutcome {
        record: DecodedRecord::Entries(EntryList {
            entries,
            t_hrs: None,
        }),
        offsets,
        skipped,
    }
}

fn modem_entry(payload: &[u8]) -> Result<Entry> {
    if payload.len() < 3 {
        return Err(DecodeError::PayloadTooShort {
            got: payload.len(),
            need: 3,
        });
    }
    let text = cstr(&payload[2..]);
    let text = text.trim();
    if text.is_empty() {
        return Err(DecodeError::EmptyText);
    }

    let mut entry = Entry::new();
    match parse_modem_line(text) {
        Some((direction, source, counter, message)) => {
            entry.insert("direction".into(), FieldValue::Text(direction.to_string()));
            entry.insert("source".into(), FieldValue::Text(source.to_string()));
            entry.insert("counter".into(), FieldValue::Integer(counter as i64));
            entry.insert("message".into(), FieldValue::Text(message.to_string()));
        }
        None => {
            // Keep unstructured lines whole rather than dropping them
            entry.insert("direction".into(), FieldValue::Missing);
            entry.insert("source".into(), FieldValue::Missing);
            entry.insert("counter".into(), FieldValue::Missing);
            entry.insert("message".into(), FieldValue::Text(text.to_string()));
        }
    }
    Ok(entry)
}

/// Split `{dir}({source}) {counter}:{message}` into its parts
fn parse_modem_line(text: &str) -> Option<(char, &str, u32, &str)> {
    let direction = text.chars().next()?;
    if direction != '>' && direction != '<' {
        return None;
    }
    let rest = text[1..].strip_prefix('(')?;
    let close = rest.find(')')?;
    let source = &rest[..close];
    if source.is_empty() {
        return None;
    }
    let rest = rest[close + 1..].trim_start();
    let colon = rest.find(':')?;
    let counter: u32 = rest[..colon].trim().parse().ok()?;
    Some((direction, source, counter, rest[colon + 1..].trim()))
}

/// Mission Waypoints (0x0427, 31-32 bytes)
///
/// Fixed numerics followed by a variable-length, null-terminated waypoint
/// name.
pub fn decode_waypoints(frames: &[GroupedFrame]) -> DecodeOutcome {
    const MIN_LEN: usize = 19; // lat + lon + flags + at least one name byte

    let mut entries = Vec::with_capacity(frames.len());
    let mut offsets = Vec::with_capacity(frames.len());
    let mut skipped = 0usize;

    for frame in frames {
        let p = &frame.payload;
        if p.len() < MIN_LEN {
            skipped += 1;
            log::debug!(
                "skipping waypoint payload at offset {}: {} bytes",
                frame.offset,
                p.len()
            );
            continue;
        }
        let mut entry = Entry::new();
        entry.insert("lat".into(), FieldValue::Float(LittleEndian::read_f64(&p[0..8])));
        entry.insert("lon".into(), FieldValue::Float(LittleEndian::read_f64(&p[8..16])));
        entry.insert(
            "flags".into(),
            FieldValue::Integer(LittleEndian::read_u16(&p[16..18]) as i64),
        );
        entry.insert("name".into(), FieldValue::Text(cstr(&p[18..])));
        entries.push(entry);
        offsets.push(frame.offset);
    }

    DecodeOutcome {
        record: DecodedRecord::Entries(EntryList {
            entries,
            t_hrs: None,
        }),
        offsets,
        skipped,
    }
}

/// Smart Battery Status (0x0412, 139 bytes)
///
/// One record per battery bank per logging cycle. Voltage and capacity
/// words sit at fixed offsets; the bank's identity (part number, serial,
/// chemistry, manufacturing date/time) arrives as null-separated strings in
/// the tail and is classified by content.
pub fn decode_battery_status(frames: &[GroupedFrame]) -> DecodeOutcome {
    const MIN_LEN: usize = 40;

    let mut entries = Vec::with_capacity(frames.len());
    let mut offsets = Vec::with_capacity(frames.len());
    let mut skipped = 0usize;

    for frame in frames {
        let p = &frame.payload;
        if p.len() < MIN_LEN {
            skipped += 1;
            log::debug!(
                "skipping battery payload at offset {}: {} bytes",
                frame.offset,
                p.len()
            );
            continue;
        }
        let mut entry = Entry::new();
        let word = |lo: usize| LittleEndian::read_u16(&p[lo..lo + 2]) as i64;
        entry.insert("batt_id".into(), FieldValue::Integer(word(2)));
        entry.insert("capacity_mah".into(), FieldValue::Integer(word(8)));
        entry.insert("design_mv".into(), FieldValue::Integer(word(10)));
        entry.insert("cell_mv".into(), FieldValue::Integer(word(36)));
        entry.insert("pack_mv".into(), FieldValue::Integer(word(38)));

        for s in printable_runs(p) {
            if let Some(key) = classify_identity(&s) {
                entry.entry(key.into()).or_insert(FieldValue::Text(s));
            }
        }
        entries.push(entry);
        offsets.push(frame.offset);
    }

    DecodeOutcome {
        record: DecodedRecord::Entries(EntryList {
            entries,
            t_hrs: None,
        }),
        offsets,
        skipped,
    }
}

/// Null-separated printable ASCII runs of at least 3 characters
fn printable_runs(payload: &[u8]) -> Vec<String> {
    payload
        .split(|&b| b == 0)
        .filter(|part| part.len() > 2 && part.iter().all(|&b| (0x20..0x7F).contains(&b)))
        .map(|part| String::from_utf8_lossy(part).into_owned())
        .collect()
}

/// Recognize which identity field a battery tail string is
fn classify_identity(s: &str) -> Option<&'static str> {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    if s.starts_with("RE") {
        Some("part_number")
    } else if s.len() == 6 && s.chars().all(|c| c.is_ascii_digit()) {
        Some("serial")
    } else if s.contains("ION") || s.contains("ACID") || s.contains("NiMH") {
        Some("chemistry")
    } else if MONTHS.iter().any(|m| s.contains(m)) {
        Some("mfg_date")
    } else if s.len() == 8 && s.contains(':') {
        Some("mfg_time")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    fn grouped(payloads: Vec<Vec<u8>>) -> Vec<GroupedFrame> {
        payloads
            .into_iter()
            .enumerate()
            .map(|(i, payload)| GroupedFrame {
                offset: 100 * (i + 1),
                payload,
            })
            .collect()
    }

    fn modem_payload(text: &str) -> Vec<u8> {
        let mut p = vec![0x01, 0x00];
        p.extend_from_slice(text.as_bytes());
        p.push(0);
        p
    }

    #[test]
    fn test_modem_structured_line() {
        let frames = grouped(vec![modem_payload(">(VehM) 17:Data quality: (2) 150")]);
        let outcome = decode_modem_log(&frames);
        let list = outcome.record.as_entries().unwrap();

        assert_eq!(list.len(), 1);
        let e = &list.entries[0];
        assert_eq!(e["direction"], FieldValue::Text(">".into()));
        assert_eq!(e["source"], FieldValue::Text("VehM".into()));
        assert_eq!(e["counter"], FieldValue::Integer(17));
        assert_eq!(e["message"], FieldValue::Text("Data quality: (2) 150".into()));
        assert_eq!(outcome.offsets, vec![100]);
    }

    #[test]
    fn test_modem_unstructured_line_kept() {
        let frames = grouped(vec![modem_payload("modem power cycled")]);
        let outcome = decode_modem_log(&frames);
        let e = &outcome.record.as_entries().unwrap().entries[0];

        assert_eq!(e["direction"], FieldValue::Missing);
        assert_eq!(e["message"], FieldValue::Text("modem power cycled".into()));
    }

    #[test]
    fn test_modem_short_payload_skipped() {
        let frames = grouped(vec![vec![0x01], modem_payload("<(Veh) 3:ok")]);
        let outcome = decode_modem_log(&frames);

        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.record.as_entries().unwrap().len(), 1);
        assert_eq!(outcome.offsets, vec![200]);
    }

    #[test]
    fn test_waypoint_name_and_position() {
        let mut p = Vec::new();
        p.write_f64::<LittleEndian>(21.533).unwrap();
        p.write_f64::<LittleEndian>(-158.233).unwrap();
        p.write_u16::<LittleEndian>(3).unwrap();
        p.extend_from_slice(b"NWCRNR2\0\0\0");

        let outcome = decode_waypoints(&grouped(vec![p]));
        let e = &outcome.record.as_entries().unwrap().entries[0];

        assert_eq!(e["lat"], FieldValue::Float(21.533));
        assert_eq!(e["flags"], FieldValue::Integer(3));
        assert_eq!(e["name"], FieldValue::Text("NWCRNR2".into()));
    }

    #[test]
    fn test_battery_fields_and_identity() {
        let mut p = vec![0u8; 60];
        LittleEndian::write_u16(&mut p[2..4], 2723);
        LittleEndian::write_u16(&mut p[8..10], 5500);
        LittleEndian::write_u16(&mut p[10..12], 28700);
        LittleEndian::write_u16(&mut p[36..38], 3100);
        LittleEndian::write_u16(&mut p[38..40], 26500);
        p.extend_from_slice(b"RE003\0102455\0LiION\0Dec  2 2009\018:02:07\0");

        let outcome = decode_battery_status(&grouped(vec![p]));
        let e = &outcome.record.as_entries().unwrap().entries[0];

        assert_eq!(e["batt_id"], FieldValue::Integer(2723));
        assert_eq!(e["pack_mv"], FieldValue::Integer(26500));
        assert_eq!(e["part_number"], FieldValue::Text("RE003".into()));
        assert_eq!(e["serial"], FieldValue::Text("102455".into()));
        assert_eq!(e["chemistry"], FieldValue::Text("LiION".into()));
        assert_eq!(e["mfg_date"], FieldValue::Text("Dec  2 2009".into()));
        assert_eq!(e["mfg_time"], FieldValue::Text("18:02:07".into()));
    }

    #[test]
    fn test_parse_modem_line_rejects_noise() {
        assert!(parse_modem_line("no direction marker").is_none());
        assert!(parse_modem_line(">missing parens 1:x").is_none());
        assert!(parse_modem_line(">(Veh) notanumber:x").is_none());
    }
}
