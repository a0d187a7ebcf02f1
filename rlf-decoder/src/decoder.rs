//! Mission assembler - the main decode pipeline
//!
//! Runs Scanner -> Demultiplexer -> registry-driven per-type decoding ->
//! positional interpolation -> dataset assembly. The pipeline is a pure
//! function of the input buffer: no hidden state, no wall clock, so the
//! same bytes always produce the same dataset, and independent calls can
//! run on as many threads as the caller likes.
//!
//! Nothing in here aborts the parse. Truncation, unknown codes, malformed
//! payloads, and a missing interpolation reference all degrade locally and
//! are reported through the dataset's diagnostics.

use crate::config::DecoderConfig;
use crate::records;
use crate::registry;
use crate::scanner;
use crate::timeline;
use crate::types::{DecodedRecord, Diagnostics, MissionDataset, RawGroup, TypeSummary};
use std::collections::BTreeMap;

/// Record types that carry no clock and receive positional timestamps
const POSITIONAL_TYPES: &[u16] = &[registry::REC_MODEM_LOG];

/// Decode a complete mission-log buffer into a dataset
///
/// Always returns a best-effort dataset; a buffer with zero recognizable
/// frames yields an empty-but-valid one.
pub fn decode(data: &[u8], config: &DecoderConfig) -> MissionDataset {
    let scan = scanner::scan(data);
    log::info!(
        "scanned {} bytes: {} frames, {} truncated, {} bytes skipped",
        data.len(),
        scan.frames.len(),
        scan.truncated_frames,
        scan.bytes_skipped
    );

    let mut diagnostics = Diagnostics {
        total_frames: scan.frames.len(),
        truncated_frames: scan.truncated_frames,
        bytes_skipped: scan.bytes_skipped,
        untimed: Vec::new(),
    };

    let groups = scanner::demultiplex(scan.frames);
    log::debug!("{} distinct record types", groups.type_count());

    let mut records_map: BTreeMap<String, DecodedRecord> = BTreeMap::new();
    let mut summary: Vec<TypeSummary> = Vec::new();
    let mut offsets_by_code: BTreeMap<u16, Vec<usize>> = BTreeMap::new();

    for (code, frames) in groups.iter() {
        let display_name = registry::display_name(code);
        let decoder = if config.decode_records {
            registry::lookup(code).and_then(|r| r.decoder)
        } else {
            None
        };

        let mut skipped = 0;
        if let Some(decoder) = decoder {
            let outcome = records::decode_group(decoder, frames);
            if outcome.skipped > 0 {
                log::warn!(
                    "{}: skipped {} of {} payloads",
                    display_name,
                    outcome.skipped,
                    frames.len()
                );
            }
            skipped = outcome.skipped;
            offsets_by_code.insert(code, outcome.offsets);
            records_map.insert(display_name.clone(), outcome.record);
        } else {
            log::trace!(
                "{} (0x{:04x}): no decoder, {} payloads pass through raw",
                display_name,
                code,
                frames.len()
            );
        }

        summary.push(TypeSummary {
            type_code: code,
            display_name,
            count: frames.len(),
            first_payload_len: frames.first().map_or(0, |f| f.payload.len()),
            decoded: decoder.is_some(),
            skipped,
        });
    }

    attach_positional_times(config, &mut records_map, &offsets_by_code, &mut diagnostics);

    let mut raw_groups: BTreeMap<u16, RawGroup> = BTreeMap::new();
    for (code, frames) in groups.into_iter() {
        let payload_sizes: Vec<usize> = frames.iter().map(|f| f.payload.len()).collect();
        raw_groups.insert(
            code,
            RawGroup {
                type_code: code,
                display_name: registry::display_name(code),
                count: frames.len(),
                total_payload_bytes: payload_sizes.iter().sum(),
                payload_sizes,
                payloads: config
                    .keep_raw_payloads
                    .then(|| frames.into_iter().map(|f| f.payload).collect()),
            },
        );
    }

    MissionDataset {
        records: records_map,
        raw_groups,
        summary,
        diagnostics,
    }
}

/// Give clockless types a `t_hrs` axis interpolated from the reference
/// series, or surface the degradation when that is impossible
fn attach_positional_times(
    config: &DecoderConfig,
    records_map: &mut BTreeMap<String, DecodedRecord>,
    offsets_by_code: &BTreeMap<u16, Vec<usize>>,
    diagnostics: &mut Diagnostics,
) {
    let reference = reference_axis(config.reference_type, records_map, offsets_by_code);

    for &code in POSITIONAL_TYPES {
        let display_name = registry::display_name(code);
        let Some(DecodedRecord::Entries(list)) = records_map.get_mut(&display_name) else {
            continue;
        };
        if list.entries.is_empty() {
            continue;
        }
        match &reference {
            Some((ref_offsets, ref_t_hrs)) => {
                let targets = &offsets_by_code[&code];
                list.t_hrs = Some(timeline::interp_by_offset(targets, ref_offsets, ref_t_hrs));
                log::debug!(
                    "{}: {} entries timestamped against reference 0x{:04x}",
                    display_name,
                    list.len(),
                    config.reference_type
                );
            }
            None => {
                log::warn!(
                    "{}: reference series 0x{:04x} missing or untimed, entries left without t_hrs",
                    display_name,
                    config.reference_type
                );
                diagnostics.untimed.push(display_name);
            }
        }
    }
}

/// Byte offsets and `t_hrs` of the configured reference series, if it
/// decoded with an intrinsic clock
fn reference_axis(
    reference_type: u16,
    records_map: &BTreeMap<String, DecodedRecord>,
    offsets_by_code: &BTreeMap<u16, Vec<usize>>,
) -> Option<(Vec<usize>, Vec<f64>)> {
    let name = registry::display_name(reference_type);
    let series = records_map.get(&name)?.as_series()?;
    let t_hrs = series.t_hrs.clone()?;
    let offsets = offsets_by_code.get(&reference_type)?.clone();
    if offsets.is_empty() {
        return None;
    }
    debug_assert_eq!(offsets.len(), t_hrs.len());
    Some((offsets, t_hrs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_buffer_is_valid() {
        let dataset = decode(&[], &DecoderConfig::new());
        assert!(dataset.records.is_empty());
        assert!(dataset.raw_groups.is_empty());
        assert!(dataset.summary.is_empty());
        assert_eq!(dataset.diagnostics.total_frames, 0);
        assert_eq!(dataset.diagnostics.truncated_frames, 0);
    }

    #[test]
    fn test_garbage_only_buffer_is_valid() {
        let dataset = decode(&[0x00, 0x11, 0x22, 0x33], &DecoderConfig::new());
        assert!(dataset.records.is_empty());
        assert_eq!(dataset.diagnostics.bytes_skipped, 4);
    }
}
