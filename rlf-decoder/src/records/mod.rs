//! Per-type record decoders
//!
//! Dense, fixed-layout types go through the table-driven series machinery
//! in [`layout`] with their tables in [`dense`]. Variable-shaped per-event
//! types ([`events`]) and one-shot types ([`oneshot`]) have hand-written
//! decoders. Dispatch is an exhaustive match on the registry's decoder
//! enum.

pub mod dense;
pub mod events;
pub mod layout;
pub mod oneshot;

use crate::registry::RecordDecoder;
use crate::scanner::GroupedFrame;
use crate::types::DecodedRecord;

/// What one decoder produced from one type's payload group
#[derive(Debug)]
pub struct DecodeOutcome {
    /// The decoded record
    pub record: DecodedRecord,
    /// Byte offsets of the frames that contributed samples/entries, in
    /// file order - the basis for positional time reconstruction
    pub offsets: Vec<usize>,
    /// Malformed payloads skipped
    pub skipped: usize,
}

/// Run the decoder for one record type over its ordered payload group
pub fn decode_group(decoder: RecordDecoder, frames: &[GroupedFrame]) -> DecodeOutcome {
    match decoder {
        RecordDecoder::Navigation => layout::decode_series(frames, &dense::NAVIGATION),
        RecordDecoder::YsiCtd => layout::decode_series(frames, &dense::YSI_CTD),
        RecordDecoder::SeabirdCtd => layout::decode_series(frames, &dense::SEABIRD_CTD),
        RecordDecoder::AdcpDvl => layout::decode_series(frames, &dense::ADCP_DVL),
        RecordDecoder::Sidescan => layout::decode_series(frames, &dense::SIDESCAN),
        RecordDecoder::EcoBb2f => layout::decode_series(frames, &dense::ECO_BB2F),
        RecordDecoder::EnergyMonitor => layout::decode_series(frames, &dense::ENERGY_MONITOR),
        RecordDecoder::ObjectiveNav => layout::decode_series(frames, &dense::OBJECTIVE_NAV),
        RecordDecoder::ModemLog => events::decode_modem_log(frames),
        RecordDecoder::Waypoints => events::decode_waypoints(frames),
        RecordDecoder::BatteryStatus => events::decode_battery_status(frames),
        RecordDecoder::VehicleName => oneshot::decode_vehicle_name(frames),
        RecordDecoder::VehicleInfo => oneshot::decode_vehicle_info(frames),
        RecordDecoder::Manufacturer => oneshot::decode_manufacturer(frames),
    }
}

/// Decode a null-terminated byte region as text
///
/// Takes everything up to the first NUL (or the whole slice) and replaces
/// non-UTF8 bytes, matching how the firmware pads its strings.
pub(crate) fn cstr(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cstr_stops_at_nul() {
        assert_eq!(cstr(b"Aukai\0\0junk"), "Aukai");
        assert_eq!(cstr(b"no-terminator"), "no-terminator");
        assert_eq!(cstr(b"\0"), "");
    }
}
