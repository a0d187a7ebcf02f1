//! Record type registry
//!
//! One immutable table maps every record type code observed in the format
//! to its display name and, where the layout has been worked out, a decoder
//! variant. The table is const data turned into a lookup map once at
//! startup; there is no runtime registration and no reflection, so it is
//! safely shared read-only across concurrent parses.
//!
//! Codes absent from the table are not errors: they get a synthesized
//! display name embedding the hex code, and their payloads pass through
//! undecoded but counted, so the dataset stays complete as new record types
//! are discovered.

use std::collections::HashMap;
use std::sync::OnceLock;

// Record type codes
pub const REC_NAV: u16 = 0x044E; // Navigation
pub const REC_CTD_YSI: u16 = 0x041D; // YSI CTD
pub const REC_CTD_SBE: u16 = 0x040A; // Seabird CTD (SBE49)
pub const REC_ADCP: u16 = 0x03E8; // ADCP / DVL (1200 kHz)
pub const REC_SIDESCAN: u16 = 0x03F7; // MSTL Sidescan (900 kHz)
pub const REC_ECO: u16 = 0x043E; // Wetlabs ECO BB2F
pub const REC_GPS: u16 = 0x03F9; // GPS / acoustic navigation
pub const REC_VEHICLE_NAME: u16 = 0x03F4; // Vehicle name string
pub const REC_VEHICLE_INFO: u16 = 0x040D; // Vehicle startup info log
pub const REC_MANUFACTURER: u16 = 0x0416; // Manufacturer info string
pub const REC_MODEM_LOG: u16 = 0x0424; // Acoustic modem communication log
pub const REC_DIAGNOSTIC: u16 = 0x03E9; // Firmware diagnostic / warning log
pub const REC_MISSION_MODES: u16 = 0x03EE; // Mission mode lookup table
pub const REC_MISSION_LEGS: u16 = 0x03F0; // Mission leg / objective waypoints
pub const REC_SENSOR_NAMES: u16 = 0x03FC; // Sensor name strings
pub const REC_SENSOR_TYPES: u16 = 0x0407; // Sensor type ID to name mapping
pub const REC_SENSOR_DISPLAY: u16 = 0x040C; // Sensor display format config
pub const REC_NAV_ACOUSTIC: u16 = 0x041A; // Navigation / acoustic positioning
pub const REC_DATA_CHANNELS: u16 = 0x041C; // Internal data channel definitions
pub const REC_WAYPOINTS: u16 = 0x0427; // Mission waypoints with lat/lon
pub const REC_ECO_CAL: u16 = 0x043D; // ECO BB2F channel calibration
pub const REC_ACOUSTIC_FIX: u16 = 0x041F; // Acoustic transponder nav fix
pub const REC_BATTERY_STATUS: u16 = 0x0412; // Smart battery status
pub const REC_BATTERY_CELLS: u16 = 0x0413; // Smart battery cell-level data
pub const REC_OBJ_NAV: u16 = 0x03F1; // Objective navigation (leg progress)
pub const REC_COMPASS_CAL: u16 = 0x0415; // Compass calibration
pub const REC_HOUSING_TEMP: u16 = 0x040E; // Housing temperature
pub const REC_ENERGY_MON: u16 = 0x0402; // Energy monitor
pub const REC_DVL_STATUS: u16 = 0x040B; // DVL subsystem diagnostics
pub const REC_SUBSYS_MODE: u16 = 0x0408; // Subsystem mode flag register
pub const REC_STARTUP_FLAG: u16 = 0x0446; // Startup marker
pub const REC_EVENT_MARKER: u16 = 0x03EF; // Empty-payload phase marker

/// Decoder selector, one variant per record type with a known layout
///
/// A tagged enum rather than function pointers so the dispatch site is an
/// exhaustive match and adding a decoder is a compile-checked change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordDecoder {
    Navigation,
    YsiCtd,
    SeabirdCtd,
    AdcpDvl,
    Sidescan,
    EcoBb2f,
    EnergyMonitor,
    ObjectiveNav,
    ModemLog,
    Waypoints,
    BatteryStatus,
    VehicleName,
    VehicleInfo,
    Manufacturer,
}

/// One registry row
#[derive(Debug)]
pub struct RecordType {
    /// Record type code
    pub code: u16,
    /// Display name, the stable addressing key of the dataset
    pub name: &'static str,
    /// Decoder for this type, if its layout is known
    pub decoder: Option<RecordDecoder>,
}

/// All record types observed in the format, decodable or not
pub const RECORD_TYPES: &[RecordType] = &[
    RecordType { code: REC_ADCP, name: "ADCP/DVL (1200 kHz)", decoder: Some(RecordDecoder::AdcpDvl) },
    RecordType { code: REC_DIAGNOSTIC, name: "Diagnostic Log", decoder: None },
    RecordType { code: REC_MISSION_MODES, name: "Mission Modes", decoder: None },
    RecordType { code: REC_EVENT_MARKER, name: "Event Marker", decoder: None },
    RecordType { code: REC_MISSION_LEGS, name: "Mission Legs", decoder: None },
    RecordType { code: REC_OBJ_NAV, name: "Objective Navigation", decoder: Some(RecordDecoder::ObjectiveNav) },
    RecordType { code: REC_VEHICLE_NAME, name: "Vehicle Name", decoder: Some(RecordDecoder::VehicleName) },
    RecordType { code: REC_SIDESCAN, name: "Sidescan (900 kHz)", decoder: Some(RecordDecoder::Sidescan) },
    RecordType { code: REC_GPS, name: "GPS/Acoustic Nav", decoder: None },
    RecordType { code: REC_SENSOR_NAMES, name: "Sensor Names", decoder: None },
    RecordType { code: REC_ENERGY_MON, name: "Energy Monitor", decoder: Some(RecordDecoder::EnergyMonitor) },
    RecordType { code: REC_SENSOR_TYPES, name: "Sensor Types", decoder: None },
    RecordType { code: REC_SUBSYS_MODE, name: "Subsystem Mode", decoder: None },
    RecordType { code: REC_CTD_SBE, name: "Seabird CTD (SBE49)", decoder: Some(RecordDecoder::SeabirdCtd) },
    RecordType { code: REC_DVL_STATUS, name: "DVL Status", decoder: None },
    RecordType { code: REC_SENSOR_DISPLAY, name: "Sensor Display Config", decoder: None },
    RecordType { code: REC_VEHICLE_INFO, name: "Vehicle Info", decoder: Some(RecordDecoder::VehicleInfo) },
    RecordType { code: REC_HOUSING_TEMP, name: "Housing Temperature", decoder: None },
    RecordType { code: REC_BATTERY_STATUS, name: "Battery Status", decoder: Some(RecordDecoder::BatteryStatus) },
    RecordType { code: REC_BATTERY_CELLS, name: "Battery Cell Data", decoder: None },
    RecordType { code: REC_COMPASS_CAL, name: "Compass Calibration", decoder: None },
    RecordType { code: REC_MANUFACTURER, name: "Manufacturer Info", decoder: Some(RecordDecoder::Manufacturer) },
    RecordType { code: REC_NAV_ACOUSTIC, name: "Nav/Acoustic", decoder: None },
    RecordType { code: REC_DATA_CHANNELS, name: "Data Channels", decoder: None },
    RecordType { code: REC_CTD_YSI, name: "YSI CTD", decoder: Some(RecordDecoder::YsiCtd) },
    RecordType { code: REC_ACOUSTIC_FIX, name: "Acoustic Nav Fix", decoder: None },
    RecordType { code: REC_MODEM_LOG, name: "Acoustic Modem Log", decoder: Some(RecordDecoder::ModemLog) },
    RecordType { code: REC_WAYPOINTS, name: "Waypoints", decoder: Some(RecordDecoder::Waypoints) },
    RecordType { code: REC_ECO_CAL, name: "ECO Calibration", decoder: None },
    RecordType { code: REC_ECO, name: "Wetlabs ECO BB2F", decoder: Some(RecordDecoder::EcoBb2f) },
    RecordType { code: REC_NAV, name: "Navigation", decoder: Some(RecordDecoder::Navigation) },
    RecordType { code: REC_STARTUP_FLAG, name: "Startup Flag", decoder: None },
];

fn table() -> &'static HashMap<u16, &'static RecordType> {
    static TABLE: OnceLock<HashMap<u16, &'static RecordType>> = OnceLock::new();
    TABLE.get_or_init(|| RECORD_TYPES.iter().map(|r| (r.code, r)).collect())
}

/// Look up a record type by code
pub fn lookup(code: u16) -> Option<&'static RecordType> {
    table().get(&code).copied()
}

/// Display name for a code, synthesized for codes not in the registry
pub fn display_name(code: u16) -> String {
    match lookup(code) {
        Some(rec) => rec.name.to_string(),
        None => format!("Unknown_0x{:04x}", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_known_code() {
        let nav = lookup(REC_NAV).unwrap();
        assert_eq!(nav.name, "Navigation");
        assert_eq!(nav.decoder, Some(RecordDecoder::Navigation));
    }

    #[test]
    fn test_named_but_undecoded_code() {
        let dvl = lookup(REC_DVL_STATUS).unwrap();
        assert_eq!(dvl.name, "DVL Status");
        assert!(dvl.decoder.is_none());
    }

    #[test]
    fn test_unknown_code_synthesized_name() {
        assert!(lookup(0x0BEE).is_none());
        assert_eq!(display_name(0x0BEE), "Unknown_0x0bee");
    }

    #[test]
    fn test_no_duplicate_codes_or_names() {
        let codes: HashSet<u16> = RECORD_TYPES.iter().map(|r| r.code).collect();
        assert_eq!(codes.len(), RECORD_TYPES.len());
        let names: HashSet<&str> = RECORD_TYPES.iter().map(|r| r.name).collect();
        assert_eq!(names.len(), RECORD_TYPES.len());
    }

    #[test]
    fn test_display_names_never_look_like_diagnostics() {
        // The dataset keeps diagnostics in dedicated fields; display names
        // still must not imitate synthesized unknown-code names.
        for rec in RECORD_TYPES {
            assert!(!rec.name.starts_with("Unknown_0x"));
        }
    }
}
