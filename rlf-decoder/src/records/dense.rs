//! Fixed layouts for the dense record types
//!
//! Offsets, widths, and units are reverse-engineered from recorded
//! missions; several fields remain only partially understood and keep
//! their `undecoded_*` working names until someone pins them down.
//!
//! Geographic coordinates are f64 in the high-rate types (Navigation,
//! YSI CTD, ECO) but f32 in the low-rate ones (Seabird CTD, Sidescan);
//! each layout declares its own width rather than assuming a global one.

use super::layout::{field, scaled, sentinel, FieldKind, SeriesLayout};

/// Navigation (0x044E, 46 bytes, ~18 Hz)
///
/// The vehicle's primary navigation stream and the default reference for
/// positional interpolation.
pub const NAVIGATION: SeriesLayout = SeriesLayout {
    min_len: 46,
    clock_offset: Some(16),
    discriminator: None,
    fields: &[
        field("lat", 0, FieldKind::F64),
        field("lon", 8, FieldKind::F64),
        field("speed", 20, FieldKind::F32),
        field("alt_max_range", 24, FieldKind::U16),
        field("pitch", 26, FieldKind::F32),
        field("depth", 34, FieldKind::F32),
        field("undecoded_f42", 42, FieldKind::F32),
    ],
};

/// YSI CTD (0x041D, 40 bytes, ~18 Hz)
pub const YSI_CTD: SeriesLayout = SeriesLayout {
    min_len: 40,
    clock_offset: Some(16),
    discriminator: None,
    fields: &[
        field("lat", 0, FieldKind::F64),
        field("lon", 8, FieldKind::F64),
        field("undecoded_f20", 20, FieldKind::F32),
        field("conductivity", 24, FieldKind::F32),
        field("temperature", 28, FieldKind::F32),
        field("salinity", 32, FieldKind::F32),
        field("sound_speed", 36, FieldKind::F32),
    ],
};

/// Seabird CTD / SBE49 (0x040A, 32 bytes, ~0.3 Hz)
///
/// Low-rate type: f32 coordinates, and the altitude field carries the
/// "no valid reading" sentinel.
pub const SEABIRD_CTD: SeriesLayout = SeriesLayout {
    min_len: 32,
    clock_offset: Some(8),
    discriminator: None,
    fields: &[
        field("lat", 0, FieldKind::F32),
        field("lon", 4, FieldKind::F32),
        sentinel("altitude", 12, FieldKind::F32),
        field("conductivity", 16, FieldKind::F32),
        field("temperature", 20, FieldKind::F32),
        field("salinity", 24, FieldKind::F32),
        field("sound_speed", 28, FieldKind::F32),
    ],
};

/// ADCP / DVL, 1200 kHz (0x03E8, 155 bytes, ~0.67 Hz)
///
/// Leads with a constant 0x15 sub-type byte; payloads without it are
/// malformed. Carries no embedded clock. The tail past offset 115 is
/// status data that has not been decoded.
pub const ADCP_DVL: SeriesLayout = SeriesLayout {
    min_len: 115,
    clock_offset: None,
    discriminator: Some((0, 0x15)),
    fields: &[
        field("adcp_param1", 1, FieldKind::F32),
        field("attitude1", 5, FieldKind::F32),
        field("adcp_param2", 9, FieldKind::F32),
        field("depth1", 13, FieldKind::F32),
        field("depth2", 17, FieldKind::F32),
        field("config_val", 21, FieldKind::F32),
        field("water_temp", 25, FieldKind::F32),
        field("altitude", 29, FieldKind::F32),
        field("depth", 33, FieldKind::F32),
        field("pitch", 37, FieldKind::F32),
        field("roll", 41, FieldKind::F32),
        field("attitude2", 45, FieldKind::F32),
        field("heading", 53, FieldKind::F32),
        field("bearing", 57, FieldKind::F32),
        field("lat1", 67, FieldKind::F64),
        field("lon1", 75, FieldKind::F64),
        field("lat2", 83, FieldKind::F64),
        field("lon2", 91, FieldKind::F64),
        field("lat3", 99, FieldKind::F64),
        field("lon3", 107, FieldKind::F64),
    ],
};

/// MSTL Sidescan, 900 kHz (0x03F7, 55 bytes, ~1.3 Hz)
///
/// Altitude, depth, and temperature use the sentinel for invalid pings.
pub const SIDESCAN: SeriesLayout = SeriesLayout {
    min_len: 42,
    clock_offset: None,
    discriminator: None,
    fields: &[
        field("lat", 0, FieldKind::F32),
        field("lon", 4, FieldKind::F32),
        sentinel("altitude", 8, FieldKind::F32),
        sentinel("depth", 12, FieldKind::F32),
        sentinel("temperature", 32, FieldKind::F32),
        field("heading", 38, FieldKind::F32),
    ],
};

/// Wetlabs ECO BB2F (0x043E, 57 bytes, ~1 Hz)
///
/// Optical backscatter at 470/650 nm plus chlorophyll-a fluorescence.
/// The optical block starts at byte 25, not 24 - one padding/flag byte
/// sits at offset 24.
pub const ECO_BB2F: SeriesLayout = SeriesLayout {
    min_len: 57,
    clock_offset: Some(16),
    discriminator: None,
    fields: &[
        field("lat", 0, FieldKind::F64),
        field("lon", 8, FieldKind::F64),
        field("depth", 20, FieldKind::F32),
        field("ref470", 25, FieldKind::F32),
        field("lambda470", 29, FieldKind::F32),
        field("beta470", 33, FieldKind::F32),
        field("ref650", 37, FieldKind::F32),
        field("lambda650", 41, FieldKind::F32),
        field("beta650", 45, FieldKind::F32),
        field("chlorophyll", 49, FieldKind::F32),
        field("thermistor", 53, FieldKind::F32),
    ],
};

/// Energy Monitor (0x0402, 13 bytes, ~0.06 Hz)
pub const ENERGY_MONITOR: SeriesLayout = SeriesLayout {
    min_len: 13,
    clock_offset: None,
    discriminator: None,
    fields: &[
        field("cell_count", 0, FieldKind::U8),
        field("capacity_wh", 1, FieldKind::F32),
        field("energy_wh", 5, FieldKind::F32),
        field("status_metric", 9, FieldKind::F32),
    ],
};

/// Objective Navigation (0x03F1, 53 bytes, ~0.03 Hz)
///
/// Mission leg progress: FROM/TO waypoints, commanded RPM and speed,
/// mode index. The depth setpoint is logged in decimeters and scaled to
/// meters here.
pub const OBJECTIVE_NAV: SeriesLayout = SeriesLayout {
    min_len: 53,
    clock_offset: None,
    discriminator: None,
    fields: &[
        field("leg_index", 0, FieldKind::U8),
        field("transit_time_s", 2, FieldKind::U16),
        field("leg_dist_m", 4, FieldKind::U16),
        field("from_lat", 6, FieldKind::F64),
        field("from_lon", 14, FieldKind::F64),
        field("to_lat", 22, FieldKind::F64),
        field("to_lon", 30, FieldKind::F64),
        field("cmd_rpm", 38, FieldKind::F32),
        field("cmd_speed", 42, FieldKind::F32),
        field("mode_index", 46, FieldKind::U8),
        field("obj_subtype", 48, FieldKind::U8),
        scaled("depth_setpoint_m", 50, FieldKind::U16, 0.1, 0.0),
        field("active", 52, FieldKind::U8),
    ],
};
