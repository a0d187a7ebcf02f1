//! Timestamp reconstruction
//!
//! Most record types embed a u32 clock: milliseconds since local midnight
//! UTC, little-endian, with bit 31 reserved as a flag. The raw value resets
//! near zero whenever the mission crosses a UTC midnight boundary, so a
//! monotonic elapsed-time axis has to be unwrapped from it.
//!
//! One record type carries no clock at all. For it, time is reconstructed
//! positionally: the file is append-only from a single writer, so a frame's
//! byte offset is a monotonic proxy for its write time, and reference
//! timestamps can be interpolated onto it.

use chrono::NaiveTime;

/// Bit 31 of the raw clock is a flag, not part of the time value
pub const CLOCK_MASK: u32 = 0x7FFF_FFFF;

/// Milliseconds added per midnight rollover
pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Divisor from absolute milliseconds to hours
pub const MS_PER_HOUR: f64 = 3_600_000.0;

/// A backward step larger than this is a midnight rollover, not
/// measurement noise
pub const ROLLOVER_TOLERANCE_MS: f64 = 1_000_000.0;

/// Strip the reserved flag bit from a raw clock value
pub fn mask_clock(raw: u32) -> u32 {
    raw & CLOCK_MASK
}

/// Unwrap raw clock values into absolute milliseconds
///
/// Walks the sequence in file order with a running day-offset accumulator:
/// whenever the current value falls below the previous unwrapped value by
/// more than [`ROLLOVER_TOLERANCE_MS`], one day is added to the accumulator
/// before combining. The result is monotonic across any number of midnight
/// boundaries.
pub fn unwrap_ms(raw: &[u32]) -> Vec<f64> {
    let mut out = Vec::with_capacity(raw.len());
    let mut day_offset = 0.0;
    let mut prev = f64::NEG_INFINITY;

    for &r in raw {
        let masked = mask_clock(r) as f64;
        let mut abs_ms = day_offset + masked;
        if abs_ms < prev - ROLLOVER_TOLERANCE_MS {
            day_offset += MS_PER_DAY;
            abs_ms += MS_PER_DAY;
            log::debug!("clock rollover: day offset now {} ms", day_offset);
        }
        prev = abs_ms;
        out.push(abs_ms);
    }
    out
}

/// Unwrap raw clock values into hours elapsed from the first sample
///
/// Each series uses its own first sample as its local zero; series are not
/// auto-aligned to a shared zero.
pub fn elapsed_hours(raw: &[u32]) -> Vec<f64> {
    let abs_ms = unwrap_ms(raw);
    let Some(&start) = abs_ms.first() else {
        return Vec::new();
    };
    abs_ms.iter().map(|&ms| (ms - start) / MS_PER_HOUR).collect()
}

/// UTC time of day encoded by a raw clock value
///
/// Returns None for a value past 24h, which no real clock sample carries.
pub fn time_of_day(raw: u32) -> Option<NaiveTime> {
    let ms = mask_clock(raw);
    NaiveTime::from_num_seconds_from_midnight_opt(ms / 1000, (ms % 1000) * 1_000_000)
}

/// Interpolate reference timestamps onto clockless frames by byte offset
///
/// `ref_offsets` must be strictly increasing (file order guarantees it) and
/// aligned with `ref_t_hrs`. For each target offset, the bracketing pair of
/// reference offsets is found by binary search and its `t_hrs` values are
/// interpolated linearly by the target's fractional position. Targets
/// before the first or after the last reference offset are clamped to the
/// boundary value - extrapolation is never performed.
///
/// This relies on both record types being appended in true write-time
/// order. Out-of-order buffering by the recording device has not been
/// observed, but it is not provably excluded; treat the result as an
/// accepted approximation rather than a guarantee.
pub fn interp_by_offset(targets: &[usize], ref_offsets: &[usize], ref_t_hrs: &[f64]) -> Vec<f64> {
    debug_assert_eq!(ref_offsets.len(), ref_t_hrs.len());
    if ref_offsets.is_empty() {
        return Vec::new();
    }
    let last = ref_offsets.len() - 1;

    targets
        .iter()
        .map(|&x| {
            let i = ref_offsets.partition_point(|&r| r <= x);
            if i == 0 {
                ref_t_hrs[0]
            } else if i > last {
                ref_t_hrs[last]
            } else {
                let (lo, hi) = (i - 1, i);
                let span = (ref_offsets[hi] - ref_offsets[lo]) as f64;
                if span == 0.0 {
                    ref_t_hrs[lo]
                } else {
                    let frac = (x - ref_offsets[lo]) as f64 / span;
                    ref_t_hrs[lo] + frac * (ref_t_hrs[hi] - ref_t_hrs[lo])
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_monotonic_across_midnight() {
        // 100 ms before midnight, then 50 ms after
        let t = elapsed_hours(&[86_399_900, 50]);
        assert_eq!(t[0], 0.0);
        assert!(t[1] > t[0], "rollover must not produce a backward jump");
        // 150 ms elapsed, not -24 h
        assert!((t[1] - 150.0 / MS_PER_HOUR).abs() < 1e-12);
    }

    #[test]
    fn test_unwrap_two_rollovers() {
        let t = elapsed_hours(&[86_000_000, 10_000, 86_000_000, 10_000]);
        for pair in t.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        // two full days minus the in-day distances
        assert!(t[3] > 48.0 - 24.0);
    }

    #[test]
    fn test_flag_bit_masked() {
        let with_flag = elapsed_hours(&[0x8000_0000 | 1000, 0x8000_0000 | 2000]);
        let without = elapsed_hours(&[1000, 2000]);
        assert_eq!(with_flag, without);
    }

    #[test]
    fn test_small_backward_noise_is_not_rollover() {
        // 500 ms backwards is under the tolerance: no day added
        let ms = unwrap_ms(&[10_000, 9_500]);
        assert_eq!(ms[1], 9_500.0);
    }

    #[test]
    fn test_time_of_day() {
        let t = time_of_day(0x8000_0000 | 3_600_000).unwrap();
        assert_eq!(t, NaiveTime::from_hms_opt(1, 0, 0).unwrap());
        assert!(time_of_day(86_400_001).is_none());
    }

    #[test]
    fn test_interp_midpoint() {
        let t = interp_by_offset(&[150], &[100, 200], &[1.0, 3.0]);
        assert_eq!(t, vec![2.0]);
    }

    #[test]
    fn test_interp_exact_hit() {
        let t = interp_by_offset(&[100, 200], &[100, 200], &[1.0, 3.0]);
        assert_eq!(t, vec![1.0, 3.0]);
    }

    #[test]
    fn test_interp_clamps_both_ends() {
        let t = interp_by_offset(&[10, 900], &[100, 200, 300], &[1.0, 2.0, 5.0]);
        assert_eq!(t, vec![1.0, 5.0]);
        for v in &t {
            assert!((1.0..=5.0).contains(v));
        }
    }

    #[test]
    fn test_interp_single_reference() {
        let t = interp_by_offset(&[5, 500], &[100], &[2.5]);
        assert_eq!(t, vec![2.5, 2.5]);
    }

    #[test]
    fn test_interp_empty_reference() {
        assert!(interp_by_offset(&[5], &[], &[]).is_empty());
    }
}
