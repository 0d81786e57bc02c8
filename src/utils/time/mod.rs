// Minute-of-day helpers
// All slot math runs on integer minutes since midnight; times are converted
// at the edges only.

use chrono::{NaiveTime, Timelike};

pub const MINUTES_PER_DAY: i32 = 24 * 60;

pub fn minutes_from_midnight(time: NaiveTime) -> i32 {
    (time.hour() * 60 + time.minute()) as i32
}

/// Convert minutes since midnight back into a wall-clock time.
/// Values outside `[0, 1440)` are clamped to the day's bounds.
pub fn time_from_minutes(minutes: i32) -> NaiveTime {
    let clamped = minutes.clamp(0, MINUTES_PER_DAY - 1);
    NaiveTime::from_hms_opt((clamped / 60) as u32, (clamped % 60) as u32, 0)
        .expect("minutes clamped to a valid time of day")
}

/// Integer division rounding half away from zero. `divisor` must be positive.
fn div_round_half_away(n: i32, divisor: i32) -> i32 {
    if n >= 0 {
        (n + divisor / 2) / divisor
    } else {
        -((-n + divisor / 2) / divisor)
    }
}

/// Snap a minute value to the nearest multiple of `granularity`.
/// Round-half-away-from-zero; granularities below 2 pass the value through.
pub fn snap_to_granularity(minutes: i32, granularity: i32) -> i32 {
    if granularity <= 1 {
        return minutes;
    }
    div_round_half_away(minutes, granularity) * granularity
}

/// First granularity-aligned minute at or after `minutes`.
pub fn align_up_to_granularity(minutes: i32, granularity: i32) -> i32 {
    if granularity <= 1 {
        return minutes;
    }
    minutes.div_euclid(granularity) * granularity
        + if minutes.rem_euclid(granularity) == 0 {
            0
        } else {
            granularity
        }
}

pub fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_round_trip() {
        let t = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
        assert_eq!(minutes_from_midnight(t), 555);
        assert_eq!(time_from_minutes(555), t);
    }

    #[test]
    fn test_time_from_minutes_clamps_out_of_range() {
        assert_eq!(
            time_from_minutes(-30),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            time_from_minutes(MINUTES_PER_DAY + 5),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }

    #[test]
    fn test_snap_rounds_half_away_from_zero() {
        assert_eq!(snap_to_granularity(7, 5), 5);
        assert_eq!(snap_to_granularity(8, 5), 10);
        assert_eq!(snap_to_granularity(23, 15), 30);
        assert_eq!(snap_to_granularity(22, 15), 15);
        // Tie: 7.5 slots of 15 -> away from zero
        assert_eq!(snap_to_granularity(-8, 15), -15);
        assert_eq!(snap_to_granularity(-7, 15), 0);
    }

    #[test]
    fn test_snap_granularity_one_is_identity() {
        for m in [-30, 0, 1, 59, 1439] {
            assert_eq!(snap_to_granularity(m, 1), m);
        }
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up_to_granularity(570, 15), 570); // 09:30 already aligned
        assert_eq!(align_up_to_granularity(571, 15), 585);
        assert_eq!(align_up_to_granularity(0, 5), 0);
    }

    #[test]
    fn test_format_hhmm() {
        assert_eq!(format_hhmm(NaiveTime::from_hms_opt(8, 5, 0).unwrap()), "08:05");
    }
}
