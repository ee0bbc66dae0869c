//! Duration arithmetic for the dial.
//!
//! All functions here are pure and total. Durations are integer milliseconds
//! that wrap around the dial span; a remainder of zero maps to the full span so
//! that "sixty minutes" stays a full dial instead of collapsing to empty.
//!
//! ```rust
//! use carousel_timer::duration::{fling_target, nearest_minute, normalize};
//!
//! assert_eq!(normalize(0, 3_600_000), 3_600_000);
//! assert_eq!(nearest_minute(920), 900);
//! assert_eq!(fling_target(920, 150.0), 660);
//! ```

/// Wraps `ms` into `(0, max_ms]`.
///
/// `max_ms` must be non-zero; [`Config::validate`](crate::config::Config::validate)
/// guarantees this for every dial. A zero span yields zero rather than panicking.
pub fn normalize(ms: i64, max_ms: u64) -> u64 {
    if max_ms == 0 {
        return 0;
    }
    let max = max_ms as i64;
    let rem = ms.rem_euclid(max);
    if rem == 0 {
        max_ms
    } else {
        rem as u64
    }
}

/// Projects where a flung dial lands, in seconds, quantized to a minute.
///
/// The release velocity (px/s) biases the position before it is floored to a
/// minute boundary, so a rightward fling settles on an earlier minute and a
/// leftward fling on a later one.
pub fn fling_target(current_seconds: i64, velocity: f64) -> i64 {
    let biased = current_seconds as f64 - (velocity + 59.0);
    minutes_to_seconds((biased / 60.0).floor() as i64)
}

/// Quantizes `seconds` to a minute boundary.
///
/// Non-negative input floors to the minute at or below it. Negative input is
/// shifted by 59 seconds before flooring.
pub fn nearest_minute(seconds: i64) -> i64 {
    let sign = if seconds < 0 { -1 } else { 0 };
    minutes_to_seconds(seconds.saturating_add(59 * sign).div_euclid(60))
}

/// Whole minutes to seconds, clamped so the product stays minute-aligned.
fn minutes_to_seconds(minutes: i64) -> i64 {
    minutes.clamp(i64::MIN / 60, i64::MAX / 60) * 60
}

/// Scales the snap animation with fling speed.
///
/// The result is `|velocity|` rounded up to a multiple of `base_ms`, so faster
/// flings get a longer, more visible settle. A zero base yields zero.
pub fn transition_duration(base_ms: u64, velocity: f64) -> u64 {
    if base_ms == 0 {
        return 0;
    }
    let base = base_ms as f64;
    let steps = (velocity.abs() / base).ceil();
    (steps * base) as u64
}

/// Formats a duration as `MM:SS.mmm`.
///
/// Minutes are not wrapped into hours, so a full sixty-minute dial reads
/// `60:00.000`.
pub fn format_clock(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}.{:03}", minutes, seconds, millis)
}

/// Whole seconds in `ms`, truncating the sub-second part.
pub fn to_seconds(ms: u64) -> i64 {
    (ms / 1_000) as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: u64 = 3_600_000;

    #[test]
    fn test_normalize_wraps_into_span() {
        assert_eq!(normalize(900_000, MAX), 900_000);
        assert_eq!(normalize(3_600_000, MAX), 3_600_000);
        assert_eq!(normalize(3_620_000, MAX), 20_000);
        assert_eq!(normalize(-20_000, MAX), 3_580_000);
    }

    #[test]
    fn test_normalize_zero_is_full_dial() {
        assert_eq!(normalize(0, MAX), MAX);
        assert_eq!(normalize(-(MAX as i64), MAX), MAX);
        assert_eq!(normalize(2 * MAX as i64, MAX), MAX);
    }

    #[test]
    fn test_normalize_zero_span() {
        assert_eq!(normalize(12_345, 0), 0);
    }

    #[test]
    fn test_normalize_stays_in_range() {
        for ms in (-8_000_000i64..8_000_000).step_by(77_777) {
            let n = normalize(ms, MAX);
            assert!(n > 0 && n <= MAX, "normalize({}) = {}", ms, n);
        }
    }

    #[test]
    fn test_fling_target_scenario() {
        // 920s flung right at 150 px/s lands on 11:00.
        assert_eq!(fling_target(920, 150.0), 660);
    }

    #[test]
    fn test_fling_target_direction() {
        let right = fling_target(920, 400.0);
        let left = fling_target(920, -400.0);
        assert!(right < 920);
        assert!(left > 920);
        assert_eq!(right % 60, 0);
        assert_eq!(left % 60, 0);
    }

    #[test]
    fn test_nearest_minute_positive() {
        assert_eq!(nearest_minute(920), 900);
        assert_eq!(nearest_minute(900), 900);
        assert_eq!(nearest_minute(959), 900);
        assert_eq!(nearest_minute(0), 0);
    }

    #[test]
    fn test_nearest_minute_negative() {
        assert_eq!(nearest_minute(-1), -60);
        assert_eq!(nearest_minute(-60), -120);
        assert_eq!(nearest_minute(-30), -120);
    }

    #[test]
    fn test_nearest_minute_is_minute_aligned() {
        for seconds in -5_000..5_000 {
            assert_eq!(nearest_minute(seconds) % 60, 0, "seconds = {}", seconds);
        }
    }

    #[test]
    fn test_extreme_inputs_stay_aligned() {
        for seconds in [i64::MIN, i64::MIN + 1, i64::MAX] {
            assert_eq!(nearest_minute(seconds) % 60, 0, "seconds = {}", seconds);
        }
        for velocity in [1e18, -1e18, 1e300, -1e300, f64::MAX] {
            let target = fling_target(920, velocity);
            assert_eq!(target % 60, 0, "velocity = {}", velocity);
        }
        assert!(fling_target(920, 1e300) < 0);
        assert!(fling_target(920, -1e300) > 0);
    }

    #[test]
    fn test_transition_duration() {
        assert_eq!(transition_duration(250, 150.0), 250);
        assert_eq!(transition_duration(250, -150.0), 250);
        assert_eq!(transition_duration(250, 251.0), 500);
        assert_eq!(transition_duration(250, 1_000.0), 1_000);
        assert_eq!(transition_duration(250, 0.0), 0);
        assert_eq!(transition_duration(0, 500.0), 0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(900_000), "15:00.000");
        assert_eq!(format_clock(61_234), "01:01.234");
        assert_eq!(format_clock(0), "00:00.000");
        assert_eq!(format_clock(3_600_000), "60:00.000");
    }

    #[test]
    fn test_to_seconds_truncates() {
        assert_eq!(to_seconds(920_999), 920);
        assert_eq!(to_seconds(999), 0);
    }
}
