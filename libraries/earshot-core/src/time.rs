//! Time formatting and clamping helpers

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour up
///
/// Negative and non-finite values render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Clamp a playback position to `[0, duration]`
///
/// With an unknown duration only the lower bound applies. Non-finite
/// positions collapse to zero.
pub fn clamp_position(position: f64, duration: Option<f64>) -> f64 {
    if !position.is_finite() {
        return 0.0;
    }

    let position = position.max(0.0);
    match duration {
        Some(d) if d.is_finite() && d >= 0.0 => position.min(d),
        _ => position,
    }
}

/// Clamp a value to `[0, 1]`, mapping NaN to zero
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(5.9), "0:05");
        assert_eq!(format_time(75.0), "1:15");
        assert_eq!(format_time(599.0), "9:59");
    }

    #[test]
    fn formats_hours() {
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(3723.0), "1:02:03");
    }

    #[test]
    fn invalid_time_renders_zero() {
        assert_eq!(format_time(-3.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
        assert_eq!(format_time(f64::INFINITY), "0:00");
    }

    #[test]
    fn clamps_position() {
        assert_eq!(clamp_position(-10.0, Some(120.0)), 0.0);
        assert_eq!(clamp_position(220.0, Some(120.0)), 120.0);
        assert_eq!(clamp_position(42.0, Some(120.0)), 42.0);
        assert_eq!(clamp_position(500.0, None), 500.0);
        assert_eq!(clamp_position(f64::NAN, Some(120.0)), 0.0);
    }

    #[test]
    fn clamps_unit() {
        assert_eq!(clamp_unit(-0.5), 0.0);
        assert_eq!(clamp_unit(1.5), 1.0);
        assert_eq!(clamp_unit(0.3), 0.3);
        assert_eq!(clamp_unit(f64::NAN), 0.0);
    }

    proptest! {
        #[test]
        fn clamped_position_stays_in_range(position in -1e6f64..1e6, duration in 0.0f64..1e5) {
            let clamped = clamp_position(position, Some(duration));
            prop_assert!(clamped >= 0.0);
            prop_assert!(clamped <= duration);
        }
    }
}
