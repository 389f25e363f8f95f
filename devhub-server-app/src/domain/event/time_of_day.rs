use std::sync::LazyLock;

use regex::Regex;

use crate::domain::event::ValidationError;

pub const INVALID_TIME_FORMAT: &str = "Invalid time format. Use HH:MM or HH:MM AM/PM";
pub const INVALID_TIME_VALUES: &str = "Invalid time values";

static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([0-9]{1,2}):([0-9]{2})(?:\s*(AM|PM))?$").expect("time pattern compiles")
});

/// Normalizes `H:MM`, `HH:MM` or `H:MM AM/PM` to zero-padded 24-hour `HH:MM`.
pub fn normalize_time(input: &str) -> Result<String, ValidationError> {
    let invalid_format = || ValidationError::new("time", INVALID_TIME_FORMAT);

    let captures = TIME_PATTERN
        .captures(input.trim())
        .ok_or_else(invalid_format)?;
    let mut hours: u32 = captures[1].parse().map_err(|_| invalid_format())?;
    let minutes = &captures[2];
    let minute_value: u32 = minutes.parse().map_err(|_| invalid_format())?;

    if let Some(period) = captures.get(3) {
        let is_pm = period.as_str().eq_ignore_ascii_case("pm");
        if is_pm && hours != 12 {
            hours += 12;
        } else if !is_pm && hours == 12 {
            hours = 0;
        }
    }

    if hours > 23 || minute_value > 59 {
        return Err(ValidationError::new("time", INVALID_TIME_VALUES));
    }

    Ok(format!("{:02}:{}", hours, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_error() -> ValidationError {
        ValidationError::new("time", INVALID_TIME_VALUES)
    }

    #[test]
    fn test_twelve_hour_clock() {
        assert_eq!(normalize_time("2:30 PM").as_deref(), Ok("14:30"));
        assert_eq!(normalize_time("12:00 AM").as_deref(), Ok("00:00"));
        assert_eq!(normalize_time("12:15 pm").as_deref(), Ok("12:15"));
        assert_eq!(normalize_time("11:59PM").as_deref(), Ok("23:59"));
        assert_eq!(normalize_time("9:00 am").as_deref(), Ok("09:00"));
    }

    #[test]
    fn test_twenty_four_hour_clock() {
        assert_eq!(normalize_time("9:05").as_deref(), Ok("09:05"));
        assert_eq!(normalize_time(" 18:45 ").as_deref(), Ok("18:45"));
        assert_eq!(normalize_time("00:00").as_deref(), Ok("00:00"));
    }

    #[test]
    fn test_out_of_range_values() {
        assert_eq!(normalize_time("13:00 PM"), Err(values_error()));
        assert_eq!(normalize_time("25:00"), Err(values_error()));
        assert_eq!(normalize_time("10:60"), Err(values_error()));
    }

    #[test]
    fn test_malformed_input() {
        for input in ["", "noon", "9", "9:5", "123:00", "9:00 XM", "9:00:00", "٩:٣٠"] {
            assert_eq!(
                normalize_time(input),
                Err(ValidationError::new("time", INVALID_TIME_FORMAT)),
                "{:?}",
                input
            );
        }
    }

    #[test]
    fn test_normalized_times_are_fixed_points() {
        for input in ["2:30 PM", "12:00 AM", "7:15"] {
            let once = normalize_time(input).expect("valid time");
            assert_eq!(normalize_time(&once).as_deref(), Ok(once.as_str()));
        }
    }
}
