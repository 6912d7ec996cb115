use anyhow::Result;

/// Converts a GTFS "HH:MM:SS" time into minutes since midnight of the service day. Hours past 23
/// describe service after midnight and are kept as-is, so "25:30:00" is 1530 minutes, not 90.
pub fn time_string_to_minutes(time: &str) -> Result<f64> {
    let parts: Vec<&str> = time.trim().split(':').collect();
    if parts.len() != 3 {
        bail!("Time {:?} isn't in HH:MM:SS format", time);
    }
    let mut values = [0_u32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|err| anyhow!("Time {:?} has a bad component {:?}: {}", time, part, err))?;
    }
    let [hours, minutes, seconds] = values;
    if minutes >= 60 || seconds >= 60 {
        bail!("Time {:?} has minutes or seconds out of range", time);
    }
    Ok(hours as f64 * 60.0 + minutes as f64 + seconds as f64 / 60.0)
}

/// The inverse of `time_string_to_minutes`, rounding to the nearest second.
pub fn minutes_to_time_string(minutes: f64) -> String {
    let total_seconds = (minutes.max(0.0) * 60.0).round() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total_seconds / 3600,
        (total_seconds / 60) % 60,
        total_seconds % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_string_to_minutes() {
        assert_eq!(time_string_to_minutes("00:00:00").unwrap(), 0.0);
        assert_eq!(time_string_to_minutes("08:00:00").unwrap(), 480.0);
        assert_eq!(time_string_to_minutes("08:20:30").unwrap(), 500.5);
        // Service past midnight isn't wrapped around
        assert_eq!(time_string_to_minutes("25:30:00").unwrap(), 1530.0);
        assert_eq!(time_string_to_minutes(" 7:05:00").unwrap(), 425.0);
    }

    #[test]
    fn test_malformed_times() {
        assert!(time_string_to_minutes("").is_err());
        assert!(time_string_to_minutes("08:00").is_err());
        assert!(time_string_to_minutes("08:00:00:00").is_err());
        assert!(time_string_to_minutes("ab:00:00").is_err());
        assert!(time_string_to_minutes("08:75:00").is_err());
    }

    #[test]
    fn test_minutes_to_time_string() {
        assert_eq!(minutes_to_time_string(1530.0), "25:30:00");
        assert_eq!(minutes_to_time_string(500.5), "08:20:30");
        assert_eq!(minutes_to_time_string(-3.0), "00:00:00");
    }
}
