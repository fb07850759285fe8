use std::time::Duration;

/// Human-readable elapsed time: `1h 2m 3s`, `2m 3s`, `3.042s` or `42ms`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = elapsed.subsec_millis();

    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else if seconds > 0 {
        format!("{seconds}.{millis:03}s")
    } else {
        format!("{millis}ms")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_second() {
        assert_eq!(format_elapsed(Duration::from_millis(42)), "42ms");
        assert_eq!(format_elapsed(Duration::ZERO), "0ms");
    }

    #[test]
    fn test_seconds_keep_millis() {
        assert_eq!(format_elapsed(Duration::from_millis(3042)), "3.042s");
        assert_eq!(format_elapsed(Duration::from_millis(59_999)), "59.999s");
    }

    #[test]
    fn test_minutes_drop_millis() {
        assert_eq!(format_elapsed(Duration::from_millis(123_456)), "2m 3s");
    }

    #[test]
    fn test_hours() {
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "1h 2m 3s");
        assert_eq!(format_elapsed(Duration::from_secs(7200)), "2h 0m 0s");
    }
}
