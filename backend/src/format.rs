//! Human-readable formatting for log lines and result summaries.

/// "450m" below a kilometer, "1.2km" above.
pub fn format_distance(meters: f64) -> String {
    if meters.abs() < 1_000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.1}km", meters / 1_000.0)
    }
}

/// "45s", "2m 5s", "1h 1m". Seconds are omitted once hours appear.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.abs().round() as i64;
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if mins > 0 {
        parts.push(format!("{mins}m"));
    }
    if secs > 0 && hours == 0 {
        parts.push(format!("{secs}s"));
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Detour delta with explicit sign, e.g. "+450m / +2m 5s".
pub fn format_detour(distance: f64, duration: f64) -> String {
    let sign = |v: f64| if v >= 0.0 { "+" } else { "-" };
    format!(
        "{}{} / {}{}",
        sign(distance),
        format_distance(distance.abs()),
        sign(duration),
        format_duration(duration.abs())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(450.0), "450m");
        assert_eq!(format_distance(1_234.0), "1.2km");
        assert_eq!(format_distance(12_345.0), "12.3km");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45.0), "45s");
        assert_eq!(format_duration(125.0), "2m 5s");
        assert_eq!(format_duration(3_600.0), "1h");
        assert_eq!(format_duration(3_665.0), "1h 1m");
        assert_eq!(format_duration(0.0), "0s");
    }

    #[test]
    fn test_format_detour() {
        assert_eq!(format_detour(450.0, 125.0), "+450m / +2m 5s");
        assert_eq!(format_detour(-120.0, -30.0), "-120m / -30s");
    }
}
