//! Human readable sizes and dates.

use chrono::{DateTime, NaiveDateTime};

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// `1536` -> `1.5 KB`. Binary (1024) steps, at most two decimals.
pub fn format_size(bytes: Option<i64>) -> String {
    let Some(bytes) = bytes.filter(|b| *b >= 0) else {
        return "Unknown size".to_string();
    };
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// `2025-12-24T10:30:00Z` -> `Dec 24, 2025`. Unparseable input is returned as is.
pub fn format_date(value: &str) -> String {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return parsed.format("%b %-d, %Y").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%b %-d, %Y").to_string();
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_size(None), "Unknown size");
        assert_eq!(format_size(Some(0)), "0 B");
        assert_eq!(format_size(Some(512)), "512 B");
        assert_eq!(format_size(Some(1024)), "1 KB");
        assert_eq!(format_size(Some(1536)), "1.5 KB");
        assert_eq!(format_size(Some(5 * 1024 * 1024)), "5 MB");
        assert_eq!(format_size(Some(3 * 1024_i64.pow(4))), "3 TB");
    }

    #[test]
    fn dates() {
        assert_eq!(format_date("2025-12-24T10:30:00+00:00"), "Dec 24, 2025");
        assert_eq!(format_date("2025-01-05T08:00:00.123456"), "Jan 5, 2025");
        assert_eq!(format_date("yesterday"), "yesterday");
    }
}
