use chrono::{DateTime, Utc};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Shorten `s` to at most `max_len` characters, marking the cut with "..."
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

pub fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render an optional TTL in milliseconds for table output
pub fn format_ttl(ttl_ms: Option<u64>) -> String {
    match ttl_ms {
        None => "-".to_string(),
        Some(ms) if ms % 1_000 == 0 => format!("{}s", ms / 1_000),
        Some(ms) => format!("{ms}ms"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_short_string_untouched() {
        assert_eq!(truncate_string("tea", 10), "tea");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate_string("likes green tea", 8), "likes...");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_string("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_format_timestamp() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 5).unwrap();
        assert_eq!(format_timestamp(&dt), "2024-03-01 09:30:05");
    }

    #[test]
    fn test_format_ttl() {
        assert_eq!(format_ttl(None), "-");
        assert_eq!(format_ttl(Some(60_000)), "60s");
        assert_eq!(format_ttl(Some(1_500)), "1500ms");
    }
}
