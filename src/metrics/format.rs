//! Human-readable formatting shared by every panel.

const BYTE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// `1500` becomes `1.5K`, `2_300_000` becomes `2.3M`; smaller values print as-is.
/// Halves round up, so `1250` is `1.3K`.
pub fn format_number(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", one_decimal(value / 1_000_000.0))
    } else if value >= 1_000.0 {
        format!("{:.1}K", one_decimal(value / 1_000.0))
    } else {
        value.to_string()
    }
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn format_count(value: u64) -> String {
    format_number(value as f64)
}

pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut exponent = 0;
    while exponent < BYTE_UNITS.len() - 1 && bytes >= 1u64 << (10 * (exponent + 1)) {
        exponent += 1;
    }
    let scaled = bytes as f64 / (1u64 << (10 * exponent)) as f64;
    let rounded = (scaled * 100.0).round() / 100.0;
    format!("{} {}", rounded, BYTE_UNITS[exponent])
}

pub fn format_duration(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;

    if h > 0 {
        format!("{}h {}m", h, m)
    } else if m > 0 {
        format!("{}m {}s", m, s)
    } else {
        format!("{}s", s)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

pub fn format_millis(value: f64) -> String {
    format!("{}ms", format_number(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn test_format_number() {
        assert_snapshot!(format_number(1500.0), @"1.5K");
        assert_snapshot!(format_number(2_345_678.0), @"2.3M");
        assert_snapshot!(format_number(999.0), @"999");
        assert_snapshot!(format_number(12.5), @"12.5");
        assert_snapshot!(format_number(0.0), @"0");
        assert_snapshot!(format_count(1_000), @"1.0K");
        assert_snapshot!(format_number(1250.0), @"1.3K");
        assert_snapshot!(format_number(2250.0), @"2.3K");
        assert_snapshot!(format_number(2_250_000.0), @"2.3M");
    }

    #[test]
    fn test_format_bytes() {
        assert_snapshot!(format_bytes(0), @"0 B");
        assert_snapshot!(format_bytes(512), @"512 B");
        assert_snapshot!(format_bytes(1536), @"1.5 KB");
        assert_snapshot!(format_bytes(52_428_800), @"50 MB");
        assert_snapshot!(format_bytes(1_048_576), @"1 MB");
        assert_snapshot!(format_bytes(3 * 1024 * 1024 * 1024), @"3 GB");
    }

    #[test]
    fn test_format_duration() {
        assert_snapshot!(format_duration(42), @"42s");
        assert_snapshot!(format_duration(125), @"2m 5s");
        assert_snapshot!(format_duration(7_380), @"2h 3m");
    }

    #[test]
    fn test_suffixed_formats() {
        assert_snapshot!(format_percent(4.25), @"4.25%");
        assert_snapshot!(format_millis(2.5), @"2.5ms");
    }
}
