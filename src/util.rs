// Utility helpers for parsing cells and formatting counts.
//
// The loader and normalizer both lean on these so the "dirty" text handling
// lives in one place.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Date format used by the source table and by the `--date` flag.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters, so `NaN`, `inf` and
///   textual sentinels never become numbers.
/// - Strips thousands separators like `","` before parsing.
///
/// Exponent markers are the one letter allowed through (`1.5e3`).
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s
        .chars()
        .any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
    {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// `true` when a float carries no fractional part and fits an `i64`.
pub fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Counts in console messages (e.g. `1,204 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64_safe() {
        assert_eq!(parse_f64_safe(Some("42")), Some(42.0));
        assert_eq!(parse_f64_safe(Some("  0.42 ")), Some(0.42));
        assert_eq!(parse_f64_safe(Some("1,234,567")), Some(1234567.0));
        assert_eq!(parse_f64_safe(Some("1.5e3")), Some(1500.0));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn test_parse_f64_safe_rejects_text() {
        assert_eq!(parse_f64_safe(Some("Not available")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(Some("inf")), None);
        assert_eq!(parse_f64_safe(Some("e")), None);
    }

    #[test]
    fn test_parse_date_safe() {
        assert_eq!(
            parse_date_safe(Some("2021-06-16")),
            NaiveDate::from_ymd_opt(2021, 6, 16)
        );
        assert_eq!(parse_date_safe(Some("16/06/2021")), None);
        assert_eq!(parse_date_safe(Some("2021-02-30")), None);
        assert_eq!(parse_date_safe(Some(" ")), None);
    }

    #[test]
    fn test_is_integral() {
        assert!(is_integral(5_000_000.0));
        assert!(is_integral(-3.0));
        assert!(!is_integral(2.4));
        assert!(!is_integral(f64::NAN));
    }

    #[test]
    fn test_format_int() {
        assert_eq!(format_int(1204usize), "1,204");
        assert_eq!(format_int(7i64), "7");
    }
}
