//! Date normalization for remote records.
//!
//! Remote dates arrive as ISO dates, full timestamps, bare years or
//! placeholder values such as `0000-00-00`. Only the leading calendar part
//! is kept, at the precision the source provided.

use chrono::NaiveDate;

/// Normalize a raw date into `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
///
/// Returns `None` for sentinel years (`0000`, `9999`) and for anything that
/// is not a valid calendar date.
pub fn normalize(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.starts_with("0000") || raw.starts_with("9999") {
        return None;
    }

    let head = raw
        .split(|c: char| !(c.is_ascii_digit() || c == '-'))
        .next()
        .unwrap_or_default();
    let mut parts = head.split('-').filter(|p| !p.is_empty());

    let year_part = parts.next()?;
    if year_part.len() != 4 {
        return None;
    }
    let year: i32 = year_part.parse().ok()?;
    let month: Option<u32> = match parts.next() {
        Some(m) => Some(m.parse().ok()?),
        None => None,
    };
    let day: Option<u32> = match (month, parts.next()) {
        (Some(_), Some(d)) => Some(d.parse().ok()?),
        _ => None,
    };

    let date = NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1))?;
    Some(match (month, day) {
        (Some(_), Some(_)) => date.format("%Y-%m-%d").to_string(),
        (Some(_), None) => date.format("%Y-%m").to_string(),
        _ => date.format("%Y").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_date() {
        assert_eq!(normalize("1957-08-31"), Some("1957-08-31".to_string()));
        assert_eq!(normalize("1975-3-4"), Some("1975-03-04".to_string()));
    }

    #[test]
    fn test_timestamp_truncated() {
        assert_eq!(
            normalize("2020-06-07T13:04:38+00:00"),
            Some("2020-06-07".to_string())
        );
    }

    #[test]
    fn test_partial_dates() {
        assert_eq!(normalize("1980"), Some("1980".to_string()));
        assert_eq!(normalize("1980-05"), Some("1980-05".to_string()));
    }

    #[test]
    fn test_sentinels_dropped() {
        assert_eq!(normalize("0000-00-00"), None);
        assert_eq!(normalize("9999-12-31"), None);
    }

    #[test]
    fn test_invalid_dropped() {
        assert_eq!(normalize("2020-02-30"), None);
        assert_eq!(normalize("not a date"), None);
        assert_eq!(normalize("85-01-01"), None);
        assert_eq!(normalize(""), None);
    }
}
