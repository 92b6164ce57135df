//! Date normalization
//!
//! Converts the free-text dates on award pages ("March 2, 2025") into
//! `YYYY-MM-DD` so that lexicographic sort order equals chronological
//! order. Parsing failures are a typed, non-fatal result; the caller logs
//! and stores the record with a null ISO date.

use chrono::NaiveDate;
use thiserror::Error;

/// A date string that does not parse to a valid calendar date
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable date: {input:?}")]
pub struct DateParseError {
    pub input: String,
}

/// Formats observed across the harvested years, most common first
const DATE_FORMATS: &[&str] = &[
    "%B %d, %Y", // January 2, 2024
    "%b %d, %Y", // Jan 2, 2024
    "%B %d %Y",  // January 2 2024
    "%b %d %Y",  // Jan 2 2024
    "%Y-%m-%d",  // already ISO
    "%m/%d/%Y",  // 1/2/2024
];

/// Normalize a human date string to `YYYY-MM-DD`.
pub fn normalize_date(input: &str) -> Result<String, DateParseError> {
    let cleaned = collapse_whitespace(input);
    if cleaned.is_empty() {
        return Err(DateParseError {
            input: input.to_string(),
        });
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&cleaned, format) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }

    Err(DateParseError {
        input: input.to_string(),
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_month_name() {
        assert_eq!(normalize_date("March 2, 2025").unwrap(), "2025-03-02");
        assert_eq!(normalize_date("May 19, 2024").unwrap(), "2024-05-19");
        assert_eq!(normalize_date("December 20, 2025").unwrap(), "2025-12-20");
    }

    #[test]
    fn test_short_month_name() {
        assert_eq!(normalize_date("Jan 2, 2024").unwrap(), "2024-01-02");
    }

    #[test]
    fn test_missing_comma() {
        assert_eq!(normalize_date("January 2 2024").unwrap(), "2024-01-02");
    }

    #[test]
    fn test_already_iso() {
        assert_eq!(normalize_date("2024-05-19").unwrap(), "2024-05-19");
    }

    #[test]
    fn test_slash_format() {
        assert_eq!(normalize_date("5/19/2024").unwrap(), "2024-05-19");
    }

    #[test]
    fn test_extra_whitespace() {
        assert_eq!(normalize_date("  March  2,   2025 ").unwrap(), "2025-03-02");
    }

    #[test]
    fn test_output_is_zero_padded() {
        assert_eq!(normalize_date("July 4, 2019").unwrap(), "2019-07-04");
    }

    #[test]
    fn test_invalid_calendar_date_fails() {
        assert!(normalize_date("February 30, 2024").is_err());
    }

    #[test]
    fn test_garbage_fails_without_panicking() {
        for input in ["", "not found", "sometime in spring", "2024", "13/45/99"] {
            let err = normalize_date(input).unwrap_err();
            assert_eq!(err.input, input);
        }
    }
}
