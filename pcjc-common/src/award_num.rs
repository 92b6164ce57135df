//! Award number validation
//!
//! The award number is the join key between the HTML source page, the raw
//! JSON record, the photo file and the database row. Format: four-digit
//! award year followed by a four-digit sequence, e.g. `20255302`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Years outside this range indicate an index page or placeholder entry
/// that leaked into the data set, not a real award.
const MIN_AWARD_YEAR: i64 = 1990;
const MAX_AWARD_YEAR: i64 = 2100;

/// A validated award number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AwardNum(String);

impl AwardNum {
    /// Parse and validate an award number string.
    ///
    /// Accepts exactly eight ASCII digits whose leading four form a
    /// plausible award year. Surrounding whitespace is tolerated.
    pub fn parse(input: &str) -> Result<Self> {
        let s = input.trim();

        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidInput(format!(
                "malformed award number: {:?} (expected YYYY + 4-digit sequence)",
                input
            )));
        }

        let num = Self(s.to_string());
        let year = num.year();
        if !(MIN_AWARD_YEAR..=MAX_AWARD_YEAR).contains(&year) {
            return Err(Error::InvalidInput(format!(
                "award number {} has implausible year {}",
                s, year
            )));
        }

        Ok(num)
    }

    /// True if the string would pass `parse`
    pub fn is_valid(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Award year encoded in the leading four digits
    pub fn year(&self) -> i64 {
        // Validated as all-digits at construction
        self.0
            .bytes()
            .take(4)
            .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AwardNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_award_num() {
        let num = AwardNum::parse("20255302").unwrap();
        assert_eq!(num.as_str(), "20255302");
        assert_eq!(num.year(), 2025);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let num = AwardNum::parse("  20245301 ").unwrap();
        assert_eq!(num.as_str(), "20245301");
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(AwardNum::parse("2025530").is_err());
        assert!(AwardNum::parse("202553021").is_err());
        assert!(AwardNum::parse("").is_err());
    }

    #[test]
    fn test_rejects_non_digits() {
        assert!(AwardNum::parse("2025abcd").is_err());
        assert!(AwardNum::parse("index.ht").is_err());
    }

    #[test]
    fn test_rejects_implausible_year() {
        assert!(AwardNum::parse("00005302").is_err());
        assert!(AwardNum::parse("99995302").is_err());
    }

    #[test]
    fn test_is_valid() {
        assert!(AwardNum::is_valid("20155001"));
        assert!(!AwardNum::is_valid("index"));
    }
}
