//! Share-count normalization.
//!
//! Filings print counts with thousands separators (`"1,234,567"`). The
//! normalizer strips them and parses what remains as a non-negative integer.
//! Empty input means "no shares disclosed" and maps to `0`; anything else
//! that is not pure digits is rejected rather than coerced.

use crate::types::HoldingsError;

/// Normalize a disclosed share count.
pub fn parse_share_count(raw: &str) -> Result<i64, HoldingsError> {
    parse_grouped_integer(raw, "shares")
}

/// Parse a non-negative integer that may contain `,` grouping separators.
///
/// - empty / whitespace-only input -> `0`
/// - signs, decimal points, letters -> `HoldingsError::Parse`
/// - values that overflow `i64` -> `HoldingsError::Parse`
pub fn parse_grouped_integer(raw: &str, field: &'static str) -> Result<i64, HoldingsError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let digits: String = trimmed.chars().filter(|c| *c != ',').collect();
    let parse_err = || HoldingsError::Parse {
        field,
        raw: raw.to_string(),
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(parse_err());
    }

    digits.parse::<i64>().map_err(|_| parse_err())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_separators_removed() {
        assert_eq!(parse_share_count("1,234").unwrap(), 1234);
        assert_eq!(parse_share_count("12,345,678").unwrap(), 12_345_678);
        assert_eq!(parse_share_count("500").unwrap(), 500);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(parse_share_count("").unwrap(), 0);
        assert_eq!(parse_share_count("   ").unwrap(), 0);
    }

    #[test]
    fn surrounding_whitespace_tolerated() {
        assert_eq!(parse_share_count(" 1,000 ").unwrap(), 1000);
    }

    #[test]
    fn malformed_rejected() {
        for s in ["abc", "12.5", "-100", "+100", ",", "1 000", "1e6"] {
            assert!(parse_share_count(s).is_err(), "accepted '{s}'");
        }
    }

    #[test]
    fn overflow_rejected() {
        assert!(parse_share_count("99,999,999,999,999,999,999").is_err());
    }

    #[test]
    fn error_carries_field_and_raw() {
        let err = parse_grouped_integer("n/a", "value").unwrap_err();
        let s = err.to_string();
        assert!(s.contains("value"));
        assert!(s.contains("n/a"));
    }
}
