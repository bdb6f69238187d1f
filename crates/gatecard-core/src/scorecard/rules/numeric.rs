//! Digit-guarded numeric fields.
//!
//! A positional numeric field is accepted only when its trimmed line is made
//! of ASCII digits alone. Anything else, including a decimal point, leaves the
//! field empty.

use std::str::FromStr;

use rust_decimal::Decimal;

/// True when `s` is non-empty and every character is an ASCII digit.
pub fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Parse a digit-only line as an integer.
///
/// Returns `None` for non-digit input and for values that overflow `u64`.
pub fn parse_integer(line: &str) -> Option<u64> {
    let line = line.trim();
    if !is_digits(line) {
        return None;
    }
    line.parse().ok()
}

/// Parse a digit-only line as a decimal.
///
/// `"85.5"` fails the digit guard and yields `None`; fractional marks are
/// never admitted.
pub fn parse_decimal(line: &str) -> Option<Decimal> {
    let line = line.trim();
    if !is_digits(line) {
        return None;
    }
    Decimal::from_str(line).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_digits() {
        assert!(is_digits("0042"));
        assert!(!is_digits(""));
        assert!(!is_digits("42a"));
        assert!(!is_digits("-42"));
        assert!(!is_digits("85.5"));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("  550 "), Some(550));
        assert_eq!(parse_integer("007"), Some(7));
        assert_eq!(parse_integer("AIR 42"), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_parse_integer_overflow() {
        assert_eq!(parse_integer("99999999999999999999999"), None);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("85"), Some(Decimal::from(85)));
        assert_eq!(parse_decimal("85.5"), None);
        assert_eq!(parse_decimal("85,5"), None);
    }
}
