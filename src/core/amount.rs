//! Amount entry parsing

use crate::core::error::ConversionError;
use std::fmt::Display;

/// A validated, non-negative amount to convert, kept as the normalized
/// text the user typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount(String);

impl Amount {
    /// Parses user text, accepting a comma as the decimal separator.
    /// Only digits and at most one period are allowed, with at least one digit.
    pub fn parse(input: &str) -> Result<Self, ConversionError> {
        let normalized = normalize(input);

        let separators = normalized.chars().filter(|c| *c == '.').count();
        let digits = normalized.chars().filter(char::is_ascii_digit).count();
        if digits == 0
            || separators > 1
            || !normalized.chars().all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(ConversionError::InvalidAmount(input.to_string()));
        }

        Ok(Amount(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trims the input and turns every comma into a period.
pub fn normalize(input: &str) -> String {
    input.trim().replace(',', ".")
}

/// Whether `c` may be typed into the amount field given its current text.
pub fn accepts_char(current: &str, c: char) -> bool {
    if c.is_ascii_digit() {
        return true;
    }
    matches!(c, '.' | ',') && !current.contains(['.', ','])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_is_normalized_to_period() {
        assert_eq!(normalize("1,5"), "1.5");
        assert_eq!(Amount::parse("1,5").unwrap().to_string(), "1.5");
    }

    #[test]
    fn test_valid_amounts() {
        assert_eq!(Amount::parse("100").unwrap().to_string(), "100");
        assert_eq!(Amount::parse(" 0.25 ").unwrap().to_string(), "0.25");
        assert_eq!(Amount::parse("0").unwrap().as_str(), "0");
        assert_eq!(Amount::parse("5.").unwrap().as_str(), "5.");
        assert_eq!(Amount::parse(",5").unwrap().as_str(), ".5");
    }

    #[test]
    fn test_amounts_keep_typed_digits() {
        let tiny = "0.000000000000000000000000000001";
        assert_eq!(Amount::parse(tiny).unwrap().as_str(), tiny);

        let huge = "100000000000000000000000000000";
        assert_eq!(Amount::parse(huge).unwrap().as_str(), huge);

        assert_eq!(Amount::parse("007,50").unwrap().as_str(), "007.50");
    }

    #[test]
    fn test_invalid_amounts() {
        for input in ["", "abc", "1.2.3", "-5", "1,000.50", "1e5", "1_000", "."] {
            let result = Amount::parse(input);
            assert!(
                matches!(result, Err(ConversionError::InvalidAmount(_))),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_char() {
        assert!(accepts_char("12", '3'));
        assert!(accepts_char("12", ','));
        assert!(!accepts_char("1,2", '.'));
        assert!(!accepts_char("1.2", ','));
        assert!(!accepts_char("12", 'x'));
        assert!(!accepts_char("12", '-'));
    }
}
