//! Phone number type.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// Nothing left after removing whitespace.
    #[error("phone number cannot be empty")]
    Empty,
    /// A character other than a digit or a leading `+`.
    #[error("phone number may only contain digits and a leading +")]
    InvalidCharacter,
    /// The first digit is zero.
    #[error("phone number cannot start with 0")]
    LeadingZero,
    /// More than [`Phone::MAX_DIGITS`] digits.
    #[error("phone number must be at most {max} digits")]
    TooLong {
        /// Maximum allowed digit count.
        max: usize,
    },
}

/// A phone number: an optional leading `+` followed by 1-16 digits, the
/// first of which is not zero.
///
/// Whitespace in the input is ignored, so `"+1 555 010 9999"` and
/// `"+15550109999"` parse to the same value.
///
/// ```
/// use shopfront_core::Phone;
///
/// assert_eq!(Phone::parse("+1 555 010 9999").unwrap().as_str(), "+15550109999");
/// assert!(Phone::parse("0123").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Maximum number of digits.
    pub const MAX_DIGITS: usize = 16;

    /// Parse a `Phone` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if, after removing whitespace, the input is empty,
    /// contains anything besides digits and one leading `+`, starts with a
    /// zero digit, or has more than 16 digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let digits = compact.strip_prefix('+').unwrap_or(&compact);

        let Some(first) = digits.chars().next() else {
            return Err(PhoneError::Empty);
        };

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneError::InvalidCharacter);
        }

        if first == '0' {
            return Err(PhoneError::LeadingZero);
        }

        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(compact))
    }

    /// Returns the normalized number (whitespace removed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(Phone::parse("5550109999").is_ok());
        assert!(Phone::parse("+15550109999").is_ok());
        assert!(Phone::parse("7").is_ok());
    }

    #[test]
    fn test_whitespace_is_stripped() {
        let phone = Phone::parse(" +44 20 7946 0958 ").unwrap();
        assert_eq!(phone.as_str(), "+442079460958");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Phone::parse("   "), Err(PhoneError::Empty));
        assert_eq!(Phone::parse("+"), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_leading_zero() {
        assert_eq!(Phone::parse("0207946"), Err(PhoneError::LeadingZero));
        assert_eq!(Phone::parse("+0207946"), Err(PhoneError::LeadingZero));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert_eq!(
            Phone::parse("555-010-9999"),
            Err(PhoneError::InvalidCharacter)
        );
        assert_eq!(Phone::parse("++15550109999"), Err(PhoneError::InvalidCharacter));
    }

    #[test]
    fn test_parse_length_limit() {
        assert!(Phone::parse("1234567890123456").is_ok());
        assert_eq!(
            Phone::parse("12345678901234567"),
            Err(PhoneError::TooLong { max: 16 })
        );
    }
}
