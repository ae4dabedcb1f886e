//! PhoneNumber value object.

use super::errors::ValidationError;
use std::fmt;

/// A phone number as the user entered it, plus its dialable digits.
///
/// Formatting is never rejected: every non-digit character is dropped when
/// building deep links, so `+1 (555) 123-4567` dials `15551234567`.
///
/// # Example
///
/// ```
/// use housing_contact::domain::PhoneNumber;
///
/// let phone = PhoneNumber::new("+1 (555) 123-4567").unwrap();
/// assert_eq!(phone.digits(), "15551234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    raw: String,
    digits: String,
}

impl PhoneNumber {
    /// Create a new PhoneNumber.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingRecipient` if the input is blank and
    /// `ValidationError::InvalidPhone` if it contains no digits at all.
    pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = phone.into();

        if raw.trim().is_empty() {
            return Err(ValidationError::MissingRecipient);
        }

        let digits = Self::digits_only(&raw);
        if digits.is_empty() {
            return Err(ValidationError::InvalidPhone(raw));
        }

        Ok(Self { raw, digits })
    }

    /// Strip every character that isn't an ASCII digit.
    pub fn digits_only(input: &str) -> String {
        input.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    /// Get the dialable digits.
    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
