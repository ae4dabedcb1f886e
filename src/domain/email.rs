//! EmailAddress value object.

use super::errors::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated email address.
///
/// The email channel only requires a non-empty recipient by default; this
/// type backs the opt-in strict mode. Strict mode can reject legitimate but
/// unusual addresses, which is why it is not the default.
///
/// # Example
///
/// ```
/// use housing_contact::domain::EmailAddress;
///
/// let email = EmailAddress::new("landlord@example.com").unwrap();
/// assert_eq!(email.as_str(), "landlord@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new EmailAddress, validating the format.
    ///
    /// Surrounding whitespace is trimmed before validation.
    ///
    /// # Validation Rules
    ///
    /// - Must contain exactly one '@' symbol
    /// - Must have a local part before '@'
    /// - Must have a domain part after '@' with at least one '.'
    /// - Must not contain whitespace
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingRecipient` for an empty input and
    /// `ValidationError::InvalidEmail` if the format is invalid.
    pub fn new(email: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into().trim().to_string();

        if email.is_empty() {
            return Err(ValidationError::MissingRecipient);
        }

        if !Self::is_valid(&email) {
            return Err(ValidationError::InvalidEmail(email));
        }

        Ok(Self(email))
    }

    fn is_valid(email: &str) -> bool {
        if email.chars().any(char::is_whitespace) {
            return false;
        }

        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || domain.contains('@') {
            return false;
        }

        domain.contains('.') && domain.split('.').all(|part| !part.is_empty())
    }

    /// Get the email address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for EmailAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for EmailAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        EmailAddress::new(s).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
