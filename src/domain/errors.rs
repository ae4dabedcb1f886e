//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No recipient was given for the channel.
    MissingRecipient,

    /// The provided email address is invalid.
    InvalidEmail(String),

    /// The provided phone number is invalid.
    InvalidPhone(String),

    /// A required message body was empty.
    MissingMessage,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRecipient => write!(f, "Recipient is required"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
            Self::InvalidPhone(phone) => write!(f, "Invalid phone number: {}", phone),
            Self::MissingMessage => write!(f, "Message is required"),
        }
    }
}

impl std::error::Error for ValidationError {}
