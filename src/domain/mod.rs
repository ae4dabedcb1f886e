//! Domain value objects and types.
//!
//! Type-safe wrappers for contact targets. Email addresses are only
//! checked when strict validation is requested; phone numbers are kept
//! as entered and expose their dialable digits.

pub mod email;
pub mod errors;
pub mod phone;

pub use email::EmailAddress;
pub use errors::ValidationError;
pub use phone::PhoneNumber;
