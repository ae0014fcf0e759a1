//! Domain validation errors.

use std::fmt;

/// Errors that can occur during domain value object validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided ID is empty. Carries the kind of record.
    EmptyId(&'static str),

    /// The provided email address is invalid.
    InvalidEmail(String),

    /// The provided phone number is invalid.
    InvalidPhone(String),

    /// The provided zip code is invalid.
    InvalidZipCode(String),

    /// A required form field was left blank. Carries the form's message.
    MissingField(String),

    /// A numeric form field is out of range.
    OutOfRange { field: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId(kind) => write!(f, "{} ID cannot be empty", kind),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
            Self::InvalidPhone(phone) => write!(f, "Invalid phone number: {}", phone),
            Self::InvalidZipCode(zip) => write!(f, "Invalid zip code: {}", zip),
            Self::MissingField(message) => write!(f, "{}", message),
            Self::OutOfRange { field, reason } => write!(f, "Invalid {}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}
