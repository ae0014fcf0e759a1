//! US zip code value object.

use super::errors::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{5}(-\d{4})?$").expect("zip pattern compiles"));

/// A five digit zip code, optionally in ZIP+4 form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZipCode(String);

impl ZipCode {
    pub fn new(zip: impl Into<String>) -> Result<Self, ValidationError> {
        let zip = zip.into().trim().to_string();
        if !ZIP_RE.is_match(&zip) {
            return Err(ValidationError::InvalidZipCode(zip));
        }
        Ok(Self(zip))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The five digit prefix.
    pub fn base(&self) -> &str {
        &self.0[..5]
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
