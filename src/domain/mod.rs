//! Domain value objects and types.
//!
//! Type-safe wrappers for record identifiers and the contact and address
//! fields users type into forms. Each one validates at construction so
//! malformed input never reaches the backend.

pub mod contact_info;
pub mod errors;
pub mod ids;
pub mod zip_code;

pub use contact_info::{EmailAddress, PhoneNumber};
pub use errors::ValidationError;
pub use ids::{PropertyId, UserId};
pub use zip_code::ZipCode;
