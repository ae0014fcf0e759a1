//! Data access for marketplace tables.
//!
//! Each trait abstracts one table (or a table plus its join) so services can
//! run against the REST backend or an in-memory double.

mod rest_profile_repository;
mod rest_property_repository;
mod rest_saved_property_repository;
mod rest_saved_search_repository;
mod traits;

pub use rest_profile_repository::RestProfileRepository;
pub use rest_property_repository::RestPropertyRepository;
pub use rest_saved_property_repository::RestSavedPropertyRepository;
pub use rest_saved_search_repository::RestSavedSearchRepository;
pub use traits::{
    ProfileRepository, PropertyRepository, SavedPropertyRepository, SavedSearchRepository,
};

use crate::error::{BackendError, BackendResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub(crate) fn decode<T: DeserializeOwned>(row: Value) -> BackendResult<T> {
    serde_json::from_value(row).map_err(BackendError::JsonError)
}

pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> BackendResult<Vec<T>> {
    rows.into_iter().map(decode).collect()
}

/// First row of a write's representation, or `NotFound` if nothing matched.
pub(crate) fn first_row<T: DeserializeOwned>(rows: Vec<Value>, what: &str) -> BackendResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| BackendError::NotFound(what.to_string()))
        .and_then(decode)
}
