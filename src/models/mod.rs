//! Data models for marketplace records.
//!
//! This module contains the listings, favorites, profiles and saved searches
//! mirrored from the backend tables, plus the forms used to write them.

pub mod profile;
pub mod property;
pub mod saved_property;
pub mod saved_search;

pub use profile::{Profile, ProfileUpdate, UserType};
pub use property::{Property, PropertyDraft, PropertyImage, PropertyStatus, PropertyType};
pub use saved_property::SavedProperty;
pub use saved_search::{NewSavedSearch, SavedSearch, SavedSearchFilters, SavedSearchUpdate};

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
