//! Favorite (saved property) association.

use super::property::Property;
use serde::{Deserialize, Serialize};

/// Columns for the favorites list: the association plus the joined listing.
pub const SAVED_PROPERTY_COLUMNS: &str = "id, property_id, created_at, \
     properties:property_id(id, title, price, property_type, bedrooms, bathrooms, \
     square_feet, address, city, state, status, property_images(image_url, is_primary))";

/// A user's favorite listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SavedProperty {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub property_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// The joined listing; absent if it was deleted after being saved.
    #[serde(rename = "properties", skip_serializing_if = "Option::is_none")]
    pub property: Option<Property>,
}
