//! Property listing model and the listing form.

use crate::domain::{ValidationError, ZipCode};
use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Image shown when a listing has no photos.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1568605114967-8130f3a36994?w=800&h=600&fit=crop";

/// Column list used by listing grids: card fields plus embedded images.
pub const CARD_COLUMNS: &str = "id, title, price, property_type, city, state, bedrooms, \
     bathrooms, square_feet, featured, latitude, longitude, created_at, \
     property_images(image_url, is_primary)";

/// Column list used by the detail page and the owner dashboard.
pub const DETAIL_COLUMNS: &str = "*, property_images(image_url, is_primary, caption)";

/// A photo attached to a listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PropertyImage {
    pub image_url: String,
    #[serde(deserialize_with = "super::null_as_default")]
    pub is_primary: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

/// A property listing as stored by the backend.
///
/// Rows come back with whichever columns the query selected, so everything
/// except `id`, `title` and `price` is optional. Older rows and hand-built
/// fixtures use the short names (`beds`, `sqft`, `type`, ...); the accessor
/// methods fall back to those when the canonical column is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Property {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub price: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub square_feet: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(deserialize_with = "super::null_as_default")]
    pub featured: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(
        deserialize_with = "super::null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub property_images: Vec<PropertyImage>,

    // Legacy short-form fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub beds: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub baths: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sqft: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl Property {
    /// `bedrooms`, else `beds`, else 0. A zero count counts as missing.
    pub fn bedroom_count(&self) -> u32 {
        self.bedrooms
            .filter(|n| *n > 0)
            .or(self.beds)
            .unwrap_or(0)
    }

    /// `bathrooms`, else `baths`, else 0.
    pub fn bathroom_count(&self) -> f64 {
        self.bathrooms
            .filter(|n| *n > 0.0)
            .or(self.baths)
            .unwrap_or(0.0)
    }

    /// `square_feet`, else `sqft`, else 0.
    pub fn area_sqft(&self) -> u64 {
        self.square_feet
            .filter(|n| *n > 0)
            .or(self.sqft)
            .unwrap_or(0)
    }

    pub fn type_label(&self) -> String {
        non_blank(&self.property_type)
            .or_else(|| non_blank(&self.kind))
            .unwrap_or("Property")
            .to_string()
    }

    /// Free-form location, else `address, city, state`, else `city, state`.
    pub fn display_location(&self) -> String {
        if let Some(location) = non_blank(&self.location) {
            return location.to_string();
        }
        match (
            non_blank(&self.address),
            non_blank(&self.city),
            non_blank(&self.state),
        ) {
            (Some(address), Some(city), Some(state)) => format!("{}, {}, {}", address, city, state),
            (_, Some(city), Some(state)) => format!("{}, {}", city, state),
            _ => "Location not specified".to_string(),
        }
    }

    /// Explicit image, else the image flagged primary, else the first image,
    /// else the placeholder.
    pub fn primary_image_url(&self) -> String {
        if let Some(image) = non_blank(&self.image) {
            return image.to_string();
        }
        self.property_images
            .iter()
            .find(|img| img.is_primary)
            .or_else(|| self.property_images.first())
            .map(|img| img.image_url.clone())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string())
    }

    /// Up to `count` images after the primary one, for the gallery strip.
    pub fn gallery_urls(&self, count: usize) -> Vec<String> {
        self.property_images
            .iter()
            .skip(1)
            .take(count)
            .map(|img| img.image_url.clone())
            .collect()
    }

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(PropertyStatus::Active.as_str())
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Property types offered by the search form and the listing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    House,
    Condo,
    Apartment,
    Villa,
    Townhouse,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::House,
        PropertyType::Condo,
        PropertyType::Apartment,
        PropertyType::Villa,
        PropertyType::Townhouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Condo => "condo",
            PropertyType::Apartment => "apartment",
            PropertyType::Villa => "villa",
            PropertyType::Townhouse => "townhouse",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::House => "House",
            PropertyType::Condo => "Condo",
            PropertyType::Apartment => "Apartment",
            PropertyType::Villa => "Villa",
            PropertyType::Townhouse => "Townhouse",
        }
    }
}

impl FromStr for PropertyType {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        PropertyType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| FilterError::InvalidPropertyType(s.to_string()))
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyStatus {
    #[default]
    Active,
    Pending,
    Sold,
    Inactive,
}

impl PropertyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyStatus::Active => "active",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Sold => "sold",
            PropertyStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for PropertyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(PropertyStatus::Active),
            "pending" => Ok(PropertyStatus::Pending),
            "sold" => Ok(PropertyStatus::Sold),
            "inactive" => Ok(PropertyStatus::Inactive),
            other => Err(format!("Unknown listing status: {}", other)),
        }
    }
}

/// The create / edit listing form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct PropertyDraft {
    pub title: String,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub property_type: Option<String>,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<f64>,
    pub square_feet: Option<u64>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub status: Option<PropertyStatus>,
    pub featured: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Image URLs in display order; the first becomes the primary image.
    pub image_urls: Vec<String>,
}

impl PropertyDraft {
    /// Check the form the way the listing editor does, reporting the first
    /// problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("Title is required".into()));
        }

        match self.property_type.as_deref().map(str::trim) {
            None | Some("") => {
                return Err(ValidationError::MissingField(
                    "Property type is required".into(),
                ))
            }
            Some(kind) => {
                kind.parse::<PropertyType>()
                    .map_err(|e| ValidationError::OutOfRange {
                        field: "property type".into(),
                        reason: e.to_string(),
                    })?;
            }
        }

        let price = self
            .price
            .ok_or_else(|| ValidationError::MissingField("Price is required".into()))?;
        if !price.is_finite() || price <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "price".into(),
                reason: "must be greater than zero".into(),
            });
        }

        if self.bedrooms.is_none() {
            return Err(ValidationError::MissingField("Bedrooms is required".into()));
        }

        match self.bathrooms {
            None => return Err(ValidationError::MissingField("Bathrooms is required".into())),
            Some(b) if !b.is_finite() || b < 0.0 => {
                return Err(ValidationError::OutOfRange {
                    field: "bathrooms".into(),
                    reason: "must not be negative".into(),
                })
            }
            Some(_) => {}
        }

        for (value, message) in [
            (&self.address, "Address is required"),
            (&self.city, "City is required"),
            (&self.state, "State is required"),
            (&self.zip_code, "Zip code is required"),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(message.into()));
            }
        }
        ZipCode::new(self.zip_code.as_str())?;

        Ok(())
    }

    /// Column values for an insert or update. The image list is written
    /// separately to `property_images`.
    pub fn to_row(&self, user_id: &str) -> serde_json::Value {
        let property_type = self
            .property_type
            .as_deref()
            .and_then(|t| t.parse::<PropertyType>().ok())
            .map(|t| t.as_str().to_string());

        serde_json::json!({
            "user_id": user_id,
            "title": self.title.trim(),
            "description": self.description.as_deref().map(str::trim).filter(|d| !d.is_empty()),
            "price": self.price,
            "property_type": property_type,
            "bedrooms": self.bedrooms,
            "bathrooms": self.bathrooms,
            "square_feet": self.square_feet,
            "address": self.address.trim(),
            "city": self.city.trim(),
            "state": self.state.trim(),
            "zip_code": self.zip_code.trim(),
            "status": self.status.unwrap_or_default().as_str(),
            "featured": self.featured.unwrap_or(false),
            "latitude": self.latitude,
            "longitude": self.longitude,
        })
    }

    /// Column values for an update of an existing listing.
    ///
    /// Status, featured flag and coordinates are only written when the draft
    /// sets them; otherwise the stored values stay.
    pub fn to_patch(&self, user_id: &str) -> serde_json::Value {
        let mut row = self.to_row(user_id);
        if let Some(columns) = row.as_object_mut() {
            if self.status.is_none() {
                columns.remove("status");
            }
            if self.featured.is_none() {
                columns.remove("featured");
            }
            if self.latitude.is_none() {
                columns.remove("latitude");
            }
            if self.longitude.is_none() {
                columns.remove("longitude");
            }
        }
        row
    }
}
