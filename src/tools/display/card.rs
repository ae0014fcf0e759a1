//! Summary view of a listing for result lists.

use super::format::{format_number, format_price};
use crate::models::Property;
use schemars::JsonSchema;
use serde::Serialize;

/// What a listing card shows, with the display fallbacks applied.
#[derive(Debug, Clone, Serialize, PartialEq, JsonSchema)]
pub struct PropertyCard {
    pub id: String,
    pub title: String,
    pub price: String,
    pub location: String,
    pub property_type: String,
    pub bedrooms: u32,
    pub bathrooms: f64,
    pub square_feet: String,
    pub image_url: String,
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<bool>,
}

impl PropertyCard {
    pub fn from_property(property: &Property) -> Self {
        Self {
            id: property.id.clone(),
            title: property.title.clone(),
            price: format_price(property.price),
            location: property.display_location(),
            property_type: property.type_label(),
            bedrooms: property.bedroom_count(),
            bathrooms: property.bathroom_count(),
            square_feet: format_number(property.area_sqft() as f64),
            image_url: property.primary_image_url(),
            featured: property.featured,
            saved: None,
        }
    }

    /// Mark whether the signed-in user has saved this listing.
    pub fn with_saved(mut self, saved: bool) -> Self {
        self.saved = Some(saved);
        self
    }

    /// One-line text summary, e.g. `Modern Condo | $850,000 | 2 bd | 2 ba | 1,200 sqft | Austin, TX`.
    pub fn summary_line(&self) -> String {
        format!(
            "{} | {} | {} bd | {} ba | {} sqft | {}",
            self.title, self.price, self.bedrooms, self.bathrooms, self.square_feet, self.location
        )
    }
}

impl From<&Property> for PropertyCard {
    fn from(property: &Property) -> Self {
        Self::from_property(property)
    }
}
