//! Normalized listing criteria and their backend predicates.

use super::search_filters::{is_unset, PriceRange, SearchFilters};
use crate::error::FilterResult;
use crate::models::{Property, PropertyStatus, PropertyType, SavedSearchFilters};
use crate::query::{Predicate, Query};
use serde::Serialize;

/// Columns a location search is matched against.
pub const LOCATION_COLUMNS: [&str; 3] = ["title", "city", "state"];

/// What a listing search filters on, after parsing the form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingCriteria {
    pub location: Option<String>,
    pub property_type: Option<PropertyType>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<u32>,
    pub status: PropertyStatus,
}

impl Default for ListingCriteria {
    fn default() -> Self {
        Self {
            location: None,
            property_type: None,
            min_price: None,
            max_price: None,
            min_bedrooms: None,
            status: PropertyStatus::Active,
        }
    }
}

impl ListingCriteria {
    /// Parse the search form. Blank and `"any"` fields add nothing.
    pub fn from_form(form: &SearchFilters) -> FilterResult<Self> {
        let location = Some(form.location.trim())
            .filter(|l| !l.is_empty())
            .map(str::to_string);

        let property_type = if is_unset(&form.property_type) {
            None
        } else {
            Some(form.property_type.parse::<PropertyType>()?)
        };

        let (min_price, max_price) = match form.price()? {
            Some(PriceRange { min, max }) => (Some(min), max),
            None => (None, None),
        };

        Ok(Self {
            location,
            property_type,
            min_price,
            max_price,
            min_bedrooms: form.min_bedrooms()?,
            status: PropertyStatus::Active,
        })
    }

    /// Criteria stored with a saved search.
    pub fn from_saved(filters: &SavedSearchFilters) -> FilterResult<Self> {
        let property_type = match filters.property_type.as_deref() {
            Some(kind) if !is_unset(kind) => Some(kind.parse::<PropertyType>()?),
            _ => None,
        };

        Ok(Self {
            location: filters
                .location
                .as_deref()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
            property_type,
            min_price: filters.min_price,
            max_price: filters.max_price,
            min_bedrooms: filters.bedrooms,
            status: PropertyStatus::Active,
        })
    }

    /// Add this criteria's clauses to `query`.
    ///
    /// Clause order is status, location, type, price, bedrooms. A location
    /// becomes a single `or` of substring matches over title, city and state.
    pub fn apply(&self, query: Query) -> Query {
        let mut query = query.eq("status", self.status.as_str());

        if let Some(location) = &self.location {
            query = query.or(LOCATION_COLUMNS
                .iter()
                .map(|column| Predicate::contains(*column, location))
                .collect());
        }

        if let Some(kind) = self.property_type {
            query = query.eq("property_type", kind.as_str());
        }

        if let Some(min) = self.min_price {
            query = query.gte("price", min);
        }

        if let Some(max) = self.max_price {
            query = query.lte("price", max);
        }

        if let Some(beds) = self.min_bedrooms {
            query = query.gte("bedrooms", beds);
        }

        query
    }

    /// Evaluate the criteria against an already-loaded listing.
    pub fn matches(&self, property: &Property) -> bool {
        if property.status.as_deref().unwrap_or(PropertyStatus::Active.as_str())
            != self.status.as_str()
        {
            return false;
        }

        if let Some(location) = &self.location {
            let needle = location.to_lowercase();
            let hit = [
                Some(property.title.as_str()),
                property.city.as_deref(),
                property.state.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        if let Some(kind) = self.property_type {
            if property.property_type.as_deref() != Some(kind.as_str()) {
                return false;
            }
        }

        if self.min_price.is_some_and(|min| property.price < min)
            || self.max_price.is_some_and(|max| property.price > max)
        {
            return false;
        }

        self.min_bedrooms
            .map_or(true, |beds| property.bedroom_count() >= beds)
    }

    /// Back to the stored saved-search shape.
    pub fn to_saved(&self) -> SavedSearchFilters {
        SavedSearchFilters {
            min_price: self.min_price,
            max_price: self.max_price,
            bedrooms: self.min_bedrooms,
            property_type: self.property_type.map(|t| t.as_str().to_string()),
            location: self.location.clone(),
        }
    }
}
