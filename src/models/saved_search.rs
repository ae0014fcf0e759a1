//! Saved search model.

use crate::domain::ValidationError;
use serde::{Deserialize, Serialize};

/// Criteria stored with a saved search. Stored as camelCase JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SavedSearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl SavedSearchFilters {
    /// Short tags describing the criteria, in display order.
    pub fn badges(&self) -> Vec<String> {
        let mut tags = Vec::new();
        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            tags.push(location.to_string());
        }
        if let Some(kind) = self.property_type.as_deref().filter(|k| !k.is_empty()) {
            tags.push(kind.to_string());
        }
        if let Some(beds) = self.bedrooms {
            tags.push(format!("{}+ beds", beds));
        }
        if let Some(min) = self.min_price {
            tags.push(format!("{}+", crate::tools::display::format_price(min)));
        }
        if let Some(max) = self.max_price {
            tags.push(format!("Under {}", crate::tools::display::format_price(max)));
        }
        tags
    }
}

/// A named, re-runnable search owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SavedSearch {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub name: String,

    /// Free-text description of what the search is for.
    pub query: String,

    #[serde(deserialize_with = "super::null_as_default")]
    pub filters: SavedSearchFilters,

    #[serde(deserialize_with = "super::null_as_default")]
    pub notifications: bool,

    #[serde(deserialize_with = "super::null_as_default")]
    pub results_count: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Date (`YYYY-MM-DD`) the search was last run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
}

/// Input for saving a new search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct NewSavedSearch {
    pub name: String,
    pub query: String,
    pub filters: SavedSearchFilters,
    pub notifications: bool,
}

impl NewSavedSearch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField(
                "Search name is required".into(),
            ));
        }
        if let (Some(min), Some(max)) = (self.filters.min_price, self.filters.max_price) {
            if max < min {
                return Err(ValidationError::OutOfRange {
                    field: "price range".into(),
                    reason: "maximum is below minimum".into(),
                });
            }
        }
        Ok(())
    }

    pub fn to_row(&self, user_id: &str) -> serde_json::Value {
        serde_json::json!({
            "user_id": user_id,
            "name": self.name.trim(),
            "query": self.query.trim(),
            "filters": self.filters,
            "notifications": self.notifications,
            "results_count": 0,
        })
    }
}

/// Partial update of a saved search. Unset fields are left alone.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct SavedSearchUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_count: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
}

impl SavedSearchUpdate {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_none() && self.results_count.is_none() && self.last_run.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filters_camel_case() {
        let json = r#"{"maxPrice": 1000000, "bedrooms": 2, "propertyType": "condo", "location": "Downtown"}"#;
        let filters: SavedSearchFilters = serde_json::from_str(json).unwrap();
        assert_eq!(filters.max_price, Some(1000000.0));
        assert_eq!(filters.property_type.as_deref(), Some("condo"));
        assert!(filters.min_price.is_none());

        let back = serde_json::to_value(&filters).unwrap();
        assert!(back.get("minPrice").is_none());
        assert_eq!(back["propertyType"], "condo");
    }

    #[test]
    fn test_update_serializes_only_set_fields() {
        let update = SavedSearchUpdate {
            notifications: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"notifications": false})
        );
        assert!(SavedSearchUpdate::default().is_empty());
    }

    #[test]
    fn test_badges() {
        let filters = SavedSearchFilters {
            min_price: Some(800000.0),
            max_price: Some(1500000.0),
            bedrooms: Some(3),
            property_type: Some("house".into()),
            location: None,
        };
        assert_eq!(
            filters.badges(),
            vec!["house", "3+ beds", "$800,000+", "Under $1,500,000"]
        );
    }

    #[test]
    fn test_new_search_validation() {
        let mut search = NewSavedSearch {
            name: "Family Homes".into(),
            query: "family homes 3+ bedrooms".into(),
            ..Default::default()
        };
        assert!(search.validate().is_ok());

        search.filters.min_price = Some(900000.0);
        search.filters.max_price = Some(100000.0);
        assert!(search.validate().is_err());

        search.name = " ".into();
        assert_eq!(
            search.validate().unwrap_err().to_string(),
            "Search name is required"
        );
    }

    #[test]
    fn test_new_search_row_starts_with_zero_results() {
        let row = NewSavedSearch {
            name: "Condos".into(),
            ..Default::default()
        }
        .to_row("u1");
        assert_eq!(row["results_count"], 0);
        assert_eq!(row["user_id"], "u1");
        assert!(row["filters"].is_object());
    }
}
