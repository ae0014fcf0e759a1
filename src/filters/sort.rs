//! Result ordering offered by the listings page.

use crate::error::FilterError;
use crate::query::Query;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Newest listings first.
    #[default]
    #[serde(rename = "created_at")]
    Newest,
    PriceLow,
    PriceHigh,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "created_at",
            SortOrder::PriceLow => "price_low",
            SortOrder::PriceHigh => "price_high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::Newest => "Newest First",
            SortOrder::PriceLow => "Price: Low to High",
            SortOrder::PriceHigh => "Price: High to Low",
        }
    }

    /// Add the ordering clause to a query.
    pub fn apply(&self, query: Query) -> Query {
        match self {
            SortOrder::Newest => query.order("created_at", false),
            SortOrder::PriceLow => query.order("price", true),
            SortOrder::PriceHigh => query.order("price", false),
        }
    }

    /// Parse an optional sort key, defaulting to newest first.
    pub fn parse_optional(raw: Option<&str>) -> Result<Self, FilterError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(key) => key.parse(),
            None => Ok(SortOrder::default()),
        }
    }
}

impl FromStr for SortOrder {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "created_at" | "newest" => Ok(SortOrder::Newest),
            "price_low" => Ok(SortOrder::PriceLow),
            "price_high" => Ok(SortOrder::PriceHigh),
            other => Err(FilterError::InvalidSort(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
