//! The search form and its price range presets.

use crate::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};

/// Sentinel the form uses for "no constraint".
pub const ANY: &str = "any";

/// Price range presets offered by the search form, with their labels.
pub const PRICE_RANGE_OPTIONS: [(&str, &str); 5] = [
    ("0-500000", "Under $500K"),
    ("500000-1000000", "$500K - $1M"),
    ("1000000-2000000", "$1M - $2M"),
    ("2000000-5000000", "$2M - $5M"),
    ("5000000+", "$5M+"),
];

/// What a user typed or picked in the search form.
///
/// Every field is the raw form string. Blank and `"any"` mean the field does
/// not constrain the search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchFilters {
    pub location: String,
    pub property_type: String,
    pub price_range: String,
    pub bedrooms: String,
}

pub(crate) fn is_unset(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case(ANY)
}

impl SearchFilters {
    /// Copy of the form with `"any"` replaced by blanks, as submitted.
    pub fn normalized(&self) -> Self {
        let clear = |v: &str| {
            if is_unset(v) {
                String::new()
            } else {
                v.trim().to_string()
            }
        };
        Self {
            location: self.location.trim().to_string(),
            property_type: clear(&self.property_type),
            price_range: clear(&self.price_range),
            bedrooms: clear(&self.bedrooms),
        }
    }

    /// Whether any field constrains the search.
    pub fn is_empty(&self) -> bool {
        self.location.trim().is_empty()
            && is_unset(&self.property_type)
            && is_unset(&self.price_range)
            && is_unset(&self.bedrooms)
    }

    /// Minimum bedroom count. Accepts `"3"` and `"3+"`.
    pub fn min_bedrooms(&self) -> FilterResult<Option<u32>> {
        if is_unset(&self.bedrooms) {
            return Ok(None);
        }
        let raw = self.bedrooms.trim();
        raw.trim_end_matches('+')
            .trim()
            .parse::<u32>()
            .map(Some)
            .map_err(|_| FilterError::InvalidBedrooms(raw.to_string()))
    }

    pub fn price(&self) -> FilterResult<Option<PriceRange>> {
        PriceRange::parse(&self.price_range)
    }
}

/// An inclusive price band; `max` is `None` for open-ended ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl PriceRange {
    /// Parse `"min-max"` or `"min+"`. Blank and `"any"` give `None`.
    pub fn parse(raw: &str) -> FilterResult<Option<PriceRange>> {
        if is_unset(raw) {
            return Ok(None);
        }
        let raw = raw.trim();
        let invalid = || FilterError::InvalidPriceRange(raw.to_string());
        let amount = |s: &str| -> FilterResult<f64> {
            let s = s.trim();
            s.parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .ok_or_else(invalid)
        };

        if let Some(min) = raw.strip_suffix('+') {
            return Ok(Some(PriceRange {
                min: amount(min)?,
                max: None,
            }));
        }

        let (min, max) = raw.split_once('-').ok_or_else(invalid)?;
        let (min, max) = (amount(min)?, amount(max)?);
        if max < min {
            return Err(invalid());
        }
        Ok(Some(PriceRange {
            min,
            max: Some(max),
        }))
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && self.max.map_or(true, |max| price <= max)
    }
}
