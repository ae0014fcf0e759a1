//! Search state carried in a shareable link.
//!
//! The form is stored as `filters=<percent-encoded JSON>` with camelCase keys,
//! optionally followed by `&sort=<key>`.

use super::search_filters::SearchFilters;
use super::sort::SortOrder;
use crate::error::{FilterError, FilterResult};

/// The decoded contents of a search link.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchState {
    pub filters: SearchFilters,
    pub sort: SortOrder,
}

/// Encode the form (and a non-default sort) as a query string.
pub fn encode_filters(filters: &SearchFilters, sort: SortOrder) -> FilterResult<String> {
    let json = serde_json::to_string(&filters.normalized())
        .map_err(|e| FilterError::InvalidState(e.to_string()))?;
    let mut out = format!("filters={}", urlencoding::encode(&json));
    if sort != SortOrder::default() {
        out.push_str("&sort=");
        out.push_str(sort.as_str());
    }
    Ok(out)
}

/// Decode a query string produced by [`encode_filters`].
///
/// A leading `?` is ignored, unknown parameters are skipped, and a missing
/// `filters` parameter yields an empty form.
pub fn decode_filters(query_string: &str) -> FilterResult<SearchState> {
    let mut state = SearchState::default();

    for pair in query_string.trim_start_matches('?').split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        match key {
            "filters" => {
                let json = urlencoding::decode(value)
                    .map_err(|e| FilterError::InvalidState(e.to_string()))?;
                state.filters = serde_json::from_str(&json)
                    .map_err(|e| FilterError::InvalidState(e.to_string()))?;
            }
            "sort" => state.sort = SortOrder::parse_optional(Some(value))?,
            _ => {}
        }
    }

    Ok(state)
}
