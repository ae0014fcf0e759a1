//! Listing search and detail lookup.

use crate::domain::PropertyId;
use crate::error::BackendResult;
use crate::filters::{decode_filters, encode_filters, ListingCriteria, SearchFilters, SortOrder};
use crate::models::Property;
use crate::repositories::PropertyRepository;
use std::sync::Arc;

/// Rows returned when the caller does not ask for a specific number.
pub const DEFAULT_PAGE_SIZE: usize = 24;

/// A completed search with the criteria that produced it.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub criteria: ListingCriteria,
    pub sort: SortOrder,
    pub properties: Vec<Property>,
    /// Whether the result hit the row limit, so more may exist.
    pub truncated: bool,
}

#[derive(Clone)]
pub struct PropertySearchTools {
    repo: Arc<dyn PropertyRepository>,
    max_results: usize,
}

impl PropertySearchTools {
    /// `max_results` caps every search regardless of the requested limit.
    pub fn new(repo: Arc<dyn PropertyRepository>, max_results: usize) -> Self {
        Self { repo, max_results }
    }

    /// Run a search over active listings.
    pub async fn search(
        &self,
        criteria: ListingCriteria,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> BackendResult<SearchOutcome> {
        let limit = limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, self.max_results.max(1));

        let start = std::time::Instant::now();
        let properties = self.repo.search(&criteria, sort, limit).await?;
        tracing::debug!(
            "Search returned {} listings in {}ms",
            properties.len(),
            start.elapsed().as_millis()
        );

        Ok(SearchOutcome {
            truncated: properties.len() >= limit,
            criteria,
            sort,
            properties,
        })
    }

    /// Total number of active listings matching `criteria`.
    pub async fn count(&self, criteria: &ListingCriteria) -> BackendResult<u64> {
        self.repo.count(criteria).await
    }

    /// Search from the raw form.
    pub async fn search_form(
        &self,
        form: &SearchFilters,
        sort: SortOrder,
        limit: Option<usize>,
    ) -> BackendResult<SearchOutcome> {
        let criteria = ListingCriteria::from_form(form)?;
        self.search(criteria, sort, limit).await
    }

    /// Search from a shared link's query string.
    pub async fn search_link(
        &self,
        query_string: &str,
        limit: Option<usize>,
    ) -> BackendResult<SearchOutcome> {
        let state = decode_filters(query_string)?;
        self.search_form(&state.filters, state.sort, limit).await
    }

    /// Query string that reproduces a search.
    pub fn link_for(&self, form: &SearchFilters, sort: SortOrder) -> BackendResult<String> {
        Ok(encode_filters(form, sort)?)
    }

    pub async fn get(&self, id: &PropertyId) -> BackendResult<Property> {
        self.repo.get(id).await
    }
}
