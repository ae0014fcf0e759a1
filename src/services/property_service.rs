//! Listing search and detail service.

use super::parse_property_id;
use crate::domain::UserId;
use crate::error::{BackendError, BackendResult};
use crate::filters::{decode_filters, ListingCriteria, SearchFilters, SortOrder};
use crate::models::Property;
use crate::tools::display::{map_markers, MapView, PropertyCard};
use crate::tools::mortgage::{self, MortgageBreakdown, MortgageInput};
use crate::tools::{FavoriteTools, MarketOverview, MarketTools, PropertySearchTools};
use async_trait::async_trait;
use std::collections::HashSet;

/// Share of the price assumed as down payment for the detail page estimate.
const ESTIMATE_DOWN_PAYMENT: f64 = 0.2;

/// Images shown under the main photo on the detail page.
const GALLERY_SIZE: usize = 4;

/// A search as requested by a caller.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub filters: SearchFilters,
    /// A shared search link; when present it replaces `filters` and `sort`.
    pub link: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SearchResults {
    pub criteria: ListingCriteria,
    pub sort: SortOrder,
    pub cards: Vec<PropertyCard>,
    pub truncated: bool,
    /// Query string that reproduces this search
    pub link: String,
}

#[derive(Debug, Clone)]
pub struct PropertyDetails {
    pub property: Property,
    pub card: PropertyCard,
    pub gallery: Vec<String>,
    pub payment_estimate: MortgageBreakdown,
}

#[async_trait]
pub trait PropertyService: Send + Sync {
    async fn search(&self, request: SearchRequest) -> BackendResult<SearchResults>;

    async fn get_property(&self, id: &str) -> BackendResult<PropertyDetails>;

    fn build_search_link(&self, filters: &SearchFilters, sort: Option<&str>) -> BackendResult<String>;

    /// Markers for the listings a search returns.
    async fn map_markers(&self, request: SearchRequest) -> BackendResult<MapView>;

    async fn market_overview(&self, refresh: bool) -> BackendResult<MarketOverview>;
}

pub struct PropertyServiceImpl {
    search_tools: PropertySearchTools,
    favorite_tools: FavoriteTools,
    market_tools: MarketTools,
    user: Option<UserId>,
}

impl PropertyServiceImpl {
    pub fn new(
        search_tools: PropertySearchTools,
        favorite_tools: FavoriteTools,
        market_tools: MarketTools,
        user: Option<UserId>,
    ) -> Self {
        Self {
            search_tools,
            favorite_tools,
            market_tools,
            user,
        }
    }

    fn validate_limit(limit: Option<usize>) -> BackendResult<()> {
        if limit == Some(0) {
            return Err(BackendError::InvalidRequest(
                "Limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the form and sort, preferring a shared link.
    fn resolve(request: &SearchRequest) -> BackendResult<(SearchFilters, SortOrder)> {
        match request.link.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
            Some(link) => {
                let query = link.split_once('?').map_or(link, |(_, q)| q);
                let state = decode_filters(query)?;
                Ok((state.filters, state.sort))
            }
            None => Ok((
                request.filters.clone(),
                SortOrder::parse_optional(request.sort.as_deref())?,
            )),
        }
    }

    /// Saved ids for the signed-in user; empty when signed out or on failure.
    async fn saved_ids(&self) -> Option<HashSet<String>> {
        let user = self.user.as_ref()?;
        match self.favorite_tools.saved_ids(user).await {
            Ok(ids) => Some(ids),
            Err(e) => {
                tracing::warn!("Error fetching saved properties: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl PropertyService for PropertyServiceImpl {
    async fn search(&self, request: SearchRequest) -> BackendResult<SearchResults> {
        Self::validate_limit(request.limit)?;
        let (filters, sort) = Self::resolve(&request)?;

        let outcome = self
            .search_tools
            .search_form(&filters, sort, request.limit)
            .await?;
        let saved = self.saved_ids().await;

        let cards = outcome
            .properties
            .iter()
            .map(|p| {
                let card = PropertyCard::from(p);
                match &saved {
                    Some(ids) => card.with_saved(ids.contains(&p.id)),
                    None => card,
                }
            })
            .collect();

        Ok(SearchResults {
            link: self.search_tools.link_for(&filters, sort)?,
            criteria: outcome.criteria,
            sort,
            cards,
            truncated: outcome.truncated,
        })
    }

    async fn get_property(&self, id: &str) -> BackendResult<PropertyDetails> {
        let id = parse_property_id(id)?;
        let property = self.search_tools.get(&id).await?;

        let mut card = PropertyCard::from(&property);
        if let Some(user) = &self.user {
            if let Ok(saved) = self.favorite_tools.is_saved(user, &id).await {
                card = card.with_saved(saved);
            }
        }

        let payment_estimate = mortgage::calculate(&MortgageInput {
            home_price: property.price,
            down_payment: property.price * ESTIMATE_DOWN_PAYMENT,
            ..MortgageInput::default()
        });

        Ok(PropertyDetails {
            gallery: property.gallery_urls(GALLERY_SIZE),
            card,
            payment_estimate,
            property,
        })
    }

    fn build_search_link(&self, filters: &SearchFilters, sort: Option<&str>) -> BackendResult<String> {
        let sort = SortOrder::parse_optional(sort)?;
        ListingCriteria::from_form(filters)?;
        self.search_tools.link_for(filters, sort)
    }

    async fn map_markers(&self, request: SearchRequest) -> BackendResult<MapView> {
        Self::validate_limit(request.limit)?;
        let (filters, sort) = Self::resolve(&request)?;
        let outcome = self
            .search_tools
            .search_form(&filters, sort, request.limit)
            .await?;
        Ok(map_markers(&outcome.properties))
    }

    async fn market_overview(&self, refresh: bool) -> BackendResult<MarketOverview> {
        self.market_tools.overview(refresh).await
    }
}

