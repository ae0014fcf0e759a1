//! MCP tool handlers for the realty server.
//!
//! This module implements all the MCP tools using the rmcp SDK's tool_router pattern.

use crate::client::AsyncBackendClient;
use crate::config::Config;
use crate::error::BackendError;
use crate::filters::SearchFilters;
use crate::models::{NewSavedSearch, ProfileUpdate, PropertyDraft, PropertyStatus, SavedSearchFilters};
use crate::repositories::{
    ProfileRepository, PropertyRepository, SavedPropertyRepository, SavedSearchRepository,
};
use crate::services::{
    AccountService, AccountServiceImpl, FavoriteService, FavoriteServiceImpl, ListingService,
    ListingServiceImpl, PropertyService, PropertyServiceImpl, SavedSearchRun, SearchRequest,
};
use crate::tools::display::PropertyCard;
use crate::tools::mortgage::{self, MortgageInput};
use crate::tools::{FavoriteTools, ListingTools, MarketTools, PropertySearchTools};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;

/// The realty MCP server that exposes listing search, favorites, the owner
/// dashboard and the account pages as tools.
#[derive(Clone)]
pub struct RealtyMcpServer {
    property_service: Arc<dyn PropertyService>,
    favorite_service: Arc<dyn FavoriteService>,
    listing_service: Arc<dyn ListingService>,
    account_service: Arc<dyn AccountService>,
    client: Arc<dyn AsyncBackendClient>,
    tool_router: ToolRouter<Self>,
}

#[tool_handler]
impl ServerHandler for RealtyMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(Default::default()),
                ..Default::default()
            },
            server_info: Implementation {
                name: "realty-mcp-server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                title: None,
                website_url: None,
            },
            instructions: Some("MCP server for a real-estate listing marketplace - search and filter listings, save favorites, manage your own listings and saved searches, estimate mortgage payments and review market statistics.".into()),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SearchPropertiesParams {
    /// City, state or part of the title
    #[serde(default)]
    location: Option<String>,
    /// house, condo, apartment, villa, townhouse or "any"
    #[serde(default)]
    property_type: Option<String>,
    /// "min-max", "min+" or "any", e.g. "500000-1000000"
    #[serde(default)]
    price_range: Option<String>,
    /// Minimum bedrooms, e.g. "3" or "3+"
    #[serde(default)]
    bedrooms: Option<String>,
    /// created_at (newest), price_low or price_high
    #[serde(default)]
    sort: Option<String>,
    /// A search link (`filters=...&sort=...`); replaces the other filters
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    limit: Option<usize>,
}

impl SearchPropertiesParams {
    fn filters(&self) -> SearchFilters {
        let field = |v: &Option<String>| v.clone().unwrap_or_default();
        SearchFilters {
            location: field(&self.location),
            property_type: field(&self.property_type),
            price_range: field(&self.price_range),
            bedrooms: field(&self.bedrooms),
        }
    }

    fn into_request(self) -> SearchRequest {
        SearchRequest {
            filters: self.filters(),
            link: self.link,
            sort: self.sort,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct PropertyIdParams {
    property_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SavedIdParams {
    saved_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SavedSearchIdParams {
    search_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct ListingParams {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    price: Option<f64>,
    #[serde(default)]
    property_type: Option<String>,
    #[serde(default)]
    bedrooms: Option<u32>,
    #[serde(default)]
    bathrooms: Option<f64>,
    #[serde(default)]
    square_feet: Option<u64>,
    #[serde(default)]
    address: String,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    #[serde(default)]
    zip_code: String,
    /// active, pending, sold or inactive
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    featured: Option<bool>,
    #[serde(default)]
    latitude: Option<f64>,
    #[serde(default)]
    longitude: Option<f64>,
    /// Image URLs; the first becomes the primary photo
    #[serde(default)]
    image_urls: Vec<String>,
}

impl ListingParams {
    fn into_draft(self) -> Result<PropertyDraft, BackendError> {
        let status = match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(raw.parse::<PropertyStatus>().map_err(BackendError::InvalidRequest)?),
            None => None,
        };
        Ok(PropertyDraft {
            title: self.title,
            description: self.description,
            price: self.price,
            property_type: self.property_type,
            bedrooms: self.bedrooms,
            bathrooms: self.bathrooms,
            square_feet: self.square_feet,
            address: self.address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            status,
            featured: self.featured,
            latitude: self.latitude,
            longitude: self.longitude,
            image_urls: self.image_urls,
        })
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateListingParams {
    property_id: String,
    #[serde(flatten)]
    listing: ListingParams,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct UpdateProfileParams {
    full_name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    /// buyer, seller or agent
    #[serde(default)]
    user_type: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SaveSearchParams {
    name: String,
    /// Free-text description of the search
    #[serde(default)]
    query: Option<String>,
    #[serde(default)]
    min_price: Option<f64>,
    #[serde(default)]
    max_price: Option<f64>,
    #[serde(default)]
    bedrooms: Option<u32>,
    #[serde(default)]
    property_type: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    notifications: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct BuildSearchLinkParams {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    property_type: Option<String>,
    #[serde(default)]
    price_range: Option<String>,
    #[serde(default)]
    bedrooms: Option<String>,
    #[serde(default)]
    sort: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
struct MarketOverviewParams {
    /// Recompute instead of using the cached snapshot
    #[serde(default)]
    refresh: Option<bool>,
}

// Helper function to convert errors to MCP errors
fn to_mcp_error(e: impl std::fmt::Display) -> McpError {
    McpError {
        code: ErrorCode::INTERNAL_ERROR,
        message: Cow::from(e.to_string()),
        data: None,
    }
}

// Backend errors carry a user-facing message; bad input is reported as such
fn backend_error(e: BackendError) -> McpError {
    let code = match e {
        BackendError::InvalidRequest(_) => ErrorCode::INVALID_PARAMS,
        _ => ErrorCode::INTERNAL_ERROR,
    };
    McpError {
        code,
        message: Cow::from(e.user_message()),
        data: None,
    }
}

fn json_result(value: &serde_json::Value) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(value).map_err(to_mcp_error)?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn run_json(run: &SavedSearchRun) -> serde_json::Value {
    serde_json::json!({
        "search": run.search,
        "result_count": run.total_matches,
        "returned": run.outcome.properties.len(),
        "truncated": run.outcome.truncated,
        "results": run.outcome.properties.iter().map(PropertyCard::from).collect::<Vec<_>>(),
    })
}

#[tool_router]
impl RealtyMcpServer {
    /// Create a new realty MCP server.
    pub fn new(
        property_repo: Arc<dyn PropertyRepository>,
        saved_repo: Arc<dyn SavedPropertyRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        search_repo: Arc<dyn SavedSearchRepository>,
        client: Arc<dyn AsyncBackendClient>,
        config: &Config,
    ) -> Self {
        let metrics = client.metrics();

        // Favorites state and the market cache are shared between services
        let search_tools = PropertySearchTools::new(property_repo.clone(), config.max_search_results);
        let favorite_tools = FavoriteTools::new(saved_repo, metrics.clone());
        let market_tools = MarketTools::new(property_repo.clone(), config.market_cache_ttl_minutes);
        let listing_tools = ListingTools::new(property_repo, metrics);

        let property_service = Arc::new(PropertyServiceImpl::new(
            search_tools.clone(),
            favorite_tools.clone(),
            market_tools.clone(),
            config.user_id.clone(),
        )) as Arc<dyn PropertyService>;

        let favorite_service = Arc::new(FavoriteServiceImpl::new(
            favorite_tools,
            config.user_id.clone(),
        )) as Arc<dyn FavoriteService>;

        let listing_service = Arc::new(ListingServiceImpl::new(
            listing_tools,
            market_tools,
            config.user_id.clone(),
        )) as Arc<dyn ListingService>;

        let account_service = Arc::new(AccountServiceImpl::new(
            profile_repo,
            search_repo,
            search_tools,
            config.user_id.clone(),
            config.user_email.clone(),
        )) as Arc<dyn AccountService>;

        Self {
            property_service,
            favorite_service,
            listing_service,
            account_service,
            client,
            tool_router: Self::tool_router(),
        }
    }

    /// Request counters for the backend client.
    pub fn metrics(&self) -> crate::metrics::Metrics {
        self.client.metrics()
    }

    #[tool(
        description = "Search active listings by location, property type, price range and minimum bedrooms. Blank or \"any\" leaves a filter unset. Accepts a search link instead of individual filters. Returns listing cards and a link that reproduces the search."
    )]
    async fn search_properties(
        &self,
        params: Parameters<SearchPropertiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let results = self
            .property_service
            .search(params.0.into_request())
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "criteria": results.criteria,
            "sort": results.sort,
            "result_count": results.cards.len(),
            "truncated": results.truncated,
            "link": results.link,
            "results": results.cards,
        }))
    }

    #[tool(
        description = "Get the full details of a listing: all fields, image gallery, whether you saved it and an estimated monthly payment with 20% down"
    )]
    async fn get_property(
        &self,
        params: Parameters<PropertyIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let details = self
            .property_service
            .get_property(&params.0.property_id)
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "property": details.property,
            "card": details.card,
            "location": details.property.display_location(),
            "gallery": details.gallery,
            "payment_estimate": details.payment_estimate,
            "payment_summary": details.payment_estimate.describe(),
        }))
    }

    #[tool(description = "Build a shareable search link (query string) for a set of filters and a sort order")]
    async fn build_search_link(
        &self,
        params: Parameters<BuildSearchLinkParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let field = |v: Option<String>| v.unwrap_or_default();
        let filters = SearchFilters {
            location: field(params.location),
            property_type: field(params.property_type),
            price_range: field(params.price_range),
            bedrooms: field(params.bedrooms),
        };
        let link = self
            .property_service
            .build_search_link(&filters, params.sort.as_deref())
            .map_err(backend_error)?;

        json_result(&serde_json::json!({ "link": link }))
    }

    #[tool(
        description = "Save a listing to your favorites, or remove it if already saved. Repeated calls while a request is pending are ignored."
    )]
    async fn toggle_favorite(
        &self,
        params: Parameters<PropertyIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let outcome = self
            .favorite_service
            .toggle(&params.0.property_id)
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "property_id": params.0.property_id,
            "saved": outcome.is_saved(),
            "message": outcome.message(),
        }))
    }

    #[tool(description = "List your saved properties with their listing details")]
    async fn list_favorites(&self) -> Result<CallToolResult, McpError> {
        let saved = self.favorite_service.list().await.map_err(backend_error)?;

        json_result(&serde_json::json!({
            "count": saved.len(),
            "favorites": saved.iter().map(|s| serde_json::json!({
                "saved_id": s.id,
                "property_id": s.property_id,
                "saved_at": s.created_at,
                "card": s.property.as_ref().map(PropertyCard::from),
            })).collect::<Vec<_>>(),
        }))
    }

    #[tool(description = "Remove a saved property by its saved-property id (from list_favorites)")]
    async fn remove_favorite(
        &self,
        params: Parameters<SavedIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.favorite_service
            .remove(&params.0.saved_id)
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "saved_id": params.0.saved_id,
            "message": "Property removed from favorites",
        }))
    }

    #[tool(description = "List the listings you own, newest first")]
    async fn list_my_listings(&self) -> Result<CallToolResult, McpError> {
        let listings = self
            .listing_service
            .list_mine()
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "count": listings.len(),
            "listings": listings.iter().map(|p| serde_json::json!({
                "card": PropertyCard::from(p),
                "status": p.status,
                "created_at": p.created_at,
            })).collect::<Vec<_>>(),
        }))
    }

    #[tool(
        description = "Create a listing. Requires title, property type, price, bedrooms, bathrooms, address, city, state and ZIP code. The first image URL becomes the primary photo."
    )]
    async fn create_listing(
        &self,
        params: Parameters<ListingParams>,
    ) -> Result<CallToolResult, McpError> {
        let draft = params.0.into_draft().map_err(backend_error)?;
        let property = self
            .listing_service
            .create(draft)
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "message": "Property created successfully",
            "property": property,
        }))
    }

    #[tool(
        description = "Update one of your listings. Supplying image URLs replaces the existing images; leaving them out keeps them."
    )]
    async fn update_listing(
        &self,
        params: Parameters<UpdateListingParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let draft = params.listing.into_draft().map_err(backend_error)?;
        let property = self
            .listing_service
            .update(&params.property_id, draft)
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "message": "Property updated successfully",
            "property": property,
        }))
    }

    #[tool(description = "Delete one of your listings")]
    async fn delete_listing(
        &self,
        params: Parameters<PropertyIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.listing_service
            .delete(&params.0.property_id)
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "property_id": params.0.property_id,
            "message": "Property deleted successfully",
        }))
    }

    #[tool(description = "Get your profile, creating a blank buyer profile on first use")]
    async fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let profile = self
            .account_service
            .profile()
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "profile": profile,
            "initials": profile.initials(),
        }))
    }

    #[tool(description = "Update your name, email, phone and account type (buyer, seller or agent)")]
    async fn update_profile(
        &self,
        params: Parameters<UpdateProfileParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let profile = self
            .account_service
            .update_profile(ProfileUpdate {
                full_name: params.full_name,
                email: params.email,
                phone: params.phone,
                user_type: params.user_type,
            })
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "message": "Profile updated successfully",
            "profile": profile,
        }))
    }

    #[tool(description = "List your saved searches, newest first")]
    async fn list_saved_searches(&self) -> Result<CallToolResult, McpError> {
        let searches = self
            .account_service
            .list_saved_searches()
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "count": searches.len(),
            "searches": searches.iter().map(|s| serde_json::json!({
                "search": s,
                "badges": s.filters.badges(),
            })).collect::<Vec<_>>(),
        }))
    }

    #[tool(description = "Save a search with optional price, bedroom, type and location criteria")]
    async fn save_search(
        &self,
        params: Parameters<SaveSearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let search = self
            .account_service
            .save_search(NewSavedSearch {
                name: params.name,
                query: params.query.unwrap_or_default(),
                filters: SavedSearchFilters {
                    min_price: params.min_price,
                    max_price: params.max_price,
                    bedrooms: params.bedrooms,
                    property_type: params.property_type,
                    location: params.location,
                },
                notifications: params.notifications.unwrap_or(false),
            })
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "message": "Search saved",
            "search": search,
        }))
    }

    #[tool(description = "Turn new-listing notifications for a saved search on or off")]
    async fn toggle_search_notifications(
        &self,
        params: Parameters<SavedSearchIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let search = self
            .account_service
            .toggle_notifications(&params.0.search_id)
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "search_id": search.id,
            "notifications": search.notifications,
        }))
    }

    #[tool(description = "Run a saved search now and record its result count and run date")]
    async fn run_saved_search(
        &self,
        params: Parameters<SavedSearchIdParams>,
    ) -> Result<CallToolResult, McpError> {
        let run = self
            .account_service
            .run_saved_search(&params.0.search_id)
            .await
            .map_err(backend_error)?;

        json_result(&run_json(&run))
    }

    #[tool(description = "Delete a saved search")]
    async fn delete_saved_search(
        &self,
        params: Parameters<SavedSearchIdParams>,
    ) -> Result<CallToolResult, McpError> {
        self.account_service
            .delete_saved_search(&params.0.search_id)
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "search_id": params.0.search_id,
            "message": "Saved search deleted",
        }))
    }

    #[tool(description = "Re-run every saved search that has notifications turned on")]
    async fn refresh_saved_searches(&self) -> Result<CallToolResult, McpError> {
        let runs = self
            .account_service
            .refresh_notifying()
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "refreshed": runs.len(),
            "searches": runs.iter().map(|r| serde_json::json!({
                "search_id": r.search.id,
                "name": r.search.name,
                "results_count": r.search.results_count,
                "last_run": r.search.last_run,
            })).collect::<Vec<_>>(),
        }))
    }

    #[tool(
        description = "Estimate a fixed-rate mortgage payment. Defaults: $500,000 price, $100,000 down, 30 years, 6.5% interest."
    )]
    async fn calculate_mortgage(
        &self,
        params: Parameters<MortgageInput>,
    ) -> Result<CallToolResult, McpError> {
        let input = params.0;
        let breakdown = mortgage::calculate(&input);

        json_result(&serde_json::json!({
            "input": input,
            "breakdown": breakdown,
            "summary": breakdown.describe(),
        }))
    }

    #[tool(
        description = "Market statistics over active listings: average and median price, price distribution, share by property type and per-city averages"
    )]
    async fn market_overview(
        &self,
        params: Parameters<MarketOverviewParams>,
    ) -> Result<CallToolResult, McpError> {
        let overview = self
            .property_service
            .market_overview(params.0.refresh.unwrap_or(false))
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::json!({
            "snapshot": overview.snapshot.as_ref(),
            "summary": overview.snapshot.describe(),
            "from_cache": overview.from_cache,
        }))
    }

    #[tool(description = "Map markers for the listings a search returns, with the map center")]
    async fn map_markers(
        &self,
        params: Parameters<SearchPropertiesParams>,
    ) -> Result<CallToolResult, McpError> {
        let view = self
            .property_service
            .map_markers(params.0.into_request())
            .await
            .map_err(backend_error)?;

        json_result(&serde_json::to_value(&view).map_err(to_mcp_error)?)
    }
}
