//! Realty MCP Server - a Model Context Protocol server for a real-estate
//! listing marketplace.
//!
//! Listings, favorites, profiles and saved searches live in a hosted Postgres
//! backend reached through its REST interface. This crate turns the
//! marketplace's user actions into MCP tools.
//!
//! # Architecture
//!
//! - **config**: Configuration from environment variables
//! - **error**: Error types for backend, configuration and filter failures
//! - **domain**: Validated identifiers and contact fields
//! - **models**: Properties, saved properties, profiles and saved searches
//! - **query**: Backend query builder and predicate rendering
//! - **filters**: Search form to query predicate translation and link state
//! - **client**: HTTP client for the backend REST API
//! - **repositories**: Table access behind async traits
//! - **tools**: Search, favorites, listings, market, mortgage and display logic
//! - **services**: Input validation and signed-in user resolution
//! - **cache**: Time-based caching
//! - **metrics**: Request and activity counters
//! - **server**: MCP protocol server

pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod filters;
pub mod metrics;
pub mod models;
pub mod query;
pub mod repositories;
pub mod server;
pub mod services;
pub mod tools;

pub use cache::TimedCache;
pub use client::BackendClient;
pub use config::Config;
pub use error::{BackendError, ConfigError, FilterError};
pub use filters::{ListingCriteria, SearchFilters, SortOrder};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::{Profile, Property, SavedProperty, SavedSearch};
pub use query::Query;
pub use server::RealtyMcpServer;
pub use tools::{
    FavoriteTools, ListingTools, MarketSnapshot, MarketTools, MortgageBreakdown, MortgageInput,
    PropertySearchTools, ToggleOutcome,
};
