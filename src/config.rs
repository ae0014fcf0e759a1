//! Configuration management for the Realty MCP Server.
//!
//! This module handles loading and validating configuration from environment variables.
//! Nothing here writes to stdout, which MCP uses for communication.

use crate::domain::UserId;
use crate::error::{ConfigError, ConfigResult};
use std::env;

/// Configuration for the Realty MCP Server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend project URL (the REST API lives under `/rest/v1`)
    pub backend_url: String,

    /// Public API key sent as the `apikey` header
    pub backend_key: String,

    /// Bearer token for the signed-in user (defaults to the API key)
    pub access_token: Option<String>,

    /// Signed-in user, if any
    pub user_id: Option<UserId>,

    /// Email of the signed-in user, used when creating a fresh profile
    pub user_email: Option<String>,

    /// HTTP request timeout in seconds (default: 10)
    pub request_timeout: u64,

    /// How long a computed market snapshot stays fresh, in minutes (default: 15)
    pub market_cache_ttl_minutes: u64,

    /// Upper bound on rows returned by a listing search (default: 100)
    pub max_search_results: usize,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `REALTY_BACKEND_URL`: Base URL of the backend project
    /// - `REALTY_BACKEND_KEY`: Public API key
    ///
    /// Optional environment variables:
    /// - `REALTY_ACCESS_TOKEN`: Bearer token for the signed-in user
    /// - `REALTY_USER_ID`: Signed-in user id
    /// - `REALTY_USER_EMAIL`: Signed-in user email
    /// - `REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 10)
    /// - `MARKET_CACHE_TTL_MINUTES`: Market snapshot TTL (default: 15)
    /// - `MAX_SEARCH_RESULTS`: Row cap for searches, 1-1000 (default: 100)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // dotenvy::dotenv() doesn't print to stdout
        let _ = dotenvy::dotenv();

        let backend_url = env::var("REALTY_BACKEND_URL")
            .map_err(|_| ConfigError::MissingVar("REALTY_BACKEND_URL".to_string()))?;

        let backend_key = env::var("REALTY_BACKEND_KEY")
            .map_err(|_| ConfigError::MissingVar("REALTY_BACKEND_KEY".to_string()))?;

        if !backend_url.starts_with("http://") && !backend_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "REALTY_BACKEND_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        if backend_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "REALTY_BACKEND_KEY".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let access_token = Self::optional_var("REALTY_ACCESS_TOKEN");
        let user_email = Self::optional_var("REALTY_USER_EMAIL");
        let user_id = match Self::optional_var("REALTY_USER_ID") {
            Some(raw) => Some(UserId::new(raw).map_err(|e| ConfigError::InvalidValue {
                var: "REALTY_USER_ID".to_string(),
                reason: e.to_string(),
            })?),
            None => None,
        };

        let request_timeout = Self::parse_env_u64("REQUEST_TIMEOUT", 10)?;
        let market_cache_ttl_minutes = Self::parse_env_u64("MARKET_CACHE_TTL_MINUTES", 15)?;
        let max_search_results = Self::parse_env_usize("MAX_SEARCH_RESULTS", 100)?;

        if max_search_results == 0 || max_search_results > 1000 {
            return Err(ConfigError::InvalidValue {
                var: "MAX_SEARCH_RESULTS".to_string(),
                reason: "Must be between 1 and 1000".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            backend_url,
            backend_key,
            access_token,
            user_id,
            user_email,
            request_timeout,
            market_cache_ttl_minutes,
            max_search_results,
            log_level,
        })
    }

    /// Token sent in the `Authorization` header.
    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.backend_key)
    }

    /// Read a variable, treating blank values as unset.
    fn optional_var(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as usize with a default value.
    fn parse_env_usize(var_name: &str, default: usize) -> ConfigResult<usize> {
        match env::var(var_name) {
            Ok(val) => val.parse::<usize>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: String::new(),
            backend_key: String::new(),
            access_token: None,
            user_id: None,
            user_email: None,
            request_timeout: 10,
            market_cache_ttl_minutes: 15,
            max_search_results: 100,
            log_level: "error".to_string(),
        }
    }
}
