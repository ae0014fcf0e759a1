//! HTTP client for the listing backend's REST interface.
//!
//! This module provides a synchronous client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. Every table lives under `/rest/v1/<table>`;
//! reads are driven by a [`Query`], writes send JSON bodies and ask for the
//! affected rows back.

mod async_wrapper;
pub use async_wrapper::{AsyncBackendClient, AsyncBackendClientImpl};

use crate::config::Config;
use crate::error::{BackendError, BackendResult};
use crate::metrics::{HttpTimer, Metrics};
use crate::query::Query;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Path prefix of the REST interface.
const REST_PREFIX: &str = "rest/v1";

/// Media type asking for exactly one row as an object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Error code reported when a single-row read matched nothing.
const NO_ROWS_CODE: &str = "PGRST116";

/// Error body returned by the backend.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

/// HTTP client for the listing backend.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`.
#[derive(Clone)]
pub struct BackendClient {
    base_url: String,

    /// Sent as the `apikey` header
    api_key: String,

    /// Sent as `Authorization: Bearer <token>`
    bearer_token: String,

    agent: Arc<ureq::Agent>,

    metrics: Metrics,
}

impl BackendClient {
    pub fn new(config: &Config) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.request_timeout))
            .build();

        Self {
            base_url: config.backend_url.clone(),
            api_key: config.backend_key.clone(),
            bearer_token: config.bearer_token().to_string(),
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Create a client with a custom base URL (useful for testing).
    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: String) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();

        Self {
            base_url,
            bearer_token: api_key.clone(),
            api_key,
            agent: Arc::new(agent),
            metrics: Metrics::new(),
        }
    }

    /// Share an existing metrics collector instead of the client's own.
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn table_url(&self, table: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            REST_PREFIX,
            table.trim_start_matches('/')
        )
    }

    /// Start a request with authentication headers and the query's parameters.
    fn request(&self, method: &str, table: &str, params: &[(String, String)]) -> ureq::Request {
        let mut request = self
            .agent
            .request(method, &self.table_url(table))
            .set("apikey", &self.api_key)
            .set("Authorization", &format!("Bearer {}", self.bearer_token))
            .set("Content-Type", "application/json");

        for (key, value) in params {
            request = request.query(key, value);
        }
        request
    }

    /// Send a request, timing it and mapping failures.
    fn execute(
        &self,
        request: ureq::Request,
        table: &str,
        body: Option<&Value>,
    ) -> BackendResult<ureq::Response> {
        let method = request.method().to_string();
        tracing::debug!("{} {}", method, request.url());

        let timer = HttpTimer::new(self.metrics.clone());
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                timer.complete();
                Ok(response)
            }
            Err(e) => {
                timer.complete_with_error();
                let err = self.map_error(e, table);
                tracing::error!("{} {} failed: {}", method, table, err);
                Err(err)
            }
        }
    }

    /// Map a ureq error to a BackendError.
    fn map_error(&self, error: ureq::Error, table: &str) -> BackendError {
        match error {
            ureq::Error::Status(status, response) => {
                let raw = response.into_string().unwrap_or_default();
                let body: ErrorBody = serde_json::from_str(&raw).unwrap_or_default();
                let message = body
                    .message
                    .or(body.details)
                    .unwrap_or_else(|| if raw.is_empty() { "Unknown error".to_string() } else { raw });

                match status {
                    401 | 403 => BackendError::Unauthorized,
                    404 => BackendError::NotFound(table.to_string()),
                    406 if body.code.as_deref() == Some(NO_ROWS_CODE) => {
                        BackendError::NotFound(table.to_string())
                    }
                    429 => BackendError::RateLimitExceeded,
                    _ => BackendError::ApiError {
                        status,
                        code: body.code,
                        message,
                    },
                }
            }
            ureq::Error::Transport(transport) => match transport.kind() {
                ureq::ErrorKind::ConnectionFailed => {
                    BackendError::HttpError("Connection failed".to_string())
                }
                ureq::ErrorKind::Io => BackendError::Timeout,
                _ => BackendError::HttpError(transport.to_string()),
            },
        }
    }

    fn read_rows(&self, response: ureq::Response) -> BackendResult<Vec<Value>> {
        let body = response
            .into_string()
            .map_err(|e| BackendError::HttpError(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let rows = match serde_json::from_str::<Value>(&body)? {
            Value::Array(rows) => rows,
            Value::Null => Vec::new(),
            row => vec![row],
        };
        Ok(rows)
    }

    /// Rows matching the query.
    pub fn select(&self, query: &Query) -> BackendResult<Vec<Value>> {
        let request = self.request("GET", query.table_name(), &query.to_params());
        let response = self.execute(request, query.table_name(), None)?;
        let rows = self.read_rows(response)?;
        self.metrics.record_rows_fetched(rows.len());
        Ok(rows)
    }

    /// Exactly one row matching the query; zero rows is `NotFound`.
    pub fn select_single(&self, query: &Query) -> BackendResult<Value> {
        let request = self
            .request("GET", query.table_name(), &query.to_params())
            .set("Accept", SINGLE_OBJECT);
        let response = self.execute(request, query.table_name(), None)?;
        let row = self
            .read_rows(response)?
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(query.table_name().to_string()))?;
        self.metrics.record_rows_fetched(1);
        Ok(row)
    }

    /// Number of rows the query's predicates match, however many there are.
    ///
    /// Asks for an exact count and reads the total from `Content-Range`.
    pub fn count(&self, query: &Query) -> BackendResult<u64> {
        let request = self
            .request("HEAD", query.table_name(), &query.filter_params())
            .set("Prefer", "count=exact");
        let response = self.execute(request, query.table_name(), None)?;
        let range = response.header("Content-Range").unwrap_or_default();
        parse_total(range).ok_or_else(|| {
            BackendError::HttpError(format!(
                "No row count for {} in Content-Range '{}'",
                query.table_name(),
                range
            ))
        })
    }

    /// Insert one row (object) or many (array); returns the stored rows.
    pub fn insert(&self, table: &str, body: &Value) -> BackendResult<Vec<Value>> {
        let request = self
            .request("POST", table, &[])
            .set("Prefer", "return=representation");
        let response = self.execute(request, table, Some(body))?;
        self.read_rows(response)
    }

    /// Insert, or merge into the row with the same primary key.
    pub fn upsert(&self, table: &str, body: &Value) -> BackendResult<Vec<Value>> {
        let request = self
            .request("POST", table, &[])
            .set("Prefer", "resolution=merge-duplicates,return=representation");
        let response = self.execute(request, table, Some(body))?;
        self.read_rows(response)
    }

    /// Patch every row the query's predicates match; returns the updated rows.
    pub fn update(&self, query: &Query, body: &Value) -> BackendResult<Vec<Value>> {
        let request = self
            .request("PATCH", query.table_name(), &query.filter_params())
            .set("Prefer", "return=representation");
        let response = self.execute(request, query.table_name(), Some(body))?;
        self.read_rows(response)
    }

    /// Delete every row the query's predicates match; returns how many went.
    ///
    /// A query without predicates is refused rather than emptying the table.
    pub fn delete(&self, query: &Query) -> BackendResult<usize> {
        if query.predicates().is_empty() {
            return Err(BackendError::InvalidRequest(format!(
                "Refusing to delete from {} without a filter",
                query.table_name()
            )));
        }
        let request = self
            .request("DELETE", query.table_name(), &query.filter_params())
            .set("Prefer", "return=representation");
        let response = self.execute(request, query.table_name(), None)?;
        Ok(self.read_rows(response)?.len())
    }
}

/// Total from a `Content-Range` value such as `0-23/40` or `*/0`.
fn parse_total(range: &str) -> Option<u64> {
    range.rsplit_once('/')?.1.trim().parse().ok()
}
