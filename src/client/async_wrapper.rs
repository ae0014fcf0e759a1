//! Async wrapper around the synchronous BackendClient.
//!
//! This module provides an async interface to the synchronous BackendClient by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::BackendClient;
use crate::error::{BackendError, BackendResult};
use crate::metrics::Metrics;
use crate::query::Query;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Async version of the backend's query/command interface.
///
/// Rows travel as raw JSON; repositories decode them into models.
#[async_trait]
pub trait AsyncBackendClient: Send + Sync {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>>;
    async fn select_single(&self, query: &Query) -> BackendResult<Value>;
    async fn insert(&self, table: &str, body: &Value) -> BackendResult<Vec<Value>>;
    async fn upsert(&self, table: &str, body: &Value) -> BackendResult<Vec<Value>>;
    async fn update(&self, query: &Query, body: &Value) -> BackendResult<Vec<Value>>;
    async fn delete(&self, query: &Query) -> BackendResult<usize>;
    async fn count(&self, query: &Query) -> BackendResult<u64>;

    fn metrics(&self) -> Metrics;
}

#[derive(Clone)]
pub struct AsyncBackendClientImpl {
    client: Arc<BackendClient>,
}

impl AsyncBackendClientImpl {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

fn join_error(e: tokio::task::JoinError) -> BackendError {
    BackendError::HttpError(format!("Task join error: {}", e))
}

#[async_trait]
impl AsyncBackendClient for AsyncBackendClientImpl {
    async fn select(&self, query: &Query) -> BackendResult<Vec<Value>> {
        let client = self.client.clone();
        let query = query.clone();

        tokio::task::spawn_blocking(move || client.select(&query))
            .await
            .map_err(join_error)?
    }

    async fn select_single(&self, query: &Query) -> BackendResult<Value> {
        let client = self.client.clone();
        let query = query.clone();

        tokio::task::spawn_blocking(move || client.select_single(&query))
            .await
            .map_err(join_error)?
    }

    async fn insert(&self, table: &str, body: &Value) -> BackendResult<Vec<Value>> {
        let client = self.client.clone();
        let table = table.to_string();
        let body = body.clone();

        tokio::task::spawn_blocking(move || client.insert(&table, &body))
            .await
            .map_err(join_error)?
    }

    async fn upsert(&self, table: &str, body: &Value) -> BackendResult<Vec<Value>> {
        let client = self.client.clone();
        let table = table.to_string();
        let body = body.clone();

        tokio::task::spawn_blocking(move || client.upsert(&table, &body))
            .await
            .map_err(join_error)?
    }

    async fn update(&self, query: &Query, body: &Value) -> BackendResult<Vec<Value>> {
        let client = self.client.clone();
        let query = query.clone();
        let body = body.clone();

        tokio::task::spawn_blocking(move || client.update(&query, &body))
            .await
            .map_err(join_error)?
    }

    async fn delete(&self, query: &Query) -> BackendResult<usize> {
        let client = self.client.clone();
        let query = query.clone();

        tokio::task::spawn_blocking(move || client.delete(&query))
            .await
            .map_err(join_error)?
    }

    async fn count(&self, query: &Query) -> BackendResult<u64> {
        let client = self.client.clone();
        let query = query.clone();

        tokio::task::spawn_blocking(move || client.count(&query))
            .await
            .map_err(join_error)?
    }

    fn metrics(&self) -> Metrics {
        self.client.metrics().clone()
    }
}
