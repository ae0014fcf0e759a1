use crate::client::AsyncBackendClient;
use crate::domain::UserId;
use crate::error::{BackendError, BackendResult};
use crate::models::{NewSavedSearch, SavedSearch, SavedSearchUpdate};
use crate::query::Query;
use crate::repositories::traits::SavedSearchRepository;
use crate::repositories::{decode, decode_rows, first_row};
use async_trait::async_trait;
use std::sync::Arc;

const TABLE: &str = "saved_searches";

/// Saved search repository backed by the REST interface.
pub struct RestSavedSearchRepository {
    client: Arc<dyn AsyncBackendClient>,
}

impl RestSavedSearchRepository {
    pub fn new(client: Arc<dyn AsyncBackendClient>) -> Self {
        Self { client }
    }

    fn owned(user: &UserId, id: &str) -> Query {
        Query::table(TABLE)
            .eq("id", id)
            .eq("user_id", user.as_str())
    }
}

#[async_trait]
impl SavedSearchRepository for RestSavedSearchRepository {
    async fn list_for_user(&self, user: &UserId) -> BackendResult<Vec<SavedSearch>> {
        let query = Query::table(TABLE)
            .select("*")
            .eq("user_id", user.as_str())
            .order("created_at", false);
        decode_rows(self.client.select(&query).await?)
    }

    async fn get(&self, user: &UserId, id: &str) -> BackendResult<SavedSearch> {
        let query = Self::owned(user, id).select("*");
        decode(self.client.select_single(&query).await?)
    }

    async fn create(&self, user: &UserId, search: &NewSavedSearch) -> BackendResult<SavedSearch> {
        let rows = self
            .client
            .insert(TABLE, &search.to_row(user.as_str()))
            .await?;
        first_row(rows, "saved search")
    }

    async fn update(
        &self,
        user: &UserId,
        id: &str,
        changes: &SavedSearchUpdate,
    ) -> BackendResult<SavedSearch> {
        let body = serde_json::to_value(changes)?;
        let rows = self.client.update(&Self::owned(user, id), &body).await?;
        first_row(rows, "saved search")
    }

    async fn delete(&self, user: &UserId, id: &str) -> BackendResult<()> {
        match self.client.delete(&Self::owned(user, id)).await? {
            0 => Err(BackendError::NotFound("saved search".to_string())),
            _ => Ok(()),
        }
    }
}
