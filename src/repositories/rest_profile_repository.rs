use crate::client::AsyncBackendClient;
use crate::domain::UserId;
use crate::error::{BackendError, BackendResult};
use crate::models::{Profile, ProfileUpdate};
use crate::query::Query;
use crate::repositories::traits::ProfileRepository;
use crate::repositories::{decode, first_row};
use async_trait::async_trait;
use std::sync::Arc;

const TABLE: &str = "profiles";

/// Profile repository backed by the REST interface.
pub struct RestProfileRepository {
    client: Arc<dyn AsyncBackendClient>,
}

impl RestProfileRepository {
    pub fn new(client: Arc<dyn AsyncBackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileRepository for RestProfileRepository {
    async fn get(&self, user: &UserId) -> BackendResult<Option<Profile>> {
        let query = Query::table(TABLE).select("*").eq("id", user.as_str());
        match self.client.select_single(&query).await {
            Ok(row) => decode(row).map(Some),
            Err(BackendError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn insert(&self, profile: &Profile) -> BackendResult<Profile> {
        let body = serde_json::to_value(profile)?;
        first_row(self.client.insert(TABLE, &body).await?, "profile")
    }

    async fn upsert(
        &self,
        user: &UserId,
        update: &ProfileUpdate,
        updated_at: &str,
    ) -> BackendResult<Profile> {
        let body = update.to_row(user.as_str(), updated_at);
        first_row(self.client.upsert(TABLE, &body).await?, "profile")
    }
}
