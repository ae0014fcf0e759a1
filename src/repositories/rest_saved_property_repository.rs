use crate::client::AsyncBackendClient;
use crate::domain::{PropertyId, UserId};
use crate::error::BackendResult;
use crate::models::saved_property::SAVED_PROPERTY_COLUMNS;
use crate::models::SavedProperty;
use crate::query::Query;
use crate::repositories::traits::SavedPropertyRepository;
use crate::repositories::{decode_rows, first_row};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

const TABLE: &str = "saved_properties";

#[derive(Deserialize)]
struct PropertyIdRow {
    property_id: String,
}

/// Favorites repository backed by the REST interface.
pub struct RestSavedPropertyRepository {
    client: Arc<dyn AsyncBackendClient>,
}

impl RestSavedPropertyRepository {
    pub fn new(client: Arc<dyn AsyncBackendClient>) -> Self {
        Self { client }
    }

    fn pair(user: &UserId, property: &PropertyId) -> Query {
        Query::table(TABLE)
            .eq("user_id", user.as_str())
            .eq("property_id", property.as_str())
    }
}

#[async_trait]
impl SavedPropertyRepository for RestSavedPropertyRepository {
    async fn ids_for_user(&self, user: &UserId) -> BackendResult<Vec<String>> {
        let query = Query::table(TABLE)
            .select("property_id")
            .eq("user_id", user.as_str());
        let rows: Vec<PropertyIdRow> = decode_rows(self.client.select(&query).await?)?;
        Ok(rows.into_iter().map(|r| r.property_id).collect())
    }

    async fn list_for_user(&self, user: &UserId) -> BackendResult<Vec<SavedProperty>> {
        let query = Query::table(TABLE)
            .select(SAVED_PROPERTY_COLUMNS)
            .eq("user_id", user.as_str())
            .order("created_at", false);
        decode_rows(self.client.select(&query).await?)
    }

    async fn exists(&self, user: &UserId, property: &PropertyId) -> BackendResult<bool> {
        let query = Self::pair(user, property).select("id").limit(1);
        Ok(!self.client.select(&query).await?.is_empty())
    }

    async fn insert(&self, user: &UserId, property: &PropertyId) -> BackendResult<SavedProperty> {
        let body = json!({
            "user_id": user.as_str(),
            "property_id": property.as_str(),
        });
        first_row(self.client.insert(TABLE, &body).await?, "saved property")
    }

    async fn delete_pair(&self, user: &UserId, property: &PropertyId) -> BackendResult<usize> {
        self.client.delete(&Self::pair(user, property)).await
    }

    async fn delete_by_id(&self, user: &UserId, saved_id: &str) -> BackendResult<usize> {
        let query = Query::table(TABLE)
            .eq("id", saved_id)
            .eq("user_id", user.as_str());
        self.client.delete(&query).await
    }
}
