use crate::client::AsyncBackendClient;
use crate::domain::{PropertyId, UserId};
use crate::error::{BackendError, BackendResult};
use crate::filters::{ListingCriteria, SortOrder};
use crate::models::property::{CARD_COLUMNS, DETAIL_COLUMNS};
use crate::models::{Property, PropertyDraft};
use crate::query::Query;
use crate::repositories::traits::PropertyRepository;
use crate::repositories::{decode, decode_rows, first_row};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

const TABLE: &str = "properties";
const IMAGES_TABLE: &str = "property_images";

/// Columns the market snapshot reads.
const MARKET_COLUMNS: &str = "id, price, property_type, city, state, bedrooms, status";

/// Property repository backed by the REST interface.
pub struct RestPropertyRepository {
    client: Arc<dyn AsyncBackendClient>,
}

impl RestPropertyRepository {
    pub fn new(client: Arc<dyn AsyncBackendClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PropertyRepository for RestPropertyRepository {
    async fn search(
        &self,
        criteria: &ListingCriteria,
        sort: SortOrder,
        limit: usize,
    ) -> BackendResult<Vec<Property>> {
        let query = criteria.apply(Query::table(TABLE).select(CARD_COLUMNS));
        let query = sort.apply(query).limit(limit);
        tracing::debug!("Searching listings: {}", query);
        decode_rows(self.client.select(&query).await?)
    }

    async fn count(&self, criteria: &ListingCriteria) -> BackendResult<u64> {
        let query = criteria.apply(Query::table(TABLE));
        self.client.count(&query).await
    }

    async fn get(&self, id: &PropertyId) -> BackendResult<Property> {
        let query = Query::table(TABLE)
            .select(DETAIL_COLUMNS)
            .eq("id", id.as_str());
        decode(self.client.select_single(&query).await?)
    }

    async fn list_for_owner(&self, owner: &UserId) -> BackendResult<Vec<Property>> {
        let query = Query::table(TABLE)
            .select(DETAIL_COLUMNS)
            .eq("user_id", owner.as_str())
            .order("created_at", false);
        decode_rows(self.client.select(&query).await?)
    }

    async fn create(&self, owner: &UserId, draft: &PropertyDraft) -> BackendResult<Property> {
        let rows = self
            .client
            .insert(TABLE, &draft.to_row(owner.as_str()))
            .await?;
        first_row(rows, "property")
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &PropertyId,
        draft: &PropertyDraft,
    ) -> BackendResult<Property> {
        let query = Query::table(TABLE)
            .eq("id", id.as_str())
            .eq("user_id", owner.as_str());
        let rows = self
            .client
            .update(&query, &draft.to_patch(owner.as_str()))
            .await?;
        first_row(rows, "property")
    }

    async fn delete(&self, owner: &UserId, id: &PropertyId) -> BackendResult<()> {
        let query = Query::table(TABLE)
            .eq("id", id.as_str())
            .eq("user_id", owner.as_str());
        match self.client.delete(&query).await? {
            0 => Err(BackendError::NotFound("property".to_string())),
            _ => Ok(()),
        }
    }

    async fn replace_images(
        &self,
        id: &PropertyId,
        urls: &[String],
        replace_existing: bool,
    ) -> BackendResult<()> {
        if replace_existing {
            let existing = Query::table(IMAGES_TABLE).eq("property_id", id.as_str());
            let removed = self.client.delete(&existing).await?;
            tracing::debug!("Removed {} images from property {}", removed, id);
        }

        if urls.is_empty() {
            return Ok(());
        }

        let rows: Vec<_> = urls
            .iter()
            .enumerate()
            .map(|(i, url)| {
                json!({
                    "property_id": id.as_str(),
                    "image_url": url,
                    "is_primary": i == 0,
                })
            })
            .collect();
        self.client
            .insert(IMAGES_TABLE, &serde_json::Value::Array(rows))
            .await?;
        Ok(())
    }

    async fn list_active(&self, limit: usize) -> BackendResult<Vec<Property>> {
        let query = Query::table(TABLE)
            .select(MARKET_COLUMNS)
            .eq("status", "active")
            .limit(limit);
        decode_rows(self.client.select(&query).await?)
    }
}
