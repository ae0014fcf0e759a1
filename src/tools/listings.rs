//! The owner dashboard: a user's own listings and their images.

use crate::domain::{PropertyId, UserId};
use crate::error::BackendResult;
use crate::metrics::Metrics;
use crate::models::{Property, PropertyDraft, PropertyImage};
use crate::repositories::PropertyRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct ListingTools {
    repo: Arc<dyn PropertyRepository>,
    metrics: Metrics,
}

fn image_rows(urls: &[String]) -> Vec<PropertyImage> {
    urls.iter()
        .enumerate()
        .map(|(i, url)| PropertyImage {
            image_url: url.clone(),
            is_primary: i == 0,
            caption: None,
        })
        .collect()
}

impl ListingTools {
    pub fn new(repo: Arc<dyn PropertyRepository>, metrics: Metrics) -> Self {
        Self { repo, metrics }
    }

    pub async fn list(&self, owner: &UserId) -> BackendResult<Vec<Property>> {
        self.repo.list_for_owner(owner).await
    }

    /// Create a listing, then attach its images with the first as primary.
    pub async fn create(&self, owner: &UserId, draft: &PropertyDraft) -> BackendResult<Property> {
        let mut property = self.repo.create(owner, draft).await?;
        let id = PropertyId::new(property.id.as_str())?;

        if !draft.image_urls.is_empty() {
            self.repo.replace_images(&id, &draft.image_urls, false).await?;
            property.property_images = image_rows(&draft.image_urls);
        }

        self.metrics.record_listing_written();
        tracing::info!("Created listing {} for {}", id, owner);
        Ok(property)
    }

    /// Update a listing. A non-empty image list replaces the current images;
    /// an empty one leaves them untouched.
    pub async fn update(
        &self,
        owner: &UserId,
        id: &PropertyId,
        draft: &PropertyDraft,
    ) -> BackendResult<Property> {
        let mut property = self.repo.update(owner, id, draft).await?;

        if !draft.image_urls.is_empty() {
            self.repo.replace_images(id, &draft.image_urls, true).await?;
            property.property_images = image_rows(&draft.image_urls);
        }

        self.metrics.record_listing_written();
        tracing::info!("Updated listing {}", id);
        Ok(property)
    }

    pub async fn delete(&self, owner: &UserId, id: &PropertyId) -> BackendResult<()> {
        self.repo.delete(owner, id).await?;
        self.metrics.record_listing_written();
        tracing::info!("Deleted listing {}", id);
        Ok(())
    }
}
