//! Owner dashboard service.

use super::{parse_property_id, require_user};
use crate::domain::UserId;
use crate::error::BackendResult;
use crate::models::{Property, PropertyDraft};
use crate::tools::{ListingTools, MarketTools};
use async_trait::async_trait;

const SIGN_IN_MESSAGE: &str = "Please sign in to manage your listings.";

#[async_trait]
pub trait ListingService: Send + Sync {
    /// The signed-in user's listings, newest first.
    async fn list_mine(&self) -> BackendResult<Vec<Property>>;

    async fn create(&self, draft: PropertyDraft) -> BackendResult<Property>;

    async fn update(&self, property_id: &str, draft: PropertyDraft) -> BackendResult<Property>;

    async fn delete(&self, property_id: &str) -> BackendResult<()>;
}

pub struct ListingServiceImpl {
    tools: ListingTools,
    market: MarketTools,
    user: Option<UserId>,
}

impl ListingServiceImpl {
    /// `market` is invalidated after every write.
    pub fn new(tools: ListingTools, market: MarketTools, user: Option<UserId>) -> Self {
        Self {
            tools,
            market,
            user,
        }
    }

    fn user(&self) -> BackendResult<&UserId> {
        require_user(&self.user, SIGN_IN_MESSAGE)
    }

    fn clean_images(draft: &mut PropertyDraft) {
        draft.image_urls = draft
            .image_urls
            .iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
    }
}

#[async_trait]
impl ListingService for ListingServiceImpl {
    async fn list_mine(&self) -> BackendResult<Vec<Property>> {
        let user = self.user()?;
        self.tools.list(user).await
    }

    async fn create(&self, mut draft: PropertyDraft) -> BackendResult<Property> {
        let user = self.user()?;
        draft.validate()?;
        Self::clean_images(&mut draft);

        let property = self.tools.create(user, &draft).await?;
        self.market.invalidate();
        Ok(property)
    }

    async fn update(&self, property_id: &str, mut draft: PropertyDraft) -> BackendResult<Property> {
        let user = self.user()?;
        let id = parse_property_id(property_id)?;
        draft.validate()?;
        Self::clean_images(&mut draft);

        let property = self.tools.update(user, &id, &draft).await?;
        self.market.invalidate();
        Ok(property)
    }

    async fn delete(&self, property_id: &str) -> BackendResult<()> {
        let user = self.user()?;
        let id = parse_property_id(property_id)?;
        self.tools.delete(user, &id).await?;
        self.market.invalidate();
        Ok(())
    }
}
