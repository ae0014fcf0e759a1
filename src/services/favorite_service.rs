//! Favorites service.

use super::{parse_property_id, require_user};
use crate::domain::UserId;
use crate::error::{BackendError, BackendResult};
use crate::models::SavedProperty;
use crate::tools::favorites::SIGN_IN_MESSAGE;
use crate::tools::{FavoriteTools, ToggleOutcome};
use async_trait::async_trait;

#[async_trait]
pub trait FavoriteService: Send + Sync {
    /// Save or unsave a listing for the signed-in user.
    async fn toggle(&self, property_id: &str) -> BackendResult<ToggleOutcome>;

    /// The signed-in user's favorites with their listings.
    async fn list(&self) -> BackendResult<Vec<SavedProperty>>;

    /// Remove a favorite by the favorite's own id.
    async fn remove(&self, saved_id: &str) -> BackendResult<()>;
}

pub struct FavoriteServiceImpl {
    tools: FavoriteTools,
    user: Option<UserId>,
}

impl FavoriteServiceImpl {
    pub fn new(tools: FavoriteTools, user: Option<UserId>) -> Self {
        Self { tools, user }
    }

    fn user(&self) -> BackendResult<&UserId> {
        require_user(&self.user, SIGN_IN_MESSAGE)
    }
}

#[async_trait]
impl FavoriteService for FavoriteServiceImpl {
    async fn toggle(&self, property_id: &str) -> BackendResult<ToggleOutcome> {
        let user = self.user()?;
        let property = parse_property_id(property_id)?;
        self.tools.toggle(user, &property).await
    }

    async fn list(&self) -> BackendResult<Vec<SavedProperty>> {
        let user = self.user()?;
        self.tools.list(user).await
    }

    async fn remove(&self, saved_id: &str) -> BackendResult<()> {
        let user = self.user()?;
        let saved_id = saved_id.trim();
        if saved_id.is_empty() {
            return Err(BackendError::InvalidRequest(
                "Saved property ID cannot be empty".to_string(),
            ));
        }
        self.tools.remove(user, saved_id).await
    }
}
