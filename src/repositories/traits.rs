use crate::domain::{PropertyId, UserId};
use crate::error::BackendResult;
use crate::filters::{ListingCriteria, SortOrder};
use crate::models::*;
use async_trait::async_trait;

/// Repository for property listings and their images.
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// Active listings matching `criteria`, in `sort` order.
    async fn search(
        &self,
        criteria: &ListingCriteria,
        sort: SortOrder,
        limit: usize,
    ) -> BackendResult<Vec<Property>>;

    /// How many active listings match `criteria`, ignoring any row limit.
    async fn count(&self, criteria: &ListingCriteria) -> BackendResult<u64>;

    /// A single listing with its images.
    async fn get(&self, id: &PropertyId) -> BackendResult<Property>;

    /// Every listing owned by `owner`, newest first, whatever its status.
    async fn list_for_owner(&self, owner: &UserId) -> BackendResult<Vec<Property>>;

    async fn create(&self, owner: &UserId, draft: &PropertyDraft) -> BackendResult<Property>;

    /// Update a listing `owner` owns. `NotFound` when there is none.
    async fn update(
        &self,
        owner: &UserId,
        id: &PropertyId,
        draft: &PropertyDraft,
    ) -> BackendResult<Property>;

    /// Delete a listing `owner` owns. `NotFound` when there is none.
    async fn delete(&self, owner: &UserId, id: &PropertyId) -> BackendResult<()>;

    /// Write the image list, first URL primary. With `replace_existing`
    /// the listing's current images are removed first.
    async fn replace_images(
        &self,
        id: &PropertyId,
        urls: &[String],
        replace_existing: bool,
    ) -> BackendResult<()>;

    /// Active listings with the columns market figures need.
    async fn list_active(&self, limit: usize) -> BackendResult<Vec<Property>>;
}

/// Repository for favorites.
#[async_trait]
pub trait SavedPropertyRepository: Send + Sync {
    /// Ids of every listing `user` has saved.
    async fn ids_for_user(&self, user: &UserId) -> BackendResult<Vec<String>>;

    /// Favorites with their listing joined in, newest first.
    async fn list_for_user(&self, user: &UserId) -> BackendResult<Vec<SavedProperty>>;

    async fn exists(&self, user: &UserId, property: &PropertyId) -> BackendResult<bool>;

    async fn insert(&self, user: &UserId, property: &PropertyId) -> BackendResult<SavedProperty>;

    /// Remove the favorite for a listing; returns the number of rows removed.
    async fn delete_pair(&self, user: &UserId, property: &PropertyId) -> BackendResult<usize>;

    /// Remove a favorite by its own id; returns the number of rows removed.
    async fn delete_by_id(&self, user: &UserId, saved_id: &str) -> BackendResult<usize>;
}

/// Repository for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// The user's profile, or `None` if it has not been created yet.
    async fn get(&self, user: &UserId) -> BackendResult<Option<Profile>>;

    async fn insert(&self, profile: &Profile) -> BackendResult<Profile>;

    /// Create or merge the profile row, stamping `updated_at`.
    async fn upsert(
        &self,
        user: &UserId,
        update: &ProfileUpdate,
        updated_at: &str,
    ) -> BackendResult<Profile>;
}

/// Repository for saved searches.
#[async_trait]
pub trait SavedSearchRepository: Send + Sync {
    /// The user's saved searches, newest first.
    async fn list_for_user(&self, user: &UserId) -> BackendResult<Vec<SavedSearch>>;

    async fn get(&self, user: &UserId, id: &str) -> BackendResult<SavedSearch>;

    async fn create(&self, user: &UserId, search: &NewSavedSearch) -> BackendResult<SavedSearch>;

    async fn update(
        &self,
        user: &UserId,
        id: &str,
        changes: &SavedSearchUpdate,
    ) -> BackendResult<SavedSearch>;

    async fn delete(&self, user: &UserId, id: &str) -> BackendResult<()>;
}
