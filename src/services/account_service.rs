//! Profile and saved-search service.

use super::{require_user, today};
use crate::domain::UserId;
use crate::error::{BackendError, BackendResult};
use crate::filters::{ListingCriteria, SortOrder};
use crate::models::{NewSavedSearch, Profile, ProfileUpdate, SavedSearch, SavedSearchUpdate};
use crate::repositories::{ProfileRepository, SavedSearchRepository};
use crate::tools::{PropertySearchTools, SearchOutcome};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

const PROFILE_SIGN_IN: &str = "Please sign in to view your profile.";
const SEARCH_SIGN_IN: &str = "Please sign in to save searches.";

/// Saved searches re-run at once by `refresh_notifying`.
const REFRESH_CONCURRENCY: usize = 4;

/// A saved search after running it.
#[derive(Debug, Clone)]
pub struct SavedSearchRun {
    pub search: SavedSearch,
    pub outcome: SearchOutcome,
    /// Every active listing the search matches, beyond the returned page.
    pub total_matches: u64,
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// The signed-in user's profile, created as a blank buyer profile on
    /// first access.
    async fn profile(&self) -> BackendResult<Profile>;

    async fn update_profile(&self, update: ProfileUpdate) -> BackendResult<Profile>;

    async fn list_saved_searches(&self) -> BackendResult<Vec<SavedSearch>>;

    async fn save_search(&self, search: NewSavedSearch) -> BackendResult<SavedSearch>;

    /// Flip the notification switch; returns the updated search.
    async fn toggle_notifications(&self, id: &str) -> BackendResult<SavedSearch>;

    /// Run the search, then store its result count and today's date.
    async fn run_saved_search(&self, id: &str) -> BackendResult<SavedSearchRun>;

    async fn delete_saved_search(&self, id: &str) -> BackendResult<()>;

    /// Re-run every search with notifications on. Failures are logged and
    /// skipped.
    async fn refresh_notifying(&self) -> BackendResult<Vec<SavedSearchRun>>;
}

pub struct AccountServiceImpl {
    profiles: Arc<dyn ProfileRepository>,
    searches: Arc<dyn SavedSearchRepository>,
    search_tools: PropertySearchTools,
    user: Option<UserId>,
    user_email: Option<String>,
}

impl AccountServiceImpl {
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        searches: Arc<dyn SavedSearchRepository>,
        search_tools: PropertySearchTools,
        user: Option<UserId>,
        user_email: Option<String>,
    ) -> Self {
        Self {
            profiles,
            searches,
            search_tools,
            user,
            user_email,
        }
    }

    fn validate_search_id(id: &str) -> BackendResult<&str> {
        let id = id.trim();
        if id.is_empty() {
            return Err(BackendError::InvalidRequest(
                "Saved search ID cannot be empty".to_string(),
            ));
        }
        Ok(id)
    }

    async fn run(&self, user: &UserId, search: SavedSearch) -> BackendResult<SavedSearchRun> {
        let criteria = ListingCriteria::from_saved(&search.filters)?;
        let outcome = self
            .search_tools
            .search(criteria, SortOrder::default(), None)
            .await?;
        let total_matches = if outcome.truncated {
            self.search_tools.count(&outcome.criteria).await?
        } else {
            outcome.properties.len() as u64
        };

        let changes = SavedSearchUpdate {
            results_count: Some(total_matches),
            last_run: Some(today()),
            ..Default::default()
        };
        let search = self.searches.update(user, &search.id, &changes).await?;
        tracing::info!(
            "Saved search '{}' matched {} listings",
            search.name,
            search.results_count
        );
        Ok(SavedSearchRun {
            search,
            outcome,
            total_matches,
        })
    }
}

#[async_trait]
impl AccountService for AccountServiceImpl {
    async fn profile(&self) -> BackendResult<Profile> {
        let user = require_user(&self.user, PROFILE_SIGN_IN)?;

        if let Some(profile) = self.profiles.get(user).await? {
            return Ok(profile);
        }

        tracing::info!("Creating profile for {}", user);
        let profile = Profile::initial(user.as_str(), self.user_email.as_deref());
        self.profiles.insert(&profile).await
    }

    async fn update_profile(&self, mut update: ProfileUpdate) -> BackendResult<Profile> {
        let user = require_user(&self.user, PROFILE_SIGN_IN)?;
        update.validate()?;
        if update.email.is_none() {
            update.email = self.user_email.clone();
        }

        let stamp = chrono::Utc::now().to_rfc3339();
        self.profiles.upsert(user, &update, &stamp).await
    }

    async fn list_saved_searches(&self) -> BackendResult<Vec<SavedSearch>> {
        let user = require_user(&self.user, SEARCH_SIGN_IN)?;
        self.searches.list_for_user(user).await
    }

    async fn save_search(&self, search: NewSavedSearch) -> BackendResult<SavedSearch> {
        let user = require_user(&self.user, SEARCH_SIGN_IN)?;
        search.validate()?;
        ListingCriteria::from_saved(&search.filters)?;
        self.searches.create(user, &search).await
    }

    async fn toggle_notifications(&self, id: &str) -> BackendResult<SavedSearch> {
        let user = require_user(&self.user, SEARCH_SIGN_IN)?;
        let id = Self::validate_search_id(id)?;
        let current = self.searches.get(user, id).await?;
        let changes = SavedSearchUpdate {
            notifications: Some(!current.notifications),
            ..Default::default()
        };
        self.searches.update(user, id, &changes).await
    }

    async fn run_saved_search(&self, id: &str) -> BackendResult<SavedSearchRun> {
        let user = require_user(&self.user, SEARCH_SIGN_IN)?;
        let id = Self::validate_search_id(id)?;
        let search = self.searches.get(user, id).await?;
        self.run(user, search).await
    }

    async fn delete_saved_search(&self, id: &str) -> BackendResult<()> {
        let user = require_user(&self.user, SEARCH_SIGN_IN)?;
        let id = Self::validate_search_id(id)?;
        self.searches.delete(user, id).await
    }

    async fn refresh_notifying(&self) -> BackendResult<Vec<SavedSearchRun>> {
        let user = require_user(&self.user, SEARCH_SIGN_IN)?;
        let notifying: Vec<SavedSearch> = self
            .searches
            .list_for_user(user)
            .await?
            .into_iter()
            .filter(|s| s.notifications)
            .collect();

        let runs = stream::iter(notifying)
            .map(|search| async move {
                let name = search.name.clone();
                self.run(user, search).await.map_err(|e| (name, e))
            })
            .buffer_unordered(REFRESH_CONCURRENCY)
            .collect::<Vec<_>>()
            .await;

        Ok(runs
            .into_iter()
            .filter_map(|run| match run {
                Ok(run) => Some(run),
                Err((name, e)) => {
                    tracing::warn!("Failed to refresh saved search '{}': {}", name, e);
                    None
                }
            })
            .collect())
    }
}
