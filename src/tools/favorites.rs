//! Favorites: the per-user saved-listing set and the save/unsave toggle.

use crate::domain::{PropertyId, UserId};
use crate::error::{BackendError, BackendResult};
use crate::metrics::Metrics;
use crate::models::SavedProperty;
use crate::repositories::SavedPropertyRepository;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

pub const SIGN_IN_MESSAGE: &str = "Please sign in to save properties.";
pub const SAVED_MESSAGE: &str = "Property added to your favorites.";
pub const REMOVED_MESSAGE: &str = "Property removed from your favorites.";
pub const FAILED_MESSAGE: &str = "Failed to update favorites. Please try again.";

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Saved,
    Removed,
    /// A toggle for the same listing was still running; nothing was sent.
    InFlight,
}

impl ToggleOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ToggleOutcome::Saved => SAVED_MESSAGE,
            ToggleOutcome::Removed => REMOVED_MESSAGE,
            ToggleOutcome::InFlight => "An update for this property is already in progress.",
        }
    }

    /// Whether the listing is saved afterwards, if known.
    pub fn is_saved(&self) -> Option<bool> {
        match self {
            ToggleOutcome::Saved => Some(true),
            ToggleOutcome::Removed => Some(false),
            ToggleOutcome::InFlight => None,
        }
    }
}

#[derive(Debug, Default)]
struct UserFavorites {
    loaded: bool,
    saved: HashSet<String>,
    in_flight: HashSet<String>,
}

type FavoriteState = HashMap<String, UserFavorites>;

/// Clears the in-flight mark when the toggle finishes, however it finishes.
struct InFlightGuard<'a> {
    state: &'a Mutex<FavoriteState>,
    user: String,
    property: String,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            if let Some(favs) = state.get_mut(&self.user) {
                favs.in_flight.remove(&self.property);
            }
        }
    }
}

#[derive(Clone)]
pub struct FavoriteTools {
    repo: Arc<dyn SavedPropertyRepository>,
    state: Arc<Mutex<FavoriteState>>,
    metrics: Metrics,
}

impl FavoriteTools {
    pub fn new(repo: Arc<dyn SavedPropertyRepository>, metrics: Metrics) -> Self {
        Self {
            repo,
            state: Arc::new(Mutex::new(HashMap::new())),
            metrics,
        }
    }

    fn lock(&self) -> BackendResult<MutexGuard<'_, FavoriteState>> {
        self.state
            .lock()
            .map_err(|_| BackendError::Other("favorites state poisoned".to_string()))
    }

    /// Reload the user's saved-id set from the backend.
    pub async fn refresh(&self, user: &UserId) -> BackendResult<HashSet<String>> {
        let ids: HashSet<String> = self.repo.ids_for_user(user).await?.into_iter().collect();
        let mut state = self.lock()?;
        let favs = state.entry(user.as_str().to_string()).or_default();
        favs.saved = ids.clone();
        favs.loaded = true;
        Ok(ids)
    }

    async fn ensure_loaded(&self, user: &UserId) -> BackendResult<()> {
        let loaded = self
            .lock()?
            .get(user.as_str())
            .is_some_and(|favs| favs.loaded);
        if !loaded {
            self.refresh(user).await?;
        }
        Ok(())
    }

    /// The user's saved listing ids.
    pub async fn saved_ids(&self, user: &UserId) -> BackendResult<HashSet<String>> {
        self.ensure_loaded(user).await?;
        Ok(self
            .lock()?
            .get(user.as_str())
            .map(|favs| favs.saved.clone())
            .unwrap_or_default())
    }

    pub async fn is_saved(&self, user: &UserId, property: &PropertyId) -> BackendResult<bool> {
        Ok(self.saved_ids(user).await?.contains(property.as_str()))
    }

    /// Save the listing if it is not saved, otherwise unsave it.
    ///
    /// While a toggle for the same user and listing is running, further
    /// toggles return [`ToggleOutcome::InFlight`] without a backend call.
    /// Backend failures come back as [`BackendError::ActionFailed`].
    pub async fn toggle(&self, user: &UserId, property: &PropertyId) -> BackendResult<ToggleOutcome> {
        self.ensure_loaded(user).await?;

        let was_saved = {
            let mut state = self.lock()?;
            let favs = state.entry(user.as_str().to_string()).or_default();
            if !favs.in_flight.insert(property.as_str().to_string()) {
                tracing::debug!("Toggle for {} already in flight", property);
                return Ok(ToggleOutcome::InFlight);
            }
            favs.saved.contains(property.as_str())
        };
        let _guard = InFlightGuard {
            state: &self.state,
            user: user.as_str().to_string(),
            property: property.as_str().to_string(),
        };

        let result = if was_saved {
            self.repo
                .delete_pair(user, property)
                .await
                .map(|_| ToggleOutcome::Removed)
        } else {
            match self.repo.insert(user, property).await {
                Ok(_) => Ok(ToggleOutcome::Saved),
                Err(e) if e.is_duplicate() => {
                    tracing::debug!("Property {} was already saved", property);
                    Ok(ToggleOutcome::Saved)
                }
                Err(e) => Err(e),
            }
        };

        let outcome = result.map_err(|e| {
            tracing::error!("Error toggling saved property {}: {}", property, e);
            BackendError::ActionFailed(FAILED_MESSAGE.to_string())
        })?;

        {
            let mut state = self.lock()?;
            let favs = state.entry(user.as_str().to_string()).or_default();
            match outcome {
                ToggleOutcome::Saved => {
                    favs.saved.insert(property.as_str().to_string());
                }
                ToggleOutcome::Removed => {
                    favs.saved.remove(property.as_str());
                }
                ToggleOutcome::InFlight => {}
            }
        }

        self.metrics.record_favorite_toggled();
        tracing::info!("Favorite {:?} for property {}", outcome, property);
        Ok(outcome)
    }

    /// Favorites with their listings, newest first.
    pub async fn list(&self, user: &UserId) -> BackendResult<Vec<SavedProperty>> {
        self.repo.list_for_user(user).await
    }

    /// Remove a favorite by its own id and resync the saved set.
    pub async fn remove(&self, user: &UserId, saved_id: &str) -> BackendResult<()> {
        let removed = self.repo.delete_by_id(user, saved_id).await?;
        if removed == 0 {
            return Err(BackendError::NotFound("saved property".to_string()));
        }
        self.refresh(user).await?;
        Ok(())
    }
}
