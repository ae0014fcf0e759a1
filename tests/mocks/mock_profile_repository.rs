use super::{merge_row, CallCounts};
use async_trait::async_trait;
use realty_mcp_server::domain::UserId;
use realty_mcp_server::error::BackendResult;
use realty_mcp_server::models::{Profile, ProfileUpdate};
use realty_mcp_server::repositories::ProfileRepository;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock profile repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockProfileRepository {
    profiles: Arc<Mutex<HashMap<String, Profile>>>,
    calls: CallCounts,
}

#[allow(dead_code)]
impl MockProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_profile(&self, profile: Profile) {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.id.clone(), profile);
    }

    pub fn stored(&self, id: &str) -> Option<Profile> {
        self.profiles.lock().unwrap().get(id).cloned()
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        self.calls.get(method)
    }
}

#[async_trait]
impl ProfileRepository for MockProfileRepository {
    async fn get(&self, user: &UserId) -> BackendResult<Option<Profile>> {
        self.calls.track("get");
        Ok(self.stored(user.as_str()))
    }

    async fn insert(&self, profile: &Profile) -> BackendResult<Profile> {
        self.calls.track("insert");
        self.add_profile(profile.clone());
        Ok(profile.clone())
    }

    async fn upsert(
        &self,
        user: &UserId,
        update: &ProfileUpdate,
        updated_at: &str,
    ) -> BackendResult<Profile> {
        self.calls.track("upsert");
        let existing = self
            .stored(user.as_str())
            .unwrap_or_else(|| Profile {
                id: user.as_str().to_string(),
                ..Profile::default()
            });
        let merged = merge_row(
            serde_json::to_value(&existing)?,
            update.to_row(user.as_str(), updated_at),
        );
        let profile: Profile = serde_json::from_value(merged)?;
        self.add_profile(profile.clone());
        Ok(profile)
    }
}
