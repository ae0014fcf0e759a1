use super::{merge_row, CallCounts};
use async_trait::async_trait;
use realty_mcp_server::domain::UserId;
use realty_mcp_server::error::{BackendError, BackendResult};
use realty_mcp_server::models::{NewSavedSearch, SavedSearch, SavedSearchUpdate};
use realty_mcp_server::repositories::SavedSearchRepository;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock saved-search repository for testing.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockSavedSearchRepository {
    searches: Arc<Mutex<Vec<SavedSearch>>>,
    next_id: Arc<AtomicUsize>,
    calls: CallCounts,
}

#[allow(dead_code)]
impl MockSavedSearchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_search(&self, search: SavedSearch) {
        self.searches.lock().unwrap().push(search);
    }

    pub fn stored(&self, id: &str) -> Option<SavedSearch> {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        self.calls.get(method)
    }

    fn not_found() -> BackendError {
        BackendError::NotFound("saved_searches".to_string())
    }

    fn owned_by(search: &SavedSearch, user: &UserId) -> bool {
        search.user_id.as_deref() == Some(user.as_str())
    }
}

#[async_trait]
impl SavedSearchRepository for MockSavedSearchRepository {
    async fn list_for_user(&self, user: &UserId) -> BackendResult<Vec<SavedSearch>> {
        self.calls.track("list_for_user");
        Ok(self
            .searches
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|s| Self::owned_by(s, user))
            .cloned()
            .collect())
    }

    async fn get(&self, user: &UserId, id: &str) -> BackendResult<SavedSearch> {
        self.calls.track("get");
        self.stored(id)
            .filter(|s| Self::owned_by(s, user))
            .ok_or_else(Self::not_found)
    }

    async fn create(&self, user: &UserId, search: &NewSavedSearch) -> BackendResult<SavedSearch> {
        self.calls.track("create");
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut row = search.to_row(user.as_str());
        if let Some(fields) = row.as_object_mut() {
            fields.insert("id".into(), format!("search-{}", n).into());
            fields.insert("created_at".into(), "2024-06-01T12:00:00Z".into());
        }
        let created: SavedSearch = serde_json::from_value(row)?;
        self.add_search(created.clone());
        Ok(created)
    }

    async fn update(
        &self,
        user: &UserId,
        id: &str,
        changes: &SavedSearchUpdate,
    ) -> BackendResult<SavedSearch> {
        self.calls.track("update");
        let mut searches = self.searches.lock().unwrap();
        let slot = searches
            .iter_mut()
            .find(|s| s.id == id && Self::owned_by(s, user))
            .ok_or_else(Self::not_found)?;
        let merged = merge_row(serde_json::to_value(&*slot)?, serde_json::to_value(changes)?);
        *slot = serde_json::from_value(merged)?;
        Ok(slot.clone())
    }

    async fn delete(&self, user: &UserId, id: &str) -> BackendResult<()> {
        self.calls.track("delete");
        let mut searches = self.searches.lock().unwrap();
        let before = searches.len();
        searches.retain(|s| !(s.id == id && Self::owned_by(s, user)));
        if searches.len() == before {
            return Err(Self::not_found());
        }
        Ok(())
    }
}
