use super::CallCounts;
use async_trait::async_trait;
use realty_mcp_server::domain::{PropertyId, UserId};
use realty_mcp_server::error::{BackendError, BackendResult};
use realty_mcp_server::models::{Property, SavedProperty};
use realty_mcp_server::repositories::SavedPropertyRepository;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Mock favorites repository for testing.
///
/// Enforces the (user, property) uniqueness the real table has, so a second
/// insert fails with the duplicate-key code. Writes can be held open with
/// [`MockSavedPropertyRepository::hold_writes`] or made to fail.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockSavedPropertyRepository {
    saved: Arc<Mutex<Vec<SavedProperty>>>,
    listings: Arc<Mutex<HashMap<String, Property>>>,
    next_id: Arc<AtomicUsize>,
    fail_writes: Arc<AtomicBool>,
    gate: Arc<Mutex<Option<Arc<Notify>>>>,
    calls: CallCounts,
}

#[allow(dead_code)]
impl MockSavedPropertyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing joined into `list_for_user` results.
    pub fn add_listing(&self, property: Property) {
        self.listings
            .lock()
            .unwrap()
            .insert(property.id.clone(), property);
    }

    /// Seed a favorite directly.
    pub fn add_saved(&self, user: &str, property: &str) -> String {
        let id = self.next_saved_id();
        self.saved.lock().unwrap().push(SavedProperty {
            id: id.clone(),
            user_id: Some(user.to_string()),
            property_id: property.to_string(),
            created_at: Some("2024-01-21T10:30:00Z".to_string()),
            property: None,
        });
        id
    }

    /// Make every insert and delete wait until the returned handle is notified.
    pub fn hold_writes(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    pub fn release_writes(&self) {
        *self.gate.lock().unwrap() = None;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn count_for(&self, user: &str) -> usize {
        self.saved
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id.as_deref() == Some(user))
            .count()
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        self.calls.get(method)
    }

    fn next_saved_id(&self) -> String {
        format!("saved-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }

    async fn before_write(&self) -> BackendResult<()> {
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::ApiError {
                status: 500,
                code: None,
                message: "connection reset".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl SavedPropertyRepository for MockSavedPropertyRepository {
    async fn ids_for_user(&self, user: &UserId) -> BackendResult<Vec<String>> {
        self.calls.track("ids_for_user");
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id.as_deref() == Some(user.as_str()))
            .map(|s| s.property_id.clone())
            .collect())
    }

    async fn list_for_user(&self, user: &UserId) -> BackendResult<Vec<SavedProperty>> {
        self.calls.track("list_for_user");
        let listings = self.listings.lock().unwrap();
        Ok(self
            .saved
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|s| s.user_id.as_deref() == Some(user.as_str()))
            .map(|s| SavedProperty {
                property: listings.get(&s.property_id).cloned(),
                ..s.clone()
            })
            .collect())
    }

    async fn exists(&self, user: &UserId, property: &PropertyId) -> BackendResult<bool> {
        self.calls.track("exists");
        Ok(self.saved.lock().unwrap().iter().any(|s| {
            s.user_id.as_deref() == Some(user.as_str()) && s.property_id == property.as_str()
        }))
    }

    async fn insert(&self, user: &UserId, property: &PropertyId) -> BackendResult<SavedProperty> {
        self.calls.track("insert");
        self.before_write().await?;

        let mut saved = self.saved.lock().unwrap();
        if saved.iter().any(|s| {
            s.user_id.as_deref() == Some(user.as_str()) && s.property_id == property.as_str()
        }) {
            return Err(BackendError::ApiError {
                status: 409,
                code: Some("23505".to_string()),
                message: "duplicate key value violates unique constraint".to_string(),
            });
        }

        let row = SavedProperty {
            id: self.next_saved_id(),
            user_id: Some(user.as_str().to_string()),
            property_id: property.as_str().to_string(),
            created_at: Some("2024-06-01T12:00:00Z".to_string()),
            property: None,
        };
        saved.push(row.clone());
        Ok(row)
    }

    async fn delete_pair(&self, user: &UserId, property: &PropertyId) -> BackendResult<usize> {
        self.calls.track("delete_pair");
        self.before_write().await?;

        let mut saved = self.saved.lock().unwrap();
        let before = saved.len();
        saved.retain(|s| {
            !(s.user_id.as_deref() == Some(user.as_str()) && s.property_id == property.as_str())
        });
        Ok(before - saved.len())
    }

    async fn delete_by_id(&self, user: &UserId, saved_id: &str) -> BackendResult<usize> {
        self.calls.track("delete_by_id");
        let mut saved = self.saved.lock().unwrap();
        let before = saved.len();
        saved.retain(|s| !(s.id == saved_id && s.user_id.as_deref() == Some(user.as_str())));
        Ok(before - saved.len())
    }
}
