use super::{merge_row, CallCounts};
use async_trait::async_trait;
use realty_mcp_server::domain::{PropertyId, UserId};
use realty_mcp_server::error::{BackendError, BackendResult};
use realty_mcp_server::filters::{ListingCriteria, SortOrder};
use realty_mcp_server::models::{Property, PropertyDraft, PropertyImage};
use realty_mcp_server::repositories::PropertyRepository;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One `replace_images` call as the repository received it.
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub struct ImageWrite {
    pub property_id: String,
    pub urls: Vec<String>,
    pub replace_existing: bool,
}

/// Mock property repository for testing.
///
/// Listings are kept in insertion order; searches evaluate the criteria
/// against them in memory.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockPropertyRepository {
    properties: Arc<Mutex<Vec<Property>>>,
    image_writes: Arc<Mutex<Vec<ImageWrite>>>,
    next_id: Arc<AtomicUsize>,
    calls: CallCounts,
    list_active_hook: Arc<Mutex<Option<ListActiveHook>>>,
}

/// Runs inside `list_active`, after the call is counted.
pub type ListActiveHook = Arc<dyn Fn() + Send + Sync>;

#[allow(dead_code)]
impl MockPropertyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: Vec<Property>) -> Self {
        let repo = Self::new();
        repo.add_properties(properties);
        repo
    }

    pub fn add_property(&self, property: Property) {
        self.properties.lock().unwrap().push(property);
    }

    pub fn add_properties(&self, properties: Vec<Property>) {
        self.properties.lock().unwrap().extend(properties);
    }

    pub fn stored(&self, id: &str) -> Option<Property> {
        self.properties
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.properties.lock().unwrap().len()
    }

    pub fn image_writes(&self) -> Vec<ImageWrite> {
        self.image_writes.lock().unwrap().clone()
    }

    pub fn on_list_active(&self, hook: ListActiveHook) {
        *self.list_active_hook.lock().unwrap() = Some(hook);
    }

    pub fn get_call_count(&self, method: &str) -> usize {
        self.calls.get(method)
    }

    pub fn reset_call_counts(&self) {
        self.calls.reset();
    }

    fn from_row(row: serde_json::Value) -> BackendResult<Property> {
        Ok(serde_json::from_value(row)?)
    }
}

fn sort_key(property: &Property) -> String {
    property.created_at.clone().unwrap_or_default()
}

#[async_trait]
impl PropertyRepository for MockPropertyRepository {
    async fn search(
        &self,
        criteria: &ListingCriteria,
        sort: SortOrder,
        limit: usize,
    ) -> BackendResult<Vec<Property>> {
        self.calls.track("search");

        let mut matches: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| criteria.matches(p))
            .cloned()
            .collect();

        match sort {
            SortOrder::Newest => matches.sort_by_key(|p| std::cmp::Reverse(sort_key(p))),
            SortOrder::PriceLow => matches.sort_by(|a, b| a.price.total_cmp(&b.price)),
            SortOrder::PriceHigh => matches.sort_by(|a, b| b.price.total_cmp(&a.price)),
        }
        matches.truncate(limit);
        Ok(matches)
    }

    async fn count(&self, criteria: &ListingCriteria) -> BackendResult<u64> {
        self.calls.track("count");
        let properties = self.properties.lock().unwrap();
        Ok(properties.iter().filter(|p| criteria.matches(p)).count() as u64)
    }

    async fn get(&self, id: &PropertyId) -> BackendResult<Property> {
        self.calls.track("get");
        self.stored(id.as_str())
            .ok_or_else(|| BackendError::NotFound("properties".to_string()))
    }

    async fn list_for_owner(&self, owner: &UserId) -> BackendResult<Vec<Property>> {
        self.calls.track("list_for_owner");
        let mut owned: Vec<Property> = self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id.as_deref() == Some(owner.as_str()))
            .cloned()
            .collect();
        owned.sort_by_key(|p| std::cmp::Reverse(sort_key(p)));
        Ok(owned)
    }

    async fn create(&self, owner: &UserId, draft: &PropertyDraft) -> BackendResult<Property> {
        self.calls.track("create");
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let mut property = Self::from_row(draft.to_row(owner.as_str()))?;
        property.id = format!("prop-{}", n);
        property.created_at = Some(format!("2024-06-{:02}T12:00:00Z", n.min(28)));
        self.add_property(property.clone());
        Ok(property)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &PropertyId,
        draft: &PropertyDraft,
    ) -> BackendResult<Property> {
        self.calls.track("update");
        let mut properties = self.properties.lock().unwrap();
        let slot = properties
            .iter_mut()
            .find(|p| p.id == id.as_str() && p.user_id.as_deref() == Some(owner.as_str()))
            .ok_or_else(|| BackendError::NotFound("properties".to_string()))?;

        let merged = merge_row(serde_json::to_value(&*slot)?, draft.to_patch(owner.as_str()));
        *slot = Self::from_row(merged)?;
        Ok(slot.clone())
    }

    async fn delete(&self, owner: &UserId, id: &PropertyId) -> BackendResult<()> {
        self.calls.track("delete");
        let mut properties = self.properties.lock().unwrap();
        let before = properties.len();
        properties.retain(|p| !(p.id == id.as_str() && p.user_id.as_deref() == Some(owner.as_str())));
        if properties.len() == before {
            return Err(BackendError::NotFound("properties".to_string()));
        }
        Ok(())
    }

    async fn replace_images(
        &self,
        id: &PropertyId,
        urls: &[String],
        replace_existing: bool,
    ) -> BackendResult<()> {
        self.calls.track("replace_images");
        self.image_writes.lock().unwrap().push(ImageWrite {
            property_id: id.as_str().to_string(),
            urls: urls.to_vec(),
            replace_existing,
        });

        let mut properties = self.properties.lock().unwrap();
        if let Some(property) = properties.iter_mut().find(|p| p.id == id.as_str()) {
            if replace_existing {
                property.property_images.clear();
            }
            property
                .property_images
                .extend(urls.iter().enumerate().map(|(i, url)| PropertyImage {
                    image_url: url.clone(),
                    is_primary: i == 0,
                    caption: None,
                }));
        }
        Ok(())
    }

    async fn list_active(&self, limit: usize) -> BackendResult<Vec<Property>> {
        self.calls.track("list_active");
        let hook = self.list_active_hook.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook();
        }
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.is_active())
            .take(limit)
            .cloned()
            .collect())
    }
}
