//! In-memory repositories for tests.

mod mock_profile_repository;
mod mock_property_repository;
mod mock_saved_property_repository;
mod mock_saved_search_repository;

#[allow(unused_imports)]
pub use mock_profile_repository::MockProfileRepository;
#[allow(unused_imports)]
pub use mock_property_repository::MockPropertyRepository;
#[allow(unused_imports)]
pub use mock_saved_property_repository::MockSavedPropertyRepository;
#[allow(unused_imports)]
pub use mock_saved_search_repository::MockSavedSearchRepository;

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Overlay the non-null fields of `patch` onto `base`, the way a PATCH or
/// merge upsert treats a row.
#[allow(dead_code)]
pub fn merge_row(mut base: Value, patch: Value) -> Value {
    if let (Some(base), Value::Object(patch)) = (base.as_object_mut(), patch) {
        for (key, value) in patch {
            if !value.is_null() {
                base.insert(key, value);
            }
        }
    }
    base
}

/// Per-method call counter shared by the mocks.
#[derive(Clone, Default)]
pub struct CallCounts(Arc<Mutex<HashMap<String, usize>>>);

#[allow(dead_code)]
impl CallCounts {
    pub fn track(&self, method: &str) {
        let mut counts = self.0.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, method: &str) -> usize {
        *self.0.lock().unwrap().get(method).unwrap_or(&0)
    }

    pub fn reset(&self) {
        self.0.lock().unwrap().clear();
    }
}
