//! `window.localStorage` behind the core key-value store.

use std::rc::Rc;

use learn_core::{KeyValueStore, MemoryStore, StoreError};

pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Write {
                key: key.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            dioxus_logger::tracing::warn!("Failed to remove {} from LocalStorage: {:?}", key, e);
        }
    }
}

/// localStorage when the browser allows it, otherwise an in-memory store that
/// lasts for the page's lifetime.
pub fn browser_store() -> Rc<dyn KeyValueStore> {
    match BrowserStorage::open() {
        Ok(storage) => Rc::new(storage),
        Err(e) => {
            dioxus_logger::tracing::warn!("{}; progress will not survive a reload", e);
            Rc::new(MemoryStore::new())
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn remove_clears_a_stored_key() {
        let store = BrowserStorage::open().unwrap();
        store.set("learn.test.key", "1").unwrap();
        assert_eq!(store.get("learn.test.key").as_deref(), Some("1"));
        store.remove("learn.test.key");
        assert_eq!(store.get("learn.test.key"), None);
        store.remove("learn.test.key");
    }
}
