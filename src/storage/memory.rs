use super::{Items, KeyValueStore, StoreResult};
use serde_json::Value;
use std::cell::RefCell;

/// In-memory store for tests. Mirrors `chrome.storage.local` semantics:
/// missing keys are simply absent from `get` results.
#[derive(Debug, Default)]
pub(crate) struct InMemoryStore {
    items: RefCell<Items>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Value) -> Self {
        let items = match items {
            Value::Object(map) => map,
            _ => Items::new(),
        };
        Self {
            items: RefCell::new(items),
        }
    }

    pub fn raw(&self, key: &str) -> Option<Value> {
        self.items.borrow().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }
}

impl KeyValueStore for InMemoryStore {
    async fn get(&self, keys: &[&str]) -> StoreResult<Items> {
        let items = self.items.borrow();
        Ok(keys
            .iter()
            .filter_map(|k| items.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    async fn get_all(&self) -> StoreResult<Items> {
        Ok(self.items.borrow().clone())
    }

    async fn set(&self, items: Items) -> StoreResult<()> {
        self.items.borrow_mut().extend(items);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> StoreResult<()> {
        let mut items = self.items.borrow_mut();
        for k in keys {
            items.remove(*k);
        }
        Ok(())
    }
}
