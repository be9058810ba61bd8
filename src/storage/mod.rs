//! Extension key-value storage.
//!
//! Everything the popup persists lives in one flat namespace (see
//! [`crate::models`] for the reserved keys). [`KeyValueStore`] is the seam:
//! [`chrome::ChromeStorage`] talks to `chrome.storage.local`, and
//! [`memory::InMemoryStore`] backs the unit tests.
//!
//! There is no cross-key transaction. Helpers here issue one platform call
//! each; callers that need read-modify-write sequence the calls themselves.

pub(crate) mod chrome;
#[cfg(test)]
pub(crate) mod memory;

use crate::models::{
    DisplayNames, NoteMeta, NoteMode, StorageValue, Theme, DISPLAY_NAMES_KEY, META_KEY, MODE_KEY,
    THEME_KEY,
};
use serde::Serialize;
use serde_json::Value;

/// Raw storage snapshot, exactly as returned by the platform.
pub(crate) type Items = serde_json::Map<String, Value>;

#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    #[error("storage call failed: {0}")]
    Platform(String),
    #[error("storage value could not be converted: {0}")]
    Convert(String),
}

pub(crate) type StoreResult<T> = Result<T, StoreError>;

pub(crate) trait KeyValueStore {
    async fn get(&self, keys: &[&str]) -> StoreResult<Items>;

    async fn get_all(&self) -> StoreResult<Items>;

    async fn set(&self, items: Items) -> StoreResult<()>;

    async fn remove(&self, keys: &[&str]) -> StoreResult<()>;
}

pub(crate) async fn read<S: KeyValueStore>(store: &S, key: &str) -> StoreResult<StorageValue> {
    let items = store.get(&[key]).await?;
    Ok(StorageValue::decode(key, items.get(key)))
}

pub(crate) async fn write_json<S: KeyValueStore, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let value = serde_json::to_value(value).map_err(|e| StoreError::Convert(e.to_string()))?;
    let mut items = Items::new();
    items.insert(key.to_string(), value);
    log::debug!("storage set {key}");
    store.set(items).await
}

pub(crate) async fn write_text<S: KeyValueStore>(
    store: &S,
    key: &str,
    text: &str,
) -> StoreResult<()> {
    write_json(store, key, &text).await
}

pub(crate) async fn load_mode<S: KeyValueStore>(store: &S) -> StoreResult<NoteMode> {
    Ok(read(store, MODE_KEY).await?.into_mode())
}

pub(crate) async fn save_mode<S: KeyValueStore>(store: &S, mode: NoteMode) -> StoreResult<()> {
    write_json(store, MODE_KEY, &mode).await
}

pub(crate) async fn load_theme<S: KeyValueStore>(store: &S) -> StoreResult<Theme> {
    Ok(read(store, THEME_KEY).await?.into_theme())
}

pub(crate) async fn save_theme<S: KeyValueStore>(store: &S, theme: Theme) -> StoreResult<()> {
    write_json(store, THEME_KEY, &theme).await
}

pub(crate) async fn load_meta<S: KeyValueStore>(store: &S) -> StoreResult<NoteMeta> {
    Ok(read(store, META_KEY).await?.into_meta())
}

pub(crate) async fn save_meta<S: KeyValueStore>(store: &S, meta: &NoteMeta) -> StoreResult<()> {
    write_json(store, META_KEY, meta).await
}

pub(crate) async fn load_display_names<S: KeyValueStore>(store: &S) -> StoreResult<DisplayNames> {
    Ok(read(store, DISPLAY_NAMES_KEY).await?.into_display_names())
}

pub(crate) async fn save_display_names<S: KeyValueStore>(
    store: &S,
    names: &DisplayNames,
) -> StoreResult<()> {
    write_json(store, DISPLAY_NAMES_KEY, names).await
}
