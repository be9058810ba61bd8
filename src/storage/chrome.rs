use super::{Items, KeyValueStore, StoreError, StoreResult};
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

// chrome.storage.local (promise form, MV3)
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = get)]
    fn local_get(keys: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = set)]
    fn local_set(items: &JsValue) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(catch, js_namespace = ["chrome", "storage", "local"], js_name = remove)]
    fn local_remove(keys: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

pub(crate) fn js_error_message(e: &JsValue) -> String {
    if let Some(s) = e.as_string() {
        return s;
    }
    js_sys::Reflect::get(e, &"message".into())
        .ok()
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| format!("{e:?}"))
}

fn platform(e: JsValue) -> StoreError {
    StoreError::Platform(js_error_message(&e))
}

fn key_list(keys: &[&str]) -> StoreResult<JsValue> {
    serde_wasm_bindgen::to_value(keys).map_err(|e| StoreError::Convert(e.to_string()))
}

/// `chrome.storage.local`, the popup's only persistence.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ChromeStorage;

impl ChromeStorage {
    async fn fetch(keys: &JsValue) -> StoreResult<Items> {
        let value = JsFuture::from(local_get(keys).map_err(platform)?)
            .await
            .map_err(platform)?;
        if value.is_undefined() || value.is_null() {
            return Ok(Items::new());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| StoreError::Convert(e.to_string()))
    }
}

impl KeyValueStore for ChromeStorage {
    async fn get(&self, keys: &[&str]) -> StoreResult<Items> {
        Self::fetch(&key_list(keys)?).await
    }

    async fn get_all(&self) -> StoreResult<Items> {
        Self::fetch(&JsValue::NULL).await
    }

    async fn set(&self, items: Items) -> StoreResult<()> {
        // Maps must land as plain objects, not JS `Map`s.
        let value = items
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StoreError::Convert(e.to_string()))?;
        JsFuture::from(local_set(&value).map_err(platform)?)
            .await
            .map_err(platform)?;
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> StoreResult<()> {
        JsFuture::from(local_remove(&key_list(keys)?).map_err(platform)?)
            .await
            .map_err(platform)?;
        Ok(())
    }
}
