use crate::models::{SaveTarget, SiteKey};
use crate::storage::chrome::js_error_message;
use serde::{Deserialize, Serialize};
use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = ["chrome", "tabs"], js_name = query)]
    fn tabs_query(query: &JsValue) -> Result<js_sys::Promise, JsValue>;
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum TabError {
    #[error("tab query failed: {0}")]
    Platform(String),
    #[error("no active tab with a url")]
    NoActiveTab,
    #[error("active tab url is invalid: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("active tab url has no hostname: {0}")]
    NoHost(String),
}

pub(crate) trait TabLocator {
    /// URL of the focused tab in the current window.
    async fn active_tab_url(&self) -> Result<String, TabError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TabQuery {
    active: bool,
    current_window: bool,
}

#[derive(Deserialize)]
struct TabInfo {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ChromeTabs;

impl TabLocator for ChromeTabs {
    async fn active_tab_url(&self) -> Result<String, TabError> {
        let query = TabQuery {
            active: true,
            current_window: true,
        }
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| TabError::Platform(e.to_string()))?;

        let promise = tabs_query(&query).map_err(|e| TabError::Platform(js_error_message(&e)))?;
        let tabs = JsFuture::from(promise)
            .await
            .map_err(|e| TabError::Platform(js_error_message(&e)))?;
        let tabs: Vec<TabInfo> =
            serde_wasm_bindgen::from_value(tabs).map_err(|e| TabError::Platform(e.to_string()))?;

        tabs.into_iter()
            .next()
            .and_then(|t| t.url)
            .ok_or(TabError::NoActiveTab)
    }
}

/// Storage key a note for `url` is filed under.
///
/// `Domain` keeps only the hostname; `FullUrl` keeps the normalised href
/// (scheme, host, path, query and fragment).
pub(crate) fn site_key_for(url: &str, target: SaveTarget) -> Result<SiteKey, TabError> {
    let parsed = Url::parse(url)?;
    let key = match target {
        SaveTarget::Domain => parsed
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| TabError::NoHost(url.to_string()))?,
        SaveTarget::FullUrl => parsed.as_str().to_string(),
    };
    SiteKey::new(key).ok_or_else(|| TabError::NoHost(url.to_string()))
}
