mod components;
mod config;
mod models;
mod notes;
mod popup;
mod state;
mod storage;
mod tabs;
mod util;

use crate::config::EnvConfig;
use crate::popup::Popup;
use crate::state::{PopupContext, PopupState};
use leptos::prelude::*;

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[component]
pub fn App() -> impl IntoView {
    let config = EnvConfig::new();
    provide_context(PopupContext(PopupState::new(config)));

    view! { <Popup /> }
}


// Only register the WASM start function for normal builds (not for tests),
// otherwise wasm-bindgen-test will end up with multiple entry symbols.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();

    let config = EnvConfig::new();
    if console_log::init_with_level(config.log_level).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::debug!("popup config: {config:?}");

    mount_to_body(App);
}
