//! Smart Learning Hub page controller.
//!
//! Client-side behaviour for the Learning Hub landing page compiled to WASM:
//! preference toggles mirrored onto body classes and panel styles, the mobile
//! navigation toggle, skill bars that fill once they scroll into view, the
//! "learn" easter egg, and the ambient particle canvas.
//!
//! The state machine lives in [`controller`] and is host independent; the
//! `page` module is the web-sys runtime that feeds it browser events. Call
//! `start_page()` from JS once the document has loaded.

use wasm_bindgen::prelude::*;

pub mod config;
pub mod controller;
pub mod error;
mod page;
pub mod particles;
pub mod prefs;
pub mod secret;
pub mod skills;

pub use config::PageConfig;
pub use controller::{Effect, PageController, UiEvent};
pub use error::PageError;
pub use prefs::{PrefKey, UiPreferences, Visuals};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    console_log::init_with_level(log::Level::Info).ok();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Wire the page with the built-in configuration.
#[wasm_bindgen]
pub fn start_page() -> Result<(), JsValue> {
    page::start(PageConfig::default()).map_err(Into::into)
}

/// Wire the page with a partial JSON override of [`PageConfig`].
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_page_with_config(json: &str) -> Result<(), JsValue> {
    let config = PageConfig::from_json(json)?;
    page::start(config).map_err(Into::into)
}

/// Set a preference from script. Toggle inputs, visuals and the particle
/// loop follow exactly as if the user had flipped the toggle.
#[wasm_bindgen]
pub fn set_preference(key: &str, value: bool) -> Result<(), JsValue> {
    page::try_dispatch(UiEvent::PreferenceSet {
        key: key.to_string(),
        value,
    })
    .map_err(Into::into)
}

#[wasm_bindgen]
pub fn sync_ui_from_state() -> Result<(), JsValue> {
    page::sync_ui_from_state().map_err(Into::into)
}

/// Current preferences as a JSON object.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn preferences_json() -> Result<String, JsValue> {
    page::preferences_json().map_err(Into::into)
}
