//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! Adapters compile on every target; off `wasm32` they degrade to no-op behavior so the desktop
//! runtime can be wired and tested natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod fullscreen;
pub mod storage;

pub use adapters::{build_host_services, fullscreen_service, key_value_store};
pub use fullscreen::WebFullscreenService;
pub use storage::local_storage::WebKeyValueStore;

#[cfg(target_arch = "wasm32")]
pub(crate) fn js_error_message(err: &wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
