//! `localStorage`-backed key-value store implementation.
//!
//! Off `wasm32` there is no browser storage; the adapter then loads nothing and accepts writes so
//! native builds and tests run with the same wiring.

use platform_host::KeyValueStore;

#[derive(Debug, Clone, Copy, Default)]
/// Browser key-value store backed by `window.localStorage`.
pub struct WebKeyValueStore;

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl KeyValueStore for WebKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .get_item(key)
                .map_err(|e| format!("localStorage get_item failed: {}", crate::js_error_message(&e)))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn save(&self, key: &str, raw: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .set_item(key, raw)
                .map_err(|e| format!("localStorage set_item failed: {}", crate::js_error_message(&e)))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw);
            Ok(())
        }
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {}", crate::js_error_message(&e)))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use platform_host::{load_json_with, save_json_with};

    use super::*;

    #[test]
    fn native_fallback_accepts_writes_and_loads_nothing() {
        let store = WebKeyValueStore;
        save_json_with(&store, "desktopOS_fileSystem", &serde_json::json!({})).expect("save");
        let loaded: Option<serde_json::Value> =
            load_json_with(&store, "desktopOS_fileSystem").expect("load");
        assert!(loaded.is_none());
        store.delete("desktopOS_fileSystem").expect("delete");
    }
}
