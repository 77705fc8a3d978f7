//! String-keyed blob storage contracts and adapters.
//!
//! The contract mirrors browser `localStorage`: synchronous reads and writes of raw strings per
//! key. Typed helpers layer JSON (de)serialization on top.

use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for raw string values addressed by key.
pub trait KeyValueStore {
    /// Loads the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unavailable.
    fn load(&self, key: &str) -> Result<Option<String>, String>;

    /// Saves `raw` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unavailable or rejects the write.
    fn save(&self, key: &str, raw: &str) -> Result<(), String>;

    /// Deletes `key`. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error when the backing store is unavailable.
    fn delete(&self, key: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op store for unsupported targets: loads nothing and accepts every write.
pub struct NoopKeyValueStore;

impl KeyValueStore for NoopKeyValueStore {
    fn load(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn save(&self, _key: &str, _raw: &str) -> Result<(), String> {
        Ok(())
    }

    fn delete(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory store keyed by string. Clones share the same backing map.
pub struct MemoryKeyValueStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    /// Creates a store that rejects writes once the total stored size would exceed `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            inner: Rc::default(),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Returns every stored key in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.inner
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, raw: &str) -> Result<(), String> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + raw.len();
            if needed > quota {
                return Err(format!(
                    "storage quota exceeded writing `{key}` ({needed} > {quota} bytes)"
                ));
            }
        }
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), String> {
        self.inner.borrow_mut().remove(key);
        Ok(())
    }
}

/// Loads and deserializes a typed JSON value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when the store or JSON deserialization fails.
pub fn load_json_with<S: KeyValueStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load(key)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).map_err(|e| e.to_string())?;
    Ok(Some(value))
}

/// Serializes and saves a typed JSON value through a [`KeyValueStore`].
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_json_with<S: KeyValueStore + ?Sized, T: Serialize>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.save(key, &raw)
}
