//! Settings store trait and in-memory implementation
//!
//! The store is the external collaborator that persists user configuration;
//! a key-value async surface with `get_many` and `set`. The in-memory
//! implementation backs tests and the options surface harness.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum SettingsError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value settings storage
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Fetch the requested keys; absent keys are simply missing from the map
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Value>, SettingsError>;

    /// Persist one value
    async fn set(&self, key: &str, value: Value) -> Result<(), SettingsError>;
}

/// In-memory store for tests and the options surface harness
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, Value>>>,
    writes: Arc<RwLock<u64>>,
    /// Simulate a dead storage backend if true
    simulate_unavailable: Arc<RwLock<bool>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable storage failure simulation for testing
    pub fn set_unavailable(&self, enabled: bool) {
        *self.simulate_unavailable.write() = enabled;
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> u64 {
        *self.writes.read()
    }

    /// Read a single stored value directly
    pub fn value(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_many(&self, keys: &[&str]) -> Result<HashMap<String, Value>, SettingsError> {
        if *self.simulate_unavailable.read() {
            return Err(SettingsError::Unavailable(
                "Simulated storage outage".to_string(),
            ));
        }

        let values = self.values.read();
        Ok(keys
            .iter()
            .filter_map(|key| values.get(*key).map(|v| ((*key).to_string(), v.clone())))
            .collect())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SettingsError> {
        if *self.simulate_unavailable.read() {
            return Err(SettingsError::Unavailable(
                "Simulated storage outage".to_string(),
            ));
        }

        self.values.write().insert(key.to_string(), value);
        *self.writes.write() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_many_returns_only_present_keys() {
        let store = MemoryStore::new();
        store.set("quality", json!(70)).await.unwrap();

        let values = store.get_many(&["quality", "enabled"]).await.unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("quality"), Some(&json!(70)));
    }

    #[tokio::test]
    async fn test_set_overwrites_and_counts_writes() {
        let store = MemoryStore::new();
        store.set("quality", json!(70)).await.unwrap();
        store.set("quality", json!(90)).await.unwrap();

        assert_eq!(store.value("quality"), Some(json!(90)));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_unavailable_store_errors_on_both_paths() {
        let store = MemoryStore::new();
        store.set_unavailable(true);

        assert!(store.get_many(&["enabled"]).await.is_err());
        assert!(store.set("enabled", json!(true)).await.is_err());
    }

    #[test]
    fn test_store_satisfies_send_sync_bounds() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStore>();
    }
}
