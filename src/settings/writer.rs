//! Options-surface persistence
//!
//! Toggles persist immediately; the quality slider streams values while the
//! user drags, so those writes are debounced and the release commits the
//! final value at once.

use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::store::{SettingsError, SettingsStore};
use super::KEY_QUALITY;
use crate::constants::QUALITY_DEBOUNCE_MS;

/// Writes user edits back through the settings bridge
pub struct SettingsWriter {
    store: Arc<dyn SettingsStore>,
    debounce: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SettingsWriter {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self::with_debounce(store, Duration::from_millis(QUALITY_DEBOUNCE_MS))
    }

    pub fn with_debounce(store: Arc<dyn SettingsStore>, debounce: Duration) -> Self {
        Self {
            store,
            debounce,
            pending: Mutex::new(None),
        }
    }

    /// Persist a toggle immediately
    pub async fn set_toggle(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        self.store.set(key, json!(value)).await
    }

    /// Stage a quality value while the slider is moving
    ///
    /// Each call supersedes any staged value that has not been written yet;
    /// the write lands once the slider has been quiet for the debounce
    /// window.
    pub fn stage_quality(&self, value: u8) {
        let store = Arc::clone(&self.store);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if let Err(err) = store.set(KEY_QUALITY, json!(value)).await {
                tracing::warn!(error = %err, "Failed to persist staged quality");
            }
        });

        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    /// Persist the released slider value immediately, superseding any staged
    /// write
    pub async fn commit_quality(&self, value: u8) -> Result<(), SettingsError> {
        if let Some(previous) = self.pending.lock().take() {
            previous.abort();
        }
        self.store.set(KEY_QUALITY, json!(value)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemoryStore;
    use serde_json::json;

    #[tokio::test(start_paused = true)]
    async fn test_staged_writes_coalesce_to_the_last_value() {
        let store = Arc::new(MemoryStore::new());
        let writer = SettingsWriter::with_debounce(store.clone(), Duration::from_millis(220));

        writer.stage_quality(40);
        writer.stage_quality(55);
        writer.stage_quality(70);

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.value(KEY_QUALITY), Some(json!(70)));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_supersedes_staged_value() {
        let store = Arc::new(MemoryStore::new());
        let writer = SettingsWriter::with_debounce(store.clone(), Duration::from_millis(220));

        writer.stage_quality(40);
        writer.commit_quality(85).await.unwrap();

        tokio::time::sleep(Duration::from_millis(500)).await;

        assert_eq!(store.value(KEY_QUALITY), Some(json!(85)));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_toggles_persist_immediately() {
        let store = Arc::new(MemoryStore::new());
        let writer = SettingsWriter::new(store.clone());

        writer.set_toggle("enabled", false).await.unwrap();

        assert_eq!(store.value("enabled"), Some(json!(false)));
        assert_eq!(store.write_count(), 1);
    }
}
