//! Pipeline bootstrap
//!
//! Wires the settings bridge, the interception layer, and the re-scan
//! tracker together: configuration is read exactly once, interception
//! attaches to the current surfaces, and a mutation subscription keeps it
//! attached as the host re-renders. Initialization is armed at three page
//! load points and is idempotent across all of them.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::dom::{Document, EventKind, Listener, NodeId, Phase, ReadyState};
use crate::error::InterceptError;
use crate::intercept::{ChangeInterceptor, ChangeRelay, DropInterceptor};
use crate::scan::{AttachmentTracker, Rescanner};
use crate::settings::{Settings, SettingsStore};

/// The assembled interception pipeline for one page
pub struct UploadInterceptor {
    doc: Arc<dyn Document>,
    settings: Settings,
    tracker: Arc<AttachmentTracker>,
    observer_started: AtomicBool,
    observer: Mutex<Option<JoinHandle<()>>>,
}

impl UploadInterceptor {
    /// Load settings through the bridge and arm interception
    ///
    /// Returns `Ok(None)` when the user disabled the extension: nothing
    /// attaches and no observer runs.
    pub async fn install(
        doc: Arc<dyn Document>,
        store: &dyn SettingsStore,
    ) -> Result<Option<Arc<Self>>, InterceptError> {
        let settings = Settings::load(store)
            .await
            .map_err(|err| InterceptError::settings(err.to_string()))?;
        Ok(Self::with_settings(doc, settings))
    }

    /// Assemble with explicit settings; deterministic tests inject here
    pub fn with_settings(doc: Arc<dyn Document>, settings: Settings) -> Option<Arc<Self>> {
        if !settings.enabled {
            tracing::info!("Upload interception disabled by settings");
            return None;
        }

        let drop = DropInterceptor::new(Arc::clone(&doc), settings);
        let change = ChangeInterceptor::new(Arc::clone(&doc), settings);
        let tracker = Arc::new(AttachmentTracker::new(Arc::clone(&doc), drop, change));

        let this = Arc::new(Self {
            doc,
            settings,
            tracker,
            observer_started: AtomicBool::new(false),
            observer: Mutex::new(None),
        });
        this.arm();
        Some(this)
    }

    /// Register the page-load triggers and initialize immediately when the
    /// document is already past loading
    ///
    /// Whichever trigger fires first does the work; the rest are no-ops
    /// through the same idempotency that guards re-scans.
    fn arm(self: &Arc<Self>) {
        let body = self.doc.body();
        for kind in [EventKind::DomContentLoaded, EventKind::Load] {
            let pipeline = Arc::clone(self);
            let trigger: Listener = Arc::new(move |_event| {
                let pipeline = Arc::clone(&pipeline);
                Box::pin(async move {
                    pipeline.init();
                })
            });
            if let Err(err) = self.doc.add_listener(body, kind, Phase::Bubble, trigger) {
                tracing::debug!(error = %err, "Could not register load trigger");
            }
        }

        if self.doc.ready_state() != ReadyState::Loading {
            self.init();
        }
    }

    /// Attach to the current surfaces and start the mutation-driven
    /// re-scan; safe to call any number of times
    pub fn init(self: &Arc<Self>) {
        self.tracker.attach_all();

        if !self.observer_started.swap(true, Ordering::SeqCst) {
            let changes = self.doc.observe_mutations();
            let handle = Rescanner::spawn(Arc::clone(&self.tracker), changes);
            *self.observer.lock() = Some(handle);
        }
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// The registration adapter for a tracked input, if one is attached
    pub fn relay_for(&self, input: NodeId) -> Option<Arc<ChangeRelay>> {
        self.tracker.relay_for(input)
    }

    /// Stop the re-scan task; page teardown
    pub fn shutdown(&self) {
        if let Some(handle) = self.observer.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for UploadInterceptor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::INPUT_ATTACHED_MARKER;
    use crate::dom::{DomEvent, PageDom};
    use crate::settings::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_install_with_empty_store_uses_defaults() {
        let page = PageDom::new();
        let doc: Arc<dyn Document> = Arc::new(page.clone());
        let store = MemoryStore::new();

        let pipeline = UploadInterceptor::install(doc, &store).await.unwrap();
        let pipeline = pipeline.expect("defaults enable interception");
        assert_eq!(pipeline.settings(), Settings::default());
    }

    #[tokio::test]
    async fn test_disabled_settings_short_circuit() {
        let page = PageDom::new();
        let body = page.body();
        let input = page.append_file_input(body, Some("files[]"));

        let doc: Arc<dyn Document> = Arc::new(page.clone());
        let store = MemoryStore::new();
        store.set("enabled", json!(false)).await.unwrap();

        let pipeline = UploadInterceptor::install(doc, &store).await.unwrap();
        assert!(pipeline.is_none());
        assert!(!page.has_marker(input, INPUT_ATTACHED_MARKER));
    }

    #[tokio::test]
    async fn test_unavailable_store_is_a_settings_error() {
        let page = PageDom::new();
        let doc: Arc<dyn Document> = Arc::new(page.clone());
        let store = MemoryStore::new();
        store.set_unavailable(true);

        let result = UploadInterceptor::install(doc, &store).await;
        assert!(matches!(result, Err(InterceptError::Settings(_))));
    }

    #[tokio::test]
    async fn test_interactive_document_initializes_immediately() {
        let page = PageDom::new();
        let body = page.body();
        let input = page.append_file_input(body, Some("files[]"));

        let doc: Arc<dyn Document> = Arc::new(page.clone());
        let _pipeline =
            UploadInterceptor::with_settings(doc, Settings::default()).expect("enabled");

        assert!(page.has_marker(input, INPUT_ATTACHED_MARKER));
    }

    #[tokio::test]
    async fn test_all_three_triggers_yield_one_attachment() {
        let page = PageDom::new();
        page.set_ready_state(ReadyState::Interactive);
        let body = page.body();
        let input = page.append_file_input(body, Some("files[]"));

        let doc: Arc<dyn Document> = Arc::new(page.clone());
        let pipeline =
            UploadInterceptor::with_settings(doc, Settings::default()).expect("enabled");

        // Fire the remaining lifecycle triggers on top of the immediate one
        page.dispatch(DomEvent::new(
            EventKind::DomContentLoaded,
            Some(body),
            true,
            false,
        ))
        .await
        .unwrap();
        page.dispatch(DomEvent::new(EventKind::Load, Some(body), true, false))
            .await
            .unwrap();
        pipeline.init();

        // Idempotency held throughout: one marker, one handler set
        assert!(page.has_marker(input, INPUT_ATTACHED_MARKER));
        assert!(pipeline.relay_for(input).is_some());
    }
}
