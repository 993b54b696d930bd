//! File-input change protocol
//!
//! A capture-phase listener on each tracked input pre-empts the host page's
//! change handling: the genuine event is stopped, the selected files are
//! converted in place, and a fresh bubbling change is dispatched so the
//! page's listeners run against the converted list. Synthetic events are
//! untrusted and pass through untouched, which is what bounds conversion to
//! once per genuine user file-selection.

use std::sync::Arc;

use crate::codec::WebpConverter;
use crate::dom::{Document, DomError, DomEvent, EventKind, Listener, NodeId, Phase};
use crate::settings::Settings;

use super::convert::convert_file_list;

/// Installs and runs change interception on tracked file inputs
pub struct ChangeInterceptor {
    doc: Arc<dyn Document>,
    settings: Settings,
    converter: WebpConverter,
}

impl ChangeInterceptor {
    pub fn new(doc: Arc<dyn Document>, settings: Settings) -> Arc<Self> {
        Arc::new(Self {
            doc,
            settings,
            converter: WebpConverter::new(),
        })
    }

    pub(crate) fn doc(&self) -> &Arc<dyn Document> {
        &self.doc
    }

    /// Install the capture-phase interception listener on an input
    ///
    /// Not idempotent by itself; callers guard with the input's attachment
    /// marker.
    pub fn install(self: &Arc<Self>, input: NodeId) -> Result<(), DomError> {
        let interceptor = Arc::clone(self);
        let listener: Listener = Arc::new(move |event: DomEvent| {
            let interceptor = Arc::clone(&interceptor);
            Box::pin(async move {
                interceptor.handle_change(event, Some(input)).await;
            })
        });
        self.doc
            .add_listener(input, EventKind::Change, Phase::Capture, listener)
    }

    /// Run the change protocol against one event
    ///
    /// `provided` is the input the listener was installed on, when known;
    /// otherwise the input is resolved from the event.
    pub(crate) async fn handle_change(
        self: Arc<Self>,
        event: DomEvent,
        provided: Option<NodeId>,
    ) {
        // Synthetic re-dispatches (ours included) are not user actions
        if !event.trusted {
            return;
        }

        let Some(input) = self.resolve_input(&event, provided) else {
            return;
        };

        // With upload compression off the genuine event proceeds untouched
        if !self.settings.compress_on_upload {
            return;
        }

        // From here on this event belongs to us
        event.stop_immediate_propagation();

        match self.doc.files(input) {
            Ok(files) if files.is_empty() => return,
            Ok(files) => {
                let processed =
                    convert_file_list(&self.converter, files, self.settings.quality).await;
                if let Err(err) = self.doc.set_files(input, processed) {
                    tracing::debug!(input = %input, error = %err, "Could not replace file list");
                }
            }
            Err(err) => {
                tracing::debug!(input = %input, error = %err, "Could not read input files");
            }
        }

        // Fresh bubbling change, synchronous on this pass; the host's
        // listeners observe the converted list through it
        if let Err(err) = self.doc.dispatch(DomEvent::change(input, false)).await {
            tracing::debug!(input = %input, error = %err, "Synthetic change re-dispatch failed");
        }
    }

    /// Resolve the concrete input from the event, tolerating delegation and
    /// focus ambiguity: current target, then target, then the focused
    /// element, then the nearest file-input ancestor of the target
    fn resolve_input(&self, event: &DomEvent, provided: Option<NodeId>) -> Option<NodeId> {
        if let Some(node) = provided {
            return Some(node);
        }
        if let Some(node) = event.current_target {
            if self.doc.is_file_input(node) {
                return Some(node);
            }
        }
        if let Some(node) = event.target {
            if self.doc.is_file_input(node) {
                return Some(node);
            }
        }
        if let Some(node) = self.doc.active_element() {
            if self.doc.is_file_input(node) {
                return Some(node);
            }
        }
        event.target.and_then(|t| self.doc.closest_file_input(t))
    }
}
