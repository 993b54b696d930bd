//! Drop protocol
//!
//! The surface's own drop handling is pre-empted at the capture phase:
//! dragover is always prevented so the drop is permitted, the drop itself is
//! stopped dead, the dragged files are converted, and the result lands on
//! the page's designated file input followed by a deferred synthetic change
//! notification.

use std::sync::Arc;

use crate::codec::WebpConverter;
use crate::constants::FILE_INPUT_NAME;
use crate::dom::{Document, DomError, DomEvent, EventKind, Listener, NodeId, Phase};
use crate::settings::Settings;

use super::convert::convert_file_list;

/// Installs and runs drop interception on an upload surface
pub struct DropInterceptor {
    doc: Arc<dyn Document>,
    settings: Settings,
    converter: WebpConverter,
}

impl DropInterceptor {
    pub fn new(doc: Arc<dyn Document>, settings: Settings) -> Arc<Self> {
        Arc::new(Self {
            doc,
            settings,
            converter: WebpConverter::new(),
        })
    }

    /// Install the dragover and drop capture listeners on a surface
    ///
    /// Not idempotent by itself; callers guard with the surface's
    /// attachment marker.
    pub fn install(self: &Arc<Self>, surface: NodeId) -> Result<(), DomError> {
        // dragover must be prevented or the browser refuses the drop
        let drag_over: Listener = Arc::new(|event: DomEvent| {
            Box::pin(async move {
                event.prevent_default();
            })
        });
        self.doc
            .add_listener(surface, EventKind::DragOver, Phase::Capture, drag_over)?;

        let interceptor = Arc::clone(self);
        let on_drop: Listener = Arc::new(move |event: DomEvent| {
            let interceptor = Arc::clone(&interceptor);
            Box::pin(async move {
                interceptor.handle_drop(event).await;
            })
        });
        self.doc
            .add_listener(surface, EventKind::Drop, Phase::Capture, on_drop)
    }

    async fn handle_drop(self: Arc<Self>, event: DomEvent) {
        // Pre-empt the host page: nothing else sees this drop
        event.prevent_default();
        event.stop_immediate_propagation();

        let Some(files) = event.files else {
            return;
        };

        // Capturing: convert the dragged list; every file settles before
        // replacement, none after
        let processed = if self.settings.compress_on_drag {
            convert_file_list(&self.converter, files, self.settings.quality).await
        } else {
            files
        };

        // Replacing: the designated input by name, else any file input
        let input = self
            .doc
            .file_inputs(Some(FILE_INPUT_NAME))
            .first()
            .copied()
            .or_else(|| self.doc.file_inputs(None).first().copied());

        let Some(input) = input else {
            // No destination to deliver to; the drop ends here
            tracing::debug!("No file input found after drop, converted files discarded");
            return;
        };

        if let Err(err) = self.doc.set_files(input, processed) {
            tracing::debug!(input = %input, error = %err, "Could not replace file list after drop");
            return;
        }

        // The synthetic change goes out on the next scheduling turn so the
        // replacement is observable before page logic reacts to it
        let doc = Arc::clone(&self.doc);
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            if let Err(err) = doc.dispatch(DomEvent::change(input, false)).await {
                tracing::debug!(input = %input, error = %err, "Deferred change dispatch failed");
            }
        });
    }
}
