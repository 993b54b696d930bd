//! Idempotent attachment of interception handlers

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::constants::{DROP_ATTACHED_MARKER, FILE_INPUT_NAME, INPUT_ATTACHED_MARKER};
use crate::dom::{Document, NodeId};
use crate::intercept::{ChangeInterceptor, ChangeRelay, DropInterceptor};

/// Keeps interception installed on the current surface and inputs
///
/// Attachment records are markers owned by the elements themselves, so a
/// replaced element arrives unmarked and is picked up on the next scan
/// while a surviving element is never attached twice. The marker check is a
/// plain flag read; single-threaded execution is what makes it a sufficient
/// guard.
pub struct AttachmentTracker {
    doc: Arc<dyn Document>,
    drop: Arc<DropInterceptor>,
    change: Arc<ChangeInterceptor>,
    relays: RwLock<HashMap<NodeId, Arc<ChangeRelay>>>,
}

impl AttachmentTracker {
    pub fn new(
        doc: Arc<dyn Document>,
        drop: Arc<DropInterceptor>,
        change: Arc<ChangeInterceptor>,
    ) -> Self {
        Self {
            doc,
            drop,
            change,
            relays: RwLock::new(HashMap::new()),
        }
    }

    /// Discover the current surface and attach both protocols, exactly once
    /// per element
    pub fn attach_all(&self) {
        let surface = super::discovery::find_upload_area(self.doc.as_ref());
        self.attach_drop(surface);
        self.attach_inputs();
    }

    fn attach_drop(&self, surface: NodeId) {
        if self.doc.has_marker(surface, DROP_ATTACHED_MARKER) {
            return;
        }
        if let Err(err) = self.doc.set_marker(surface, DROP_ATTACHED_MARKER) {
            tracing::debug!(surface = %surface, error = %err, "Could not mark surface");
            return;
        }
        if let Err(err) = self.drop.install(surface) {
            tracing::debug!(surface = %surface, error = %err, "Drop attachment failed");
        } else {
            tracing::debug!(surface = %surface, "Drop interception attached");
        }
    }

    fn attach_inputs(&self) {
        for input in self.doc.file_inputs(Some(FILE_INPUT_NAME)) {
            if self.doc.has_marker(input, INPUT_ATTACHED_MARKER) {
                continue;
            }
            if self.doc.set_marker(input, INPUT_ATTACHED_MARKER).is_err() {
                continue;
            }
            match self.change.install(input) {
                Ok(()) => {
                    let relay = ChangeRelay::new(Arc::clone(&self.change), input);
                    self.relays.write().insert(input, relay);
                    tracing::debug!(input = %input, "Change interception attached");
                }
                Err(err) => {
                    tracing::debug!(input = %input, error = %err, "Change attachment failed");
                }
            }
        }
    }

    /// The registration adapter for a tracked input, if one is attached
    pub fn relay_for(&self, input: NodeId) -> Option<Arc<ChangeRelay>> {
        self.relays.read().get(&input).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{DomEvent, PageDom};
    use crate::settings::Settings;
    use bytes::Bytes;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    use crate::codec::FileCandidate;

    fn png_file(name: &str) -> FileCandidate {
        let img = RgbaImage::from_pixel(8, 8, image::Rgba([64, 0, 128, 255]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        FileCandidate::new(name, "image/png", Bytes::from(buffer.into_inner()))
    }

    fn tracker_on(page: &PageDom) -> AttachmentTracker {
        let doc: Arc<dyn Document> = Arc::new(page.clone());
        let settings = Settings::default();
        AttachmentTracker::new(
            Arc::clone(&doc),
            DropInterceptor::new(Arc::clone(&doc), settings),
            ChangeInterceptor::new(doc, settings),
        )
    }

    #[tokio::test]
    async fn test_repeated_attach_converts_exactly_once() {
        let page = PageDom::new();
        let body = page.body();
        let area = page.append_container(body, None, &["content_box", "img_upcont"]);
        let input = page.append_file_input(area, Some("files[]"));

        let tracker = tracker_on(&page);
        for _ in 0..5 {
            tracker.attach_all();
        }

        page.seed_files(input, vec![png_file("pic.png")]).unwrap();
        page.dispatch(DomEvent::change(input, true)).await.unwrap();

        let files = page.files(input).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "pic.webp");
    }

    #[tokio::test]
    async fn test_repeated_attach_installs_one_handler_set() {
        let page = PageDom::new();
        let body = page.body();
        let area = page.append_container(body, None, &["content_box", "img_upcont"]);
        let input = page.append_file_input(area, Some("files[]"));

        let tracker = tracker_on(&page);
        tracker.attach_all();
        tracker.attach_all();
        tracker.attach_all();

        // Count synthetic re-dispatches arriving at the body: one handler
        // set produces exactly one
        let synthetic = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let counter = Arc::clone(&synthetic);
        page.add_listener(
            body,
            crate::dom::EventKind::Change,
            crate::dom::Phase::Bubble,
            Arc::new(move |event: DomEvent| {
                let counter = Arc::clone(&counter);
                Box::pin(async move {
                    if !event.trusted {
                        counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                })
            }),
        )
        .unwrap();

        page.seed_files(input, vec![png_file("pic.png")]).unwrap();
        page.dispatch(DomEvent::change(input, true)).await.unwrap();

        assert_eq!(synthetic.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_only_named_inputs_are_tracked() {
        let page = PageDom::new();
        let body = page.body();
        let named = page.append_file_input(body, Some("files[]"));
        let anonymous = page.append_file_input(body, None);

        let tracker = tracker_on(&page);
        tracker.attach_all();

        assert!(tracker.relay_for(named).is_some());
        assert!(tracker.relay_for(anonymous).is_none());
        assert!(page.has_marker(named, INPUT_ATTACHED_MARKER));
        assert!(!page.has_marker(anonymous, INPUT_ATTACHED_MARKER));
    }

    #[test]
    fn test_replacement_surface_gets_fresh_attachment() {
        let page = PageDom::new();
        let body = page.body();
        let area = page.append_container(body, None, &["content_box", "img_upcont"]);

        let tracker = tracker_on(&page);
        tracker.attach_all();
        assert!(page.has_marker(area, DROP_ATTACHED_MARKER));

        // Host re-render: structurally identical new container
        page.remove(area);
        let replacement = page.append_container(body, None, &["content_box", "img_upcont"]);
        tracker.attach_all();

        assert!(page.has_marker(replacement, DROP_ATTACHED_MARKER));
    }
}
