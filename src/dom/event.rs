//! Event model for the DOM adapter
//!
//! Events carry shared propagation flags so every listener on the chain
//! observes a stop requested by an earlier one. The `trusted` flag
//! distinguishes genuine user actions from the synthetic change events this
//! crate dispatches after replacement; the whole recursion guard of the
//! change protocol hangs on it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::node::NodeId;
use crate::codec::FileCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DragOver,
    Drop,
    Change,
    DomContentLoaded,
    Load,
}

/// Listener phase, mirroring DOM capture/bubble registration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

#[derive(Debug, Default)]
struct EventFlags {
    stop_propagation: AtomicBool,
    stop_immediate: AtomicBool,
    prevent_default: AtomicBool,
}

/// An event traveling through the adapter's dispatch
#[derive(Debug, Clone)]
pub struct DomEvent {
    pub kind: EventKind,
    pub target: Option<NodeId>,
    /// The element whose listener is currently running
    pub current_target: Option<NodeId>,
    /// Genuine user action, as opposed to a synthetic re-dispatch
    pub trusted: bool,
    pub bubbles: bool,
    /// Drop payload: the dragged file list; `None` for other kinds
    pub files: Option<Vec<FileCandidate>>,
    flags: Arc<EventFlags>,
}

impl DomEvent {
    pub fn new(kind: EventKind, target: Option<NodeId>, trusted: bool, bubbles: bool) -> Self {
        Self {
            kind,
            target,
            current_target: None,
            trusted,
            bubbles,
            files: None,
            flags: Arc::new(EventFlags::default()),
        }
    }

    /// A genuine drop carrying the dragged files
    pub fn drop_with_files(target: NodeId, files: Vec<FileCandidate>) -> Self {
        let mut event = Self::new(EventKind::Drop, Some(target), true, true);
        event.files = Some(files);
        event
    }

    /// A genuine dragover
    pub fn drag_over(target: NodeId) -> Self {
        Self::new(EventKind::DragOver, Some(target), true, true)
    }

    /// A change event on an input; synthetic dispatches pass `trusted: false`
    pub fn change(target: NodeId, trusted: bool) -> Self {
        Self::new(EventKind::Change, Some(target), trusted, true)
    }

    pub fn prevent_default(&self) {
        self.flags.prevent_default.store(true, Ordering::Relaxed);
    }

    pub fn default_prevented(&self) -> bool {
        self.flags.prevent_default.load(Ordering::Relaxed)
    }

    /// Stop the event after the current element's listeners finish
    pub fn stop_propagation(&self) {
        self.flags.stop_propagation.store(true, Ordering::Relaxed);
    }

    /// Stop the event before any further listener runs, including listeners
    /// on the same element and phase
    pub fn stop_immediate_propagation(&self) {
        self.flags.stop_propagation.store(true, Ordering::Relaxed);
        self.flags.stop_immediate.store(true, Ordering::Relaxed);
    }

    pub fn propagation_stopped(&self) -> bool {
        self.flags.stop_propagation.load(Ordering::Relaxed)
    }

    pub fn immediate_propagation_stopped(&self) -> bool {
        self.flags.stop_immediate.load(Ordering::Relaxed)
    }

    /// The view of this event a listener on `current` receives
    pub(crate) fn at(&self, current: NodeId) -> Self {
        let mut event = self.clone();
        event.current_target = Some(current);
        event
    }
}

/// Boxed future a listener returns; dispatch awaits each in turn
pub type ListenerFuture = futures::future::BoxFuture<'static, ()>;

/// An event listener: clones of the event share propagation state
pub type Listener = Arc<dyn Fn(DomEvent) -> ListenerFuture + Send + Sync>;
