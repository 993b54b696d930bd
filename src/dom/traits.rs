//! Document trait definition
//!
//! This module defines the `Document` trait the interception layer runs
//! against. The trait is the injection seam: production embeds a bridge to a
//! real page, tests and harnesses use [`super::PageDom`].

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use super::event::{DomEvent, EventKind, Listener, Phase};
use super::node::{NodeId, Selector};
use crate::codec::FileCandidate;

#[derive(Error, Debug, Clone)]
pub enum DomError {
    #[error("No such node: #{node}")]
    NoSuchNode { node: u64 },

    #[error("Node #{node} is detached from the document")]
    Detached { node: u64 },

    #[error("Node #{node} is not a file input")]
    NotAFileInput { node: u64 },

    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

/// Structural-change notification delivered to mutation subscribers
///
/// Batches may coalesce several child-list records; subscribers only need
/// the fact that the subtree changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationBatch {
    /// Number of child-list records folded into this batch
    pub records: usize,
}

/// Page load progress, deciding which bootstrap trigger applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

/// The document surface interception consumes
#[async_trait]
pub trait Document: Send + Sync {
    /// The document body; always present, always connected
    fn body(&self) -> NodeId;

    /// First element matching the selector, in document order
    fn query_selector(&self, selector: &Selector) -> Option<NodeId>;

    /// Connected file inputs in document order, optionally restricted to a
    /// name attribute
    fn file_inputs(&self, name: Option<&str>) -> Vec<NodeId>;

    fn is_connected(&self, node: NodeId) -> bool;

    fn is_file_input(&self, node: NodeId) -> bool;

    fn ready_state(&self) -> ReadyState;

    /// The currently focused element, if any
    fn active_element(&self) -> Option<NodeId>;

    /// Nearest file-input ancestor, starting from the node itself
    fn closest_file_input(&self, node: NodeId) -> Option<NodeId>;

    /// Current file list of an input
    fn files(&self, node: NodeId) -> Result<Vec<FileCandidate>, DomError>;

    /// Replace an input's file list wholesale
    fn set_files(&self, node: NodeId, files: Vec<FileCandidate>) -> Result<(), DomError>;

    /// Whether an attachment marker is present on the element
    fn has_marker(&self, node: NodeId, key: &str) -> bool;

    /// Tag the element; the marker lives and dies with it
    fn set_marker(&self, node: NodeId, key: &str) -> Result<(), DomError>;

    /// Register a listener on an element for one event kind and phase
    fn add_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        phase: Phase,
        listener: Listener,
    ) -> Result<(), DomError>;

    /// Run an event through capture, target, and bubble phases
    ///
    /// Listener futures are awaited in order on the cooperative thread;
    /// propagation flags on the event short-circuit the walk.
    async fn dispatch(&self, event: DomEvent) -> Result<(), DomError>;

    /// Subscribe to structural changes under the body
    ///
    /// Every subtree/child-list change produces at least one batch on the
    /// channel; bursts may be coalesced but no change window is missed.
    fn observe_mutations(&self) -> UnboundedReceiver<MutationBatch>;
}
