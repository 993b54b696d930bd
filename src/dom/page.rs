//! In-memory document implementation
//!
//! Backs the test suite and any harness driving the pipeline without a
//! rendering engine. Structure is a plain tree of containers and file
//! inputs under a body node; dispatch walks capture → target → bubble and
//! honors the propagation flags on the event.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::event::{DomEvent, EventKind, Listener, Phase};
use super::node::{ElementKind, NodeId, Selector};
use super::traits::{Document, DomError, MutationBatch, ReadyState};
use crate::codec::FileCandidate;

struct ElementData {
    kind: ElementKind,
    id: Option<String>,
    classes: Vec<String>,
    name: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    files: Vec<FileCandidate>,
    markers: HashSet<String>,
    listeners: Vec<(EventKind, Phase, Listener)>,
    connected: bool,
}

impl ElementData {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            id: None,
            classes: Vec::new(),
            name: None,
            parent: None,
            children: Vec::new(),
            files: Vec::new(),
            markers: HashSet::new(),
            listeners: Vec::new(),
            connected: true,
        }
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Classes(classes) => classes.iter().all(|c| self.classes.contains(c)),
            Selector::Id(id) => self.id.as_deref() == Some(id.as_str()),
        }
    }
}

struct PageState {
    arena: HashMap<NodeId, ElementData>,
    body: NodeId,
    next_id: u64,
    ready_state: ReadyState,
    active: Option<NodeId>,
}

impl PageState {
    /// Depth-first walk from the body, yielding connected nodes in document
    /// order
    fn document_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.arena.len());
        let mut stack = vec![self.body];
        while let Some(node) = stack.pop() {
            if let Some(data) = self.arena.get(&node) {
                if !data.connected {
                    continue;
                }
                order.push(node);
                for &child in data.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        order
    }

    /// Ancestor chain root-first, ending with the node itself
    fn propagation_path(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = self.arena.get(&current).and_then(|d| d.parent) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }
}

/// In-memory page the pipeline attaches to
#[derive(Clone)]
pub struct PageDom {
    state: Arc<RwLock<PageState>>,
    observers: Arc<RwLock<Vec<UnboundedSender<MutationBatch>>>>,
}

impl Default for PageDom {
    fn default() -> Self {
        Self::new()
    }
}

impl PageDom {
    pub fn new() -> Self {
        let body_id = NodeId(1);
        let mut arena = HashMap::new();
        arena.insert(body_id, ElementData::new(ElementKind::Body));

        Self {
            state: Arc::new(RwLock::new(PageState {
                arena,
                body: body_id,
                next_id: 2,
                ready_state: ReadyState::Interactive,
                active: None,
            })),
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    fn insert(&self, parent: NodeId, data: ElementData) -> NodeId {
        let node = {
            let mut state = self.state.write();
            let node = NodeId(state.next_id);
            state.next_id += 1;

            let mut data = data;
            data.parent = Some(parent);
            data.connected = state
                .arena
                .get(&parent)
                .map(|p| p.connected)
                .unwrap_or(false);
            state.arena.insert(node, data);
            if let Some(parent_data) = state.arena.get_mut(&parent) {
                parent_data.children.push(node);
            }
            node
        };
        self.notify_mutation();
        node
    }

    /// Append a container element
    pub fn append_container(
        &self,
        parent: NodeId,
        id: Option<&str>,
        classes: &[&str],
    ) -> NodeId {
        let mut data = ElementData::new(ElementKind::Container);
        data.id = id.map(str::to_string);
        data.classes = classes.iter().map(|c| (*c).to_string()).collect();
        self.insert(parent, data)
    }

    /// Append a file input, optionally with a name attribute
    pub fn append_file_input(&self, parent: NodeId, name: Option<&str>) -> NodeId {
        let mut data = ElementData::new(ElementKind::FileInput);
        data.name = name.map(str::to_string);
        self.insert(parent, data)
    }

    /// Detach an element and its subtree from the document
    pub fn remove(&self, node: NodeId) {
        {
            let mut state = self.state.write();
            if let Some(parent) = state.arena.get(&node).and_then(|d| d.parent) {
                if let Some(parent_data) = state.arena.get_mut(&parent) {
                    parent_data.children.retain(|&c| c != node);
                }
            }
            if let Some(data) = state.arena.get_mut(&node) {
                data.parent = None;
            }

            let mut stack = vec![node];
            while let Some(current) = stack.pop() {
                if let Some(data) = state.arena.get_mut(&current) {
                    data.connected = false;
                    stack.extend(data.children.iter().copied());
                }
            }

            if state.active == Some(node) {
                state.active = None;
            }
        }
        self.notify_mutation();
    }

    /// Focus an element, or clear focus with `None`
    pub fn set_active_element(&self, node: Option<NodeId>) {
        self.state.write().active = node;
    }

    pub fn set_ready_state(&self, ready_state: ReadyState) {
        self.state.write().ready_state = ready_state;
    }

    /// Populate an input's file list without firing anything, as if the user
    /// had picked the files but the event is dispatched separately
    pub fn seed_files(&self, node: NodeId, files: Vec<FileCandidate>) -> Result<(), DomError> {
        self.set_files(node, files)
    }

    fn notify_mutation(&self) {
        self.observers
            .write()
            .retain(|tx| tx.send(MutationBatch { records: 1 }).is_ok());
    }

    fn listener_snapshot(&self, node: NodeId, kind: EventKind, phase: Phase) -> Vec<Listener> {
        let state = self.state.read();
        state
            .arena
            .get(&node)
            .map(|data| {
                data.listeners
                    .iter()
                    .filter(|(k, p, _)| *k == kind && *p == phase)
                    .map(|(_, _, listener)| Arc::clone(listener))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Run one element's listeners for one phase; true means the walk must
    /// halt immediately
    async fn run_listeners(&self, node: NodeId, event: &DomEvent, phase: Phase) -> bool {
        let listeners = self.listener_snapshot(node, event.kind, phase);
        for listener in listeners {
            if event.immediate_propagation_stopped() {
                return true;
            }
            listener(event.at(node)).await;
        }
        event.immediate_propagation_stopped()
    }
}

#[async_trait]
impl Document for PageDom {
    fn body(&self) -> NodeId {
        self.state.read().body
    }

    fn query_selector(&self, selector: &Selector) -> Option<NodeId> {
        let state = self.state.read();
        state
            .document_order()
            .into_iter()
            .find(|node| state.arena.get(node).is_some_and(|d| d.matches(selector)))
    }

    fn file_inputs(&self, name: Option<&str>) -> Vec<NodeId> {
        let state = self.state.read();
        state
            .document_order()
            .into_iter()
            .filter(|node| {
                state.arena.get(node).is_some_and(|d| {
                    d.kind == ElementKind::FileInput
                        && name.map_or(true, |n| d.name.as_deref() == Some(n))
                })
            })
            .collect()
    }

    fn is_connected(&self, node: NodeId) -> bool {
        self.state
            .read()
            .arena
            .get(&node)
            .map(|d| d.connected)
            .unwrap_or(false)
    }

    fn is_file_input(&self, node: NodeId) -> bool {
        self.state
            .read()
            .arena
            .get(&node)
            .map(|d| d.kind == ElementKind::FileInput)
            .unwrap_or(false)
    }

    fn ready_state(&self) -> ReadyState {
        self.state.read().ready_state
    }

    fn active_element(&self) -> Option<NodeId> {
        self.state.read().active
    }

    fn closest_file_input(&self, node: NodeId) -> Option<NodeId> {
        let state = self.state.read();
        let mut current = Some(node);
        while let Some(candidate) = current {
            match state.arena.get(&candidate) {
                Some(data) if data.kind == ElementKind::FileInput => return Some(candidate),
                Some(data) => current = data.parent,
                None => return None,
            }
        }
        None
    }

    fn files(&self, node: NodeId) -> Result<Vec<FileCandidate>, DomError> {
        let state = self.state.read();
        let data = state
            .arena
            .get(&node)
            .ok_or(DomError::NoSuchNode { node: node.0 })?;
        if data.kind != ElementKind::FileInput {
            return Err(DomError::NotAFileInput { node: node.0 });
        }
        Ok(data.files.clone())
    }

    fn set_files(&self, node: NodeId, files: Vec<FileCandidate>) -> Result<(), DomError> {
        let mut state = self.state.write();
        let data = state
            .arena
            .get_mut(&node)
            .ok_or(DomError::NoSuchNode { node: node.0 })?;
        if data.kind != ElementKind::FileInput {
            return Err(DomError::NotAFileInput { node: node.0 });
        }
        data.files = files;
        Ok(())
    }

    fn has_marker(&self, node: NodeId, key: &str) -> bool {
        self.state
            .read()
            .arena
            .get(&node)
            .map(|d| d.markers.contains(key))
            .unwrap_or(false)
    }

    fn set_marker(&self, node: NodeId, key: &str) -> Result<(), DomError> {
        let mut state = self.state.write();
        let data = state
            .arena
            .get_mut(&node)
            .ok_or(DomError::NoSuchNode { node: node.0 })?;
        data.markers.insert(key.to_string());
        Ok(())
    }

    fn add_listener(
        &self,
        node: NodeId,
        kind: EventKind,
        phase: Phase,
        listener: Listener,
    ) -> Result<(), DomError> {
        let mut state = self.state.write();
        let data = state
            .arena
            .get_mut(&node)
            .ok_or(DomError::NoSuchNode { node: node.0 })?;
        data.listeners.push((kind, phase, listener));
        Ok(())
    }

    async fn dispatch(&self, event: DomEvent) -> Result<(), DomError> {
        let target = event
            .target
            .ok_or_else(|| DomError::Dispatch("event has no target".to_string()))?;

        let path = {
            let state = self.state.read();
            let data = state
                .arena
                .get(&target)
                .ok_or(DomError::NoSuchNode { node: target.0 })?;
            if !data.connected {
                return Err(DomError::Detached { node: target.0 });
            }
            state.propagation_path(target)
        };
        let ancestors = &path[..path.len() - 1];

        // Capture phase, root towards target
        for &node in ancestors {
            if self.run_listeners(node, &event, Phase::Capture).await {
                return Ok(());
            }
            if event.propagation_stopped() {
                return Ok(());
            }
        }

        // Target phase: capture-registered listeners first, then
        // bubble-registered, one element
        for phase in [Phase::Capture, Phase::Bubble] {
            if self.run_listeners(target, &event, phase).await {
                return Ok(());
            }
        }
        if event.propagation_stopped() {
            return Ok(());
        }

        // Bubble phase, target towards root
        if event.bubbles {
            for &node in ancestors.iter().rev() {
                if self.run_listeners(node, &event, Phase::Bubble).await {
                    return Ok(());
                }
                if event.propagation_stopped() {
                    return Ok(());
                }
            }
        }

        Ok(())
    }

    fn observe_mutations(&self) -> UnboundedReceiver<MutationBatch> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.write().push(tx);
        rx
    }
}

/// Let deferred work spawned by listeners (synthetic dispatches) run to
/// completion on the cooperative runtime
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
