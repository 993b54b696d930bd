//! Host-listener composition adapter
//!
//! The original extension wrapped the input's own event-registration
//! mechanism so that host listeners added later would still run behind
//! interception. Patching a foreign object's methods does not port; the
//! relay is the explicit replacement: host code registers change listeners
//! through it, and every registered listener is wrapped to give interception
//! the first look at the event. The capture-phase listener the interceptor
//! installs directly remains the first line of defense and is sufficient by
//! itself; the relay preserves the ordering guarantee for hosts that
//! register through it.

use std::sync::Arc;

use crate::dom::{DomError, DomEvent, EventKind, Listener, NodeId, Phase};

use super::change::ChangeInterceptor;

/// Registration adapter for one tracked input
pub struct ChangeRelay {
    interceptor: Arc<ChangeInterceptor>,
    input: NodeId,
}

impl ChangeRelay {
    pub(crate) fn new(interceptor: Arc<ChangeInterceptor>, input: NodeId) -> Arc<Self> {
        Arc::new(Self { interceptor, input })
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    /// Register a host change listener behind interception
    ///
    /// The wrapped listener runs interception first, then the host listener;
    /// each swallows its own failures so one cannot starve the other.
    /// Listeners registered while an event is mid-dispatch see the next
    /// event, not the current one.
    pub fn add_change_listener(&self, listener: Listener) -> Result<(), DomError> {
        let interceptor = Arc::clone(&self.interceptor);
        let input = self.input;

        let wrapped: Listener = Arc::new(move |event: DomEvent| {
            let interceptor = Arc::clone(&interceptor);
            let listener = Arc::clone(&listener);
            Box::pin(async move {
                interceptor.handle_change(event.clone(), Some(input)).await;
                listener(event).await;
            })
        });

        self.interceptor
            .doc()
            .add_listener(self.input, EventKind::Change, Phase::Bubble, wrapped)
    }
}
