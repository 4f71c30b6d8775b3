//! Process-wide languages-changed broadcast.
//!
//! A single publish point: lifecycle coordinators fire after every
//! state transition, tree-view collaborators subscribe to refresh.
//! No payload and no queuing; each fire invokes every handler that was
//! registered when the fire began, synchronously.
use std::sync::{Arc, Mutex};

/// Callback type for languages-changed subscribers.
pub type ChangeHandler = Arc<dyn Fn() + Send + Sync>;

/// Identifies a subscription so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Broadcast hub for the "set of installed languages changed" signal.
pub struct EventHub {
    inner: Mutex<HubInner>,
}

struct HubInner {
    handlers: Vec<(SubscriptionId, ChangeHandler)>,
    next_id: u64,
}

impl EventHub {
    /// Create a hub with no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HubInner {
                handlers: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Register a handler invoked on every languages-changed fire.
    pub fn on_languages_changed<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.handlers.push((id, Arc::new(handler)));
        id
    }

    /// Remove a subscription. Returns true if it was present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = inner.handlers.len();
        inner.handlers.retain(|(sid, _)| *sid != id);
        inner.handlers.len() != before
    }

    /// Number of active subscriptions.
    pub fn subscriber_count(&self) -> usize {
        match self.inner.lock() {
            Ok(guard) => guard.handlers.len(),
            Err(poisoned) => poisoned.into_inner().handlers.len(),
        }
    }

    /// Fire the languages-changed signal.
    ///
    /// The handler list is snapshotted before invocation, so a handler
    /// may subscribe or unsubscribe without deadlocking; handlers added
    /// during a fire run from the next fire on.
    pub fn fire_languages_changed(&self) {
        let snapshot: Vec<ChangeHandler> = {
            let inner = match self.inner.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            inner.handlers.iter().map(|(_, h)| h.clone()).collect()
        };
        tracing::debug!(subscribers = snapshot.len(), "languages changed");
        for handler in snapshot {
            handler();
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}
