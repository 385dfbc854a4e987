//! Observer registry for client lifecycle events

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use corbel_domain::{ClientEvent, EventPayload};
use parking_lot::Mutex;
use tracing::trace;

/// Event listener. Identity (the `Arc` allocation) is what `on`/`off` compare.
pub type Listener = Arc<dyn Fn(&EventPayload) + Send + Sync>;

/// Per-client listener table.
#[derive(Default)]
pub struct EventBus {
    listeners: Mutex<HashMap<ClientEvent, Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `event`. Registering the same listener twice
    /// is a no-op.
    pub fn on(&self, event: ClientEvent, listener: Listener) {
        let mut listeners = self.listeners.lock();
        let registered = listeners.entry(event).or_default();
        if !registered.iter().any(|existing| Arc::ptr_eq(existing, &listener)) {
            registered.push(listener);
        }
    }

    /// Remove `listener` from `event`. Returns whether it was registered.
    pub fn off(&self, event: ClientEvent, listener: &Listener) -> bool {
        let mut listeners = self.listeners.lock();
        let Some(registered) = listeners.get_mut(&event) else {
            return false;
        };
        let before = registered.len();
        registered.retain(|existing| !Arc::ptr_eq(existing, listener));
        before != registered.len()
    }

    /// Call every listener for `event` in registration order.
    ///
    /// The table is copied before the calls, so listeners may register or
    /// remove listeners. A panicking listener propagates to the caller.
    pub fn trigger(&self, event: ClientEvent, payload: &EventPayload) {
        let listeners = self.listeners.lock().get(&event).cloned().unwrap_or_default();
        trace!(event = %event, listeners = listeners.len(), "Triggering event");
        for listener in listeners {
            listener(payload);
        }
    }

    pub fn listener_count(&self, event: ClientEvent) -> usize {
        self.listeners.lock().get(&event).map_or(0, Vec::len)
    }

    /// Independent copy of the current listener table.
    pub fn fork(&self) -> Self {
        Self { listeners: Mutex::new(self.listeners.lock().clone()) }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.lock();
        let counts: HashMap<_, _> = listeners.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}
