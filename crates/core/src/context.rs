//! Per-client shared state
//!
//! Everything one client instance owns: configuration, listeners, the
//! transport and codec ports, and the in-flight token refresh. Services hold
//! it behind an `Arc`; there is no process-wide state.

use std::fmt;
use std::sync::Arc;

use corbel_domain::{Result, ServiceResponse};
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::config::ConfigStore;
use crate::events::EventBus;
use crate::ports::{HttpTransport, TokenCodec};

/// Refresh outcome shared by every caller waiting on it.
pub type SharedRefresh = Shared<BoxFuture<'static, Result<ServiceResponse>>>;

pub struct ClientContext {
    guid: Uuid,
    config: ConfigStore,
    events: EventBus,
    transport: Arc<dyn HttpTransport>,
    codec: Arc<dyn TokenCodec>,
    pending_refresh: Mutex<Option<SharedRefresh>>,
}

impl ClientContext {
    pub fn new(
        config: ConfigStore,
        transport: Arc<dyn HttpTransport>,
        codec: Arc<dyn TokenCodec>,
    ) -> Self {
        Self::with_events(config, EventBus::new(), transport, codec)
    }

    fn with_events(
        config: ConfigStore,
        events: EventBus,
        transport: Arc<dyn HttpTransport>,
        codec: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            guid: Uuid::new_v4(),
            config,
            events,
            transport,
            codec,
            pending_refresh: Mutex::new(None),
        }
    }

    pub const fn guid(&self) -> Uuid {
        self.guid
    }

    pub const fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    pub fn codec(&self) -> &dyn TokenCodec {
        self.codec.as_ref()
    }

    /// Join the in-flight refresh, or install the one built by `start`.
    ///
    /// The check and the install happen under one lock, so concurrent callers
    /// always end up sharing a single future.
    pub(crate) fn join_or_start_refresh(
        &self,
        start: impl FnOnce() -> BoxFuture<'static, Result<ServiceResponse>>,
    ) -> (SharedRefresh, bool) {
        let mut pending = self.pending_refresh.lock();
        if let Some(existing) = pending.as_ref() {
            return (existing.clone(), false);
        }
        let refresh = futures::FutureExt::shared(start());
        *pending = Some(refresh.clone());
        (refresh, true)
    }

    pub(crate) fn clear_pending_refresh(&self) {
        self.pending_refresh.lock().take();
    }

    pub fn has_pending_refresh(&self) -> bool {
        self.pending_refresh.lock().is_some()
    }

    /// New context with a copy of the config and listeners, the same ports,
    /// a fresh guid and no pending refresh.
    pub fn fork(&self) -> Self {
        Self::with_events(
            ConfigStore::from_entries(self.config.snapshot()),
            self.events.fork(),
            self.transport.clone(),
            self.codec.clone(),
        )
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("guid", &self.guid)
            .field("events", &self.events)
            .field("pending_refresh", &self.has_pending_refresh())
            .finish_non_exhaustive()
    }
}
