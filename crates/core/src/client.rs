//! Client facade
//!
//! [`CorbelClient`] is the handle applications keep. Cloning it is cheap and
//! every clone shares the same config, listeners and refresh state; use
//! [`CorbelClient::fork`] for an independent copy.

use std::sync::Arc;

use corbel_domain::constants::URL_BASE;
use corbel_domain::{
    ClientEvent, ClientSettings, CorbelError, RequestArgs, Result, ServiceResponse,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::TokenProvider;
use crate::config::ConfigStore;
use crate::context::ClientContext;
use crate::events::Listener;
use crate::modules::iam::Iam;
use crate::modules::resources::Resources;
use crate::modules::set_custom_domain;
use crate::ports::{HttpTransport, TokenCodec};
use crate::request::RequestOrchestrator;

#[derive(Debug, Clone)]
pub struct CorbelClient {
    orchestrator: RequestOrchestrator,
}

impl CorbelClient {
    /// Build a client from typed settings.
    ///
    /// # Errors
    /// Returns `CorbelError::Config` when no `urlBase` is configured.
    pub fn new(
        settings: ClientSettings,
        transport: Arc<dyn HttpTransport>,
        codec: Arc<dyn TokenCodec>,
    ) -> Result<Self> {
        Self::from_config(ConfigStore::from_settings(settings), transport, codec)
    }

    /// Build a client over an already populated config store.
    ///
    /// # Errors
    /// Returns `CorbelError::Config` when no `urlBase` is configured.
    pub fn from_config(
        config: ConfigStore,
        transport: Arc<dyn HttpTransport>,
        codec: Arc<dyn TokenCodec>,
    ) -> Result<Self> {
        if config.get_str(URL_BASE).filter(|url| !url.is_empty()).is_none() {
            return Err(CorbelError::Config(format!("{URL_BASE} must be configured")));
        }

        let ctx = Arc::new(ClientContext::new(config, transport, codec));
        info!(guid = %ctx.guid(), "Corbel client created");
        Ok(Self { orchestrator: RequestOrchestrator::new(ctx) })
    }

    pub fn guid(&self) -> Uuid {
        self.context().guid()
    }

    pub fn config(&self) -> &ConfigStore {
        self.context().config()
    }

    pub fn context(&self) -> &Arc<ClientContext> {
        self.orchestrator.context()
    }

    /// Independent client with a snapshot of this one's config and
    /// listeners.
    #[must_use]
    pub fn fork(&self) -> Self {
        let ctx = Arc::new(self.context().fork());
        Self { orchestrator: RequestOrchestrator::new(ctx) }
    }

    pub fn on(&self, event: ClientEvent, listener: Listener) {
        self.context().events().on(event, listener);
    }

    pub fn off(&self, event: ClientEvent, listener: &Listener) -> bool {
        self.context().events().off(event, listener)
    }

    /// Send a request through the orchestrator.
    ///
    /// # Errors
    /// Returns the terminal failure after any token refresh and retry.
    pub async fn request(&self, args: RequestArgs) -> Result<ServiceResponse> {
        self.orchestrator.request(args).await
    }

    pub const fn orchestrator(&self) -> &RequestOrchestrator {
        &self.orchestrator
    }

    pub fn token_provider(&self) -> TokenProvider {
        TokenProvider::new(self.context().clone())
    }

    pub fn iam(&self) -> Iam {
        Iam::new(self.orchestrator.clone())
    }

    pub fn resources(&self) -> Resources {
        Resources::new(self.orchestrator.clone())
    }

    /// Address the next domain-scoped request to domain `id`.
    pub fn domain(&self, id: &str) -> &Self {
        set_custom_domain(self.config(), id);
        self
    }
}
