use corbel_common::validation;
use corbel_domain::{RequestArgs, Result, ServiceResponse};
use serde_json::Value;
use tracing::debug;

use super::build_uri_with_domain;
use crate::modules::{created_id, invalid, with_query};
use crate::request::RequestOrchestrator;

const CLIENT_URI: &str = "client";

/// Client applications registered in the current domain.
///
/// Built without an id for `create`/`get_all`, with one for the rest.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    orchestrator: RequestOrchestrator,
    client_id: Option<String>,
}

impl ClientBuilder {
    pub(crate) const fn new(orchestrator: RequestOrchestrator, client_id: Option<String>) -> Self {
        Self { orchestrator, client_id }
    }

    /// Register a client; resolves to its id.
    pub async fn create(&self, client: Value) -> Result<Option<String>> {
        debug!("Creating client");
        let url = build_uri_with_domain(self.orchestrator.config(), CLIENT_URI, None)?;
        let response = self.orchestrator.request(RequestArgs::post(url).json(client)).await?;
        Ok(created_id(&response))
    }

    pub async fn get(&self) -> Result<ServiceResponse> {
        let id = self.require_id()?;
        let url = build_uri_with_domain(self.orchestrator.config(), CLIENT_URI, Some(id))?;
        self.orchestrator.request(RequestArgs::get(url)).await
    }

    /// List clients. Only valid on a builder without an id.
    pub async fn get_all(&self, query: Option<&str>) -> Result<ServiceResponse> {
        validation::fail_if_defined(
            "clientId",
            self.client_id.as_deref(),
            "This function not allowed client identifier",
        )
        .map_err(invalid)?;
        let url = build_uri_with_domain(self.orchestrator.config(), CLIENT_URI, None)?;
        self.orchestrator.request(with_query(RequestArgs::get(url), query)).await
    }

    pub async fn update(&self, client: Value) -> Result<ServiceResponse> {
        let id = self.require_id()?;
        let url = build_uri_with_domain(self.orchestrator.config(), CLIENT_URI, Some(id))?;
        self.orchestrator.request(RequestArgs::put(url).json(client)).await
    }

    pub async fn remove(&self) -> Result<ServiceResponse> {
        let id = self.require_id()?;
        let url = build_uri_with_domain(self.orchestrator.config(), CLIENT_URI, Some(id))?;
        self.orchestrator.request(RequestArgs::delete(url)).await
    }

    fn require_id(&self) -> Result<&str> {
        validation::non_empty("clientId", self.client_id.as_deref()).map_err(invalid)
    }
}
