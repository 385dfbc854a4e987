use corbel_common::validation;
use corbel_domain::{RequestArgs, Result, ServiceResponse};
use serde_json::Value;

use super::build_uri_with_domain;
use crate::modules::{created_id, invalid};
use crate::request::RequestOrchestrator;

const SCOPE_URI: &str = "scope";

#[derive(Debug, Clone)]
pub struct ScopeBuilder {
    orchestrator: RequestOrchestrator,
    id: Option<String>,
}

impl ScopeBuilder {
    pub(crate) const fn new(orchestrator: RequestOrchestrator, id: Option<String>) -> Self {
        Self { orchestrator, id }
    }

    /// Define a scope; resolves to its id. Only valid without an id.
    pub async fn create(&self, scope: Value) -> Result<Option<String>> {
        validation::fail_if_defined(
            "id",
            self.id.as_deref(),
            "This function not allowed scope identifier",
        )
        .map_err(invalid)?;
        let url = build_uri_with_domain(self.orchestrator.config(), SCOPE_URI, None)?;
        let response = self.orchestrator.request(RequestArgs::post(url).json(scope)).await?;
        Ok(created_id(&response))
    }

    pub async fn get(&self) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(RequestArgs::get(url)).await
    }

    pub async fn remove(&self) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(RequestArgs::delete(url)).await
    }

    fn url(&self) -> Result<String> {
        let id = validation::non_empty("id", self.id.as_deref()).map_err(invalid)?;
        build_uri_with_domain(self.orchestrator.config(), SCOPE_URI, Some(id))
    }
}
