//! Identity and access management module

mod clients;
mod scopes;
mod token;
mod users;

pub use clients::ClientBuilder;
pub use scopes::ScopeBuilder;
pub use token::{TokenBuilder, TokenParams};
pub(crate) use token::{scope_text, IssuedToken};
pub use users::{UserBuilder, UsersBuilder};

use corbel_domain::{Module, Result};

use super::{consume_domain, join_uri, module_endpoint};
use crate::config::ConfigStore;
use crate::request::RequestOrchestrator;

/// Entry point for identity builders.
#[derive(Debug, Clone)]
pub struct Iam {
    orchestrator: RequestOrchestrator,
}

impl Iam {
    pub const fn new(orchestrator: RequestOrchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn token(&self) -> TokenBuilder {
        TokenBuilder::new(self.orchestrator.context().clone())
    }

    pub fn users(&self) -> UsersBuilder {
        UsersBuilder::new(self.orchestrator.clone())
    }

    /// Builder for one user; `"me"` addresses the logged user.
    pub fn user(&self, id: impl Into<String>) -> UserBuilder {
        UserBuilder::new(self.orchestrator.clone(), id.into())
    }

    /// Builder for collection-level client operations.
    pub fn clients(&self) -> ClientBuilder {
        ClientBuilder::new(self.orchestrator.clone(), None)
    }

    pub fn client(&self, id: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(self.orchestrator.clone(), Some(id.into()))
    }

    pub fn scopes(&self) -> ScopeBuilder {
        ScopeBuilder::new(self.orchestrator.clone(), None)
    }

    pub fn scope(&self, id: impl Into<String>) -> ScopeBuilder {
        ScopeBuilder::new(self.orchestrator.clone(), Some(id.into()))
    }
}

/// `<iam endpoint>/<uri>[/<id>]`
pub(crate) fn build_uri(config: &ConfigStore, uri: &str, id: Option<&str>) -> Result<String> {
    let base = module_endpoint(config, Module::Iam)?;
    Ok(join_uri(&base, &[uri, id.unwrap_or_default()]))
}

/// `<iam endpoint>/<domain>/<uri>[/<id>]`, consuming any one-shot domain
/// override.
pub(crate) fn build_uri_with_domain(
    config: &ConfigStore,
    uri: &str,
    id: Option<&str>,
) -> Result<String> {
    let base = module_endpoint(config, Module::Iam)?;
    let domain = consume_domain(config);
    Ok(join_uri(&base, &[&domain, uri, id.unwrap_or_default()]))
}
