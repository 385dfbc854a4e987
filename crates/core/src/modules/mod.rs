//! Resource builders
//!
//! Thin URL and payload builders layered on the orchestrator. Each builder
//! holds a [`RequestOrchestrator`] and resolves its module's base URL from
//! the client config on every call.

pub mod domain;
pub mod iam;
pub mod resources;

pub use domain::{consume_domain, set_custom_domain};

use corbel_common::validation::ValidationError;
use corbel_domain::{CorbelError, Module, RequestArgs, Result, ServiceResponse};

use crate::config::ConfigStore;

/// Base URL of `module`, honouring `<module>Endpoint` and `<module>Port`.
///
/// # Errors
/// Returns `CorbelError::ConfigKeyMissing` when no base URL is configured.
pub fn module_endpoint(config: &ConfigStore, module: Module) -> Result<String> {
    let port = config.get_port(&module.port_key()).unwrap_or_else(|| module.default_port());
    config.get_current_endpoint(module.as_str(), Some(port))
}

/// Join non-empty segments onto `base` with single slashes.
pub fn join_uri(base: &str, segments: &[&str]) -> String {
    let mut uri = base.trim_end_matches('/').to_string();
    for segment in segments.iter().filter(|s| !s.is_empty()) {
        uri.push('/');
        uri.push_str(segment.trim_matches('/'));
    }
    uri
}

pub(crate) fn invalid(err: ValidationError) -> CorbelError {
    CorbelError::Validation(err.to_string())
}

/// Attach a pre-serialized query string, ignoring empty ones.
pub(crate) fn with_query(args: RequestArgs, query: Option<&str>) -> RequestArgs {
    match query {
        Some(query) if !query.is_empty() => args.query(query),
        _ => args,
    }
}

/// Identifier of a created entity, taken from the `Location` header.
pub(crate) fn created_id(response: &ServiceResponse) -> Option<String> {
    response.location_id().map(str::to_string)
}
