//! Domain selection for domain-scoped URIs

use corbel_domain::constants::{CUSTOM_DOMAIN, IAM_DOMAIN, UNAUTHENTICATED_DOMAIN};
use tracing::debug;

use crate::config::ConfigStore;

/// Route the next domain-scoped URI to `id` instead of the token's domain.
pub fn set_custom_domain(config: &ConfigStore, id: &str) {
    debug!(domain = id, "Custom domain set for next request");
    config.set(CUSTOM_DOMAIN, id);
}

/// Domain for the next domain-scoped URI.
///
/// A `customDomain` override applies to exactly one URI and is cleared when
/// read; otherwise the token's domain, or `unauthenticated`.
pub fn consume_domain(config: &ConfigStore) -> String {
    config
        .take_str(CUSTOM_DOMAIN)
        .or_else(|| config.get_str(IAM_DOMAIN))
        .unwrap_or_else(|| UNAUTHENTICATED_DOMAIN.to_string())
}
