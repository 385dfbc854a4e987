//! Typed client settings
//!
//! `ClientSettings` is what loaders produce from the environment or a file.
//! The client flattens it into its key/value config store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{AUDIENCE, CLIENT_ID, CLIENT_SECRET, SCOPES, URL_BASE};
use crate::types::Module;

/// Credentials, base URL and per-module overrides for one client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// URL template, may contain `{{module}}` and `{{modulePort}}`.
    pub url_base: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Space-separated scopes requested when issuing tokens.
    pub scopes: Option<String>,
    pub audience: Option<String>,
    /// Full endpoint overrides keyed by module.
    pub endpoints: BTreeMap<Module, String>,
    /// Port overrides keyed by module.
    pub ports: BTreeMap<Module, u16>,
    pub transport: TransportSettings,
    /// Free-form entries copied verbatim into the config store.
    pub extra: BTreeMap<String, Value>,
}

/// Settings consumed by the HTTP transport, not stored in the config map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportSettings {
    pub timeout_secs: u64,
    /// Attempts per exchange for transient network errors (1 = no retry).
    pub max_attempts: u32,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self { timeout_secs: 30, max_attempts: 1 }
    }
}

impl ClientSettings {
    #[must_use]
    pub fn new(url_base: impl Into<String>) -> Self {
        Self { url_base: Some(url_base.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    #[must_use]
    pub fn with_scopes(mut self, scopes: impl Into<String>) -> Self {
        self.scopes = Some(scopes.into());
        self
    }

    #[must_use]
    pub fn with_endpoint(mut self, module: Module, endpoint: impl Into<String>) -> Self {
        self.endpoints.insert(module, endpoint.into());
        self
    }

    #[must_use]
    pub fn with_port(mut self, module: Module, port: u16) -> Self {
        self.ports.insert(module, port);
        self
    }

    /// Flatten into config-store entries (`urlBase`, `clientId`,
    /// `<module>Endpoint`, `<module>Port`, extras).
    #[must_use]
    pub fn into_entries(self) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        let named = [
            (URL_BASE, self.url_base),
            (CLIENT_ID, self.client_id),
            (CLIENT_SECRET, self.client_secret),
            (SCOPES, self.scopes),
            (AUDIENCE, self.audience),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                entries.push((key.to_string(), Value::String(value)));
            }
        }
        for (module, endpoint) in self.endpoints {
            entries.push((module.endpoint_key(), Value::String(endpoint)));
        }
        for (module, port) in self.ports {
            entries.push((module.port_key(), Value::from(port)));
        }
        entries.extend(self.extra);
        entries
    }
}
