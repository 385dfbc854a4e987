//! Per-client key/value configuration
//!
//! Holds credentials, base URLs, per-module overrides, the current token and
//! the retry counters. Nothing is persisted; the store lives as long as the
//! client that owns it.

use std::collections::HashMap;

use corbel_domain::constants::{
    IAM_TOKEN, URL_BASE, URL_BASE_PLACEHOLDER, URL_BASE_PORT_PLACEHOLDER,
};
use corbel_domain::{ClientSettings, CorbelError, IamToken, Result};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::warn;

/// Shared mutable configuration map.
///
/// Every accessor takes the lock for the duration of one call only, so the
/// store can be used freely from async code.
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self { entries: RwLock::new(entries.into_iter().collect()) }
    }

    pub fn from_settings(settings: ClientSettings) -> Self {
        Self::from_entries(settings.into_entries())
    }

    /// Stored value for `key`.
    ///
    /// # Errors
    /// Returns [`CorbelError::ConfigKeyMissing`] when the key is absent.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| CorbelError::ConfigKeyMissing(key.to_string()))
    }

    /// Stored value for `key`, or `default` (which is not stored).
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.entries.read().get(key).cloned().unwrap_or(default)
    }

    /// String value for `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).and_then(Value::as_str).map(str::to_string)
    }

    /// String value for `key`.
    ///
    /// # Errors
    /// Returns [`CorbelError::ConfigKeyMissing`] when absent or not a string.
    pub fn require_str(&self, key: &str) -> Result<String> {
        self.get_str(key).ok_or_else(|| CorbelError::ConfigKeyMissing(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.write().insert(key.into(), value.into());
    }

    /// Remove `key`; later lookups treat it as never set.
    pub fn unset(&self, key: &str) -> Option<Value> {
        self.entries.write().remove(key)
    }

    /// Remove `key` and return its string value, if any.
    pub fn take_str(&self, key: &str) -> Option<String> {
        match self.unset(key)? {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Copy of every entry.
    pub fn snapshot(&self) -> HashMap<String, Value> {
        self.entries.read().clone()
    }

    /// Insert or overwrite every given entry.
    pub fn merge(&self, entries: impl IntoIterator<Item = (String, Value)>) {
        self.entries.write().extend(entries);
    }

    /// Resolve a module's base URL.
    ///
    /// Uses `<module>Endpoint` when set, else `urlBase`, then substitutes
    /// `{{module}}` and (if a port is given) `{{modulePort}}`.
    ///
    /// # Errors
    /// Returns [`CorbelError::ConfigKeyMissing`] for `urlBase` when neither
    /// key is set.
    pub fn get_current_endpoint(&self, module_name: &str, port: Option<u16>) -> Result<String> {
        let endpoint_key = format!("{module_name}Endpoint");
        let endpoint = match self.get_str(&endpoint_key).filter(|e| !e.is_empty()) {
            Some(endpoint) => endpoint,
            None => self.require_str(URL_BASE)?,
        };

        let endpoint = endpoint.replace(URL_BASE_PLACEHOLDER, module_name);
        Ok(match port {
            Some(port) => endpoint.replace(URL_BASE_PORT_PLACEHOLDER, &port.to_string()),
            None => endpoint,
        })
    }

    /// Port override stored under `key`, accepting numbers or numeric strings.
    pub fn get_port(&self, key: &str) -> Option<u16> {
        match self.entries.read().get(key)? {
            Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Current token object, if one is stored and readable.
    pub fn token(&self) -> Option<IamToken> {
        let value = self.entries.read().get(IAM_TOKEN).cloned()?;
        match serde_json::from_value(value) {
            Ok(token) => Some(token),
            Err(err) => {
                warn!(error = %err, "Stored token object is not readable");
                None
            }
        }
    }

    /// Access token of the stored token object.
    pub fn access_token(&self) -> Option<String> {
        self.entries
            .read()
            .get(IAM_TOKEN)
            .and_then(|token| token.get("accessToken"))
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }

    /// Refresh token of the stored token object.
    ///
    /// Read from the raw entry, so a token whose other fields do not parse
    /// can still be refreshed.
    pub fn refresh_token(&self) -> Option<String> {
        self.entries
            .read()
            .get(IAM_TOKEN)
            .and_then(|token| token.get("refreshToken"))
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
    }

    /// Retry counter stored under `key`; absent counts as 0.
    pub fn counter(&self, key: &str) -> u64 {
        self.entries.read().get(key).and_then(Value::as_u64).unwrap_or(0)
    }

    pub fn set_counter(&self, key: &str, value: u64) {
        self.set(key, value);
    }
}
