//! Normalized transport responses

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::FORCE_UPDATE_TEXT;

/// Parsed response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ResponseData {
    /// No body, or a body the request did not ask to be parsed.
    #[default]
    Empty,
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
}

impl ResponseData {
    /// JSON payload, if the body was parsed as JSON.
    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Convert the body into a JSON value (text becomes a JSON string).
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value.clone(),
            Self::Text(text) => Value::String(text.clone()),
            Self::Binary(bytes) => Value::Array(bytes.iter().map(|b| Value::from(*b)).collect()),
        }
    }
}

/// Outcome of one HTTP exchange, shared by success and failure paths.
///
/// Header names are stored lower-cased. `error` is set on failures: the
/// transport's error text for network failures (status 0) or the reason
/// phrase for error statuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ServiceResponse {
    pub status: u16,
    #[serde(default)]
    pub data: ResponseData,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceResponse {
    #[must_use]
    pub fn new(status: u16, data: ResponseData) -> Self {
        Self { status, data, headers: BTreeMap::new(), error: None }
    }

    /// Response representing a request that never reached the server.
    #[must_use]
    pub fn network_failure(message: impl Into<String>) -> Self {
        Self { status: 0, data: ResponseData::Empty, headers: BTreeMap::new(), error: Some(message.into()) }
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// 1xx, 2xx and 3xx statuses resolve; everything else rejects.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status != 0 && self.status < 400
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Full `Location` header value.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.header("location")
    }

    /// Last path segment of the `Location` header, i.e. the id of a created
    /// entity.
    #[must_use]
    pub fn location_id(&self) -> Option<&str> {
        self.location().map(|location| location.rsplit('/').next().unwrap_or(location))
    }

    /// Whether the server flagged this client version as unsupported.
    ///
    /// The marker can arrive as the status text, as a plain-text body, or as
    /// the `error` field of a JSON body.
    #[must_use]
    pub fn has_force_update_marker(&self) -> bool {
        if self.error.as_deref() == Some(FORCE_UPDATE_TEXT) {
            return true;
        }
        match &self.data {
            ResponseData::Text(text) => text.trim() == FORCE_UPDATE_TEXT,
            ResponseData::Json(Value::String(text)) => text == FORCE_UPDATE_TEXT,
            ResponseData::Json(Value::Object(map)) => {
                map.get("error").and_then(Value::as_str) == Some(FORCE_UPDATE_TEXT)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn location_id_is_last_segment() {
        let response = ServiceResponse::new(201, ResponseData::Empty)
            .with_header("Location", "http://iam/v1.0/domain/user/abc123");
        assert_eq!(response.location(), Some("http://iam/v1.0/domain/user/abc123"));
        assert_eq!(response.location_id(), Some("abc123"));
    }

    #[test]
    fn location_missing() {
        let response = ServiceResponse::new(200, ResponseData::Empty);
        assert_eq!(response.location_id(), None);
    }

    #[test]
    fn success_classification() {
        assert!(ServiceResponse::new(200, ResponseData::Empty).is_success());
        assert!(ServiceResponse::new(304, ResponseData::Empty).is_success());
        assert!(!ServiceResponse::new(401, ResponseData::Empty).is_success());
        assert!(!ServiceResponse::network_failure("refused").is_success());
    }

    #[test]
    fn force_update_marker_variants() {
        let as_error = ServiceResponse::new(403, ResponseData::Empty).with_error("unsupported_version");
        let as_text = ServiceResponse::new(403, ResponseData::Text("unsupported_version".into()));
        let as_json = ServiceResponse::new(403, ResponseData::Json(json!({"error": "unsupported_version"})));
        let other = ServiceResponse::new(403, ResponseData::Json(json!({"error": "forbidden"})));

        assert!(as_error.has_force_update_marker());
        assert!(as_text.has_force_update_marker());
        assert!(as_json.has_force_update_marker());
        assert!(!other.has_force_update_marker());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = ServiceResponse::new(200, ResponseData::Empty).with_header("X-Trace", "1");
        assert_eq!(response.header("x-trace"), Some("1"));
        assert_eq!(response.header("X-TRACE"), Some("1"));
    }
}
