//! Request arguments and the resolved descriptor handed to the transport

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CorbelError;
use crate::impl_wire_name_conversions;
use crate::types::ServiceResponse;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Method {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(format!("Invalid Method: {s}")),
        }
    }
}

/// How the transport should parse the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    #[default]
    Json,
    Text,
    Blob,
    ArrayBuffer,
}

impl_wire_name_conversions!(DataType {
    Json => "json",
    Text => "text",
    Blob => "blob",
    ArrayBuffer => "arraybuffer",
});

impl DataType {
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self, Self::Blob | Self::ArrayBuffer)
    }
}

/// Request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum RequestBody {
    /// Serialized as JSON when the content type mentions `json`.
    Json(Value),
    /// URL-encoded form fields, in order.
    Form(Vec<(String, String)>),
    Text(String),
    /// Raw bytes, optionally declaring their own media type.
    Binary { bytes: Vec<u8>, media_type: Option<String> },
}

impl RequestBody {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Json(value) => value.is_null(),
            Self::Form(fields) => fields.is_empty(),
            Self::Text(text) => text.is_empty(),
            Self::Binary { bytes, .. } => bytes.is_empty(),
        }
    }

    /// Media type declared by a binary payload.
    #[must_use]
    pub fn declared_media_type(&self) -> Option<&str> {
        match self {
            Self::Binary { media_type, .. } => media_type.as_deref(),
            _ => None,
        }
    }
}

/// Observer invoked with a successful terminal response.
pub type ResponseHook = Arc<dyn Fn(&ServiceResponse) + Send + Sync>;
/// Observer invoked with a terminal failure.
pub type ErrorHook = Arc<dyn Fn(&CorbelError) + Send + Sync>;

/// Caller-facing request arguments, before normalization.
///
/// Everything except `url` is optional; the orchestrator fills in defaults.
#[derive(Clone, Default)]
pub struct RequestArgs {
    pub url: String,
    pub method: Option<Method>,
    /// Pre-serialized query string, appended after `?`.
    pub query: Option<String>,
    pub data: Option<RequestBody>,
    pub content_type: Option<String>,
    pub data_type: Option<DataType>,
    /// Explicit `Accept` header; disables body parsing by data type.
    pub accept: Option<String>,
    pub headers: BTreeMap<String, String>,
    /// Bearer token to use instead of the stored one.
    pub access_token: Option<String>,
    pub no_redirect: bool,
    /// Do not attempt a token refresh on 401.
    pub no_retry: bool,
    pub response_type: Option<String>,
    pub with_credentials: bool,
    pub on_success: Option<ResponseHook>,
    pub on_error: Option<ErrorHook>,
}

impl RequestArgs {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), ..Self::default() }
    }

    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::Get)
    }

    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::Post)
    }

    #[must_use]
    pub fn put(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::Put)
    }

    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(url).method(Method::Delete)
    }

    #[must_use]
    pub const fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn json(mut self, data: Value) -> Self {
        self.data = Some(RequestBody::Json(data));
        self
    }

    #[must_use]
    pub fn body(mut self, data: RequestBody) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    #[must_use]
    pub const fn data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    #[must_use]
    pub fn accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = Some(accept.into());
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub const fn no_redirect(mut self, no_redirect: bool) -> Self {
        self.no_redirect = no_redirect;
        self
    }

    #[must_use]
    pub const fn no_retry(mut self, no_retry: bool) -> Self {
        self.no_retry = no_retry;
        self
    }

    #[must_use]
    pub fn response_type(mut self, response_type: impl Into<String>) -> Self {
        self.response_type = Some(response_type.into());
        self
    }

    #[must_use]
    pub const fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    #[must_use]
    pub fn on_success(mut self, hook: impl Fn(&ServiceResponse) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(hook));
        self
    }

    #[must_use]
    pub fn on_error(mut self, hook: impl Fn(&CorbelError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for RequestArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestArgs")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("query", &self.query)
            .field("data", &self.data)
            .field("content_type", &self.content_type)
            .field("data_type", &self.data_type)
            .field("accept", &self.accept)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("no_redirect", &self.no_redirect)
            .field("no_retry", &self.no_retry)
            .field("response_type", &self.response_type)
            .field("with_credentials", &self.with_credentials)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

/// Fully resolved request, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub url: String,
    pub method: Method,
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<RequestBody>,
    pub content_type: String,
    /// `None` when the caller negotiated the body through `Accept`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_type: Option<String>,
    pub with_credentials: bool,
}

impl RequestDescriptor {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
