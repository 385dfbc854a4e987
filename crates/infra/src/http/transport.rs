//! `HttpTransport` implementation over reqwest.

use std::collections::BTreeMap;

use async_trait::async_trait;
use corbel_core::HttpTransport;
use corbel_domain::{
    CorbelError, DataType, Method, RequestBody, RequestDescriptor, ResponseData, Result,
    ServiceResponse, TransportSettings,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::client::HttpClient;

/// Sends request descriptors and normalizes responses into
/// [`ServiceResponse`] values.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: HttpClient,
}

impl ReqwestTransport {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// # Errors
    /// Fails when the underlying reqwest client cannot be built.
    pub fn from_settings(settings: &TransportSettings) -> Result<Self> {
        Ok(Self::new(HttpClient::from_settings(settings)?))
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %descriptor.method, url = %descriptor.url))]
    async fn send(&self, descriptor: RequestDescriptor) -> Result<ServiceResponse> {
        let mut builder = self.client.request(to_reqwest_method(descriptor.method), &descriptor.url);
        for (name, value) in &descriptor.headers {
            builder = builder.header(name, value);
        }

        if carries_body(descriptor.method) {
            if let Some(body) = &descriptor.data {
                builder = attach_body(builder, body, &descriptor.content_type)?;
            }
        }

        let response = self.client.send(builder).await?;
        let normalized = normalize(response, descriptor.data_type).await?;

        if normalized.is_success() {
            Ok(normalized)
        } else {
            debug!(status = normalized.status, "Request rejected by server");
            Err(CorbelError::request(normalized))
        }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
    }
}

const fn carries_body(method: Method) -> bool {
    matches!(method, Method::Post | Method::Put | Method::Patch)
}

fn attach_body(builder: RequestBuilder, body: &RequestBody, content_type: &str) -> Result<RequestBuilder> {
    let builder =
        if content_type.is_empty() { builder } else { builder.header(CONTENT_TYPE, content_type) };

    let bytes = match body {
        RequestBody::Json(Value::String(raw)) if !content_type.contains("json") => raw.clone().into_bytes(),
        RequestBody::Json(value) => serde_json::to_vec(value)
            .map_err(|err| CorbelError::Internal(format!("request body serialization failed: {err}")))?,
        RequestBody::Form(fields) => encode_form(fields).into_bytes(),
        RequestBody::Text(text) => text.clone().into_bytes(),
        RequestBody::Binary { bytes, .. } => bytes.clone(),
    };

    Ok(builder.body(bytes))
}

/// `application/x-www-form-urlencoded` serialization, keeping field order.
pub fn encode_form(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

async fn normalize(response: Response, data_type: Option<DataType>) -> Result<ServiceResponse> {
    let status = response.status();
    let headers: BTreeMap<String, String> = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value.to_str().ok().map(|value| (name.as_str().to_ascii_lowercase(), value.to_string()))
        })
        .collect();
    let content_type = headers.get("content-type").cloned().unwrap_or_default();

    let bytes = response.bytes().await.map_err(|err| CorbelError::from(crate::errors::InfraError::from(err)))?;
    let data = parse_body(&bytes, data_type, &content_type);

    let mut normalized = ServiceResponse { status: status.as_u16(), data, headers, error: None };
    if status.is_client_error() || status.is_server_error() {
        normalized.error = Some(status.canonical_reason().unwrap_or("error").to_string());
    }
    Ok(normalized)
}

/// Parse a body the way the request asked for, or by the response's content
/// type when the caller negotiated it through `Accept`.
pub fn parse_body(bytes: &[u8], data_type: Option<DataType>, content_type: &str) -> ResponseData {
    match data_type {
        Some(DataType::Json) => parse_json(bytes),
        Some(DataType::Text) => ResponseData::Text(String::from_utf8_lossy(bytes).into_owned()),
        Some(DataType::Blob | DataType::ArrayBuffer) => ResponseData::Binary(bytes.to_vec()),
        None if bytes.is_empty() => ResponseData::Empty,
        None if content_type.contains("json") => parse_json(bytes),
        None if content_type.starts_with("text/") => {
            ResponseData::Text(String::from_utf8_lossy(bytes).into_owned())
        }
        None => ResponseData::Binary(bytes.to_vec()),
    }
}

fn parse_json(bytes: &[u8]) -> ResponseData {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return ResponseData::Json(Value::Object(serde_json::Map::new()));
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => ResponseData::Json(value),
        Err(err) => {
            warn!(error = %err, "Response body is not valid JSON, keeping it as text");
            ResponseData::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn empty_json_body_becomes_empty_object() {
        assert_eq!(parse_body(b"", Some(DataType::Json), ""), ResponseData::Json(json!({})));
    }

    #[test]
    fn invalid_json_is_kept_as_text() {
        assert_eq!(
            parse_body(b"unsupported_version", Some(DataType::Json), "text/plain"),
            ResponseData::Text("unsupported_version".into())
        );
    }

    #[test]
    fn negotiated_bodies_follow_content_type() {
        assert_eq!(
            parse_body(br#"{"a":1}"#, None, "application/corbel.acl+json"),
            ResponseData::Json(json!({ "a": 1 }))
        );
        assert_eq!(parse_body(b"a,b", None, "text/csv"), ResponseData::Text("a,b".into()));
        assert_eq!(parse_body(&[1, 2], None, "image/png"), ResponseData::Binary(vec![1, 2]));
        assert_eq!(parse_body(b"", None, "image/png"), ResponseData::Empty);
    }

    #[test]
    fn form_fields_are_encoded_in_order() {
        let fields = vec![
            ("grant_type".to_string(), "urn:ietf:params:oauth:grant-type:jwt-bearer".to_string()),
            ("assertion".to_string(), "a.b.c".to_string()),
        ];
        assert_eq!(
            encode_form(&fields),
            "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer&assertion=a.b.c"
        );
    }

    #[test]
    fn only_mutating_methods_carry_bodies() {
        assert!(carries_body(Method::Post));
        assert!(carries_body(Method::Patch));
        assert!(!carries_body(Method::Get));
        assert!(!carries_body(Method::Delete));
    }
}
