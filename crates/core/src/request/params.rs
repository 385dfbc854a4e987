//! Request parameter normalization
//!
//! Turns caller-facing [`RequestArgs`] into the [`RequestDescriptor`] the
//! transport understands: defaults, query string, content negotiation and
//! authorization.

use std::collections::BTreeMap;

use corbel_domain::constants::{
    DEFAULT_ACCEPT, DEFAULT_CONTENT_TYPE, HEADER_ACCEPT, HEADER_AUTHORIZATION, HEADER_NO_REDIRECT,
};
use corbel_domain::{CorbelError, DataType, RequestArgs, RequestDescriptor, Result};

use crate::config::ConfigStore;

/// Build the descriptor for `args`, reading the stored token from `config`.
///
/// # Errors
/// Returns [`CorbelError::Validation`] when `args.url` is empty.
pub fn build_params(config: &ConfigStore, args: &RequestArgs) -> Result<RequestDescriptor> {
    if args.url.is_empty() {
        return Err(CorbelError::Validation("You must define an url".into()));
    }

    let mut data_type = Some(args.data_type.unwrap_or_default());
    let mut content_type = args.content_type.clone().unwrap_or_else(|| DEFAULT_CONTENT_TYPE.into());

    let url = match args.query.as_deref().filter(|q| !q.is_empty()) {
        Some(query) => format!("{}?{query}", args.url),
        None => args.url.clone(),
    };

    let mut headers = args.headers.clone();
    if find_header(&headers, HEADER_ACCEPT).is_none() {
        headers.insert(HEADER_ACCEPT.into(), DEFAULT_ACCEPT.into());
    }

    if args.no_redirect {
        headers.insert(HEADER_NO_REDIRECT.into(), "true".into());
    }

    if let Some(accept) = &args.accept {
        set_header(&mut headers, HEADER_ACCEPT, accept.clone());
        data_type = None;
    }

    // Binary uploads negotiate with their own media type.
    if data_type == Some(DataType::Blob) {
        if let Some(media_type) = args.data.as_ref().and_then(|d| d.declared_media_type()) {
            set_header(&mut headers, HEADER_ACCEPT, media_type.to_string());
            content_type = media_type.to_string();
            data_type = None;
        }
    }

    let with_credentials = add_authorization(config, args, &mut headers) || args.with_credentials;

    Ok(RequestDescriptor {
        url,
        method: args.method.unwrap_or_default(),
        headers,
        data: args.data.clone(),
        content_type,
        data_type,
        response_type: args.response_type.clone(),
        with_credentials,
    })
}

/// Attach `Authorization: Bearer <token>` unless the caller set the header.
/// Returns whether credentials mode must be on.
fn add_authorization(
    config: &ConfigStore,
    args: &RequestArgs,
    headers: &mut BTreeMap<String, String>,
) -> bool {
    if find_header(headers, HEADER_AUTHORIZATION).is_some() {
        return true;
    }
    let token = args.access_token.clone().filter(|t| !t.is_empty()).or_else(|| config.access_token());
    match token {
        Some(token) => {
            headers.insert(HEADER_AUTHORIZATION.into(), format!("Bearer {token}"));
            true
        }
        None => false,
    }
}

fn find_header<'a>(headers: &'a BTreeMap<String, String>, name: &str) -> Option<&'a String> {
    headers.keys().find(|key| key.eq_ignore_ascii_case(name))
}

/// Replace a header regardless of the casing it was stored under.
fn set_header(headers: &mut BTreeMap<String, String>, name: &str, value: String) {
    if let Some(existing) = find_header(headers, name).cloned() {
        headers.remove(&existing);
    }
    headers.insert(name.to_string(), value);
}
