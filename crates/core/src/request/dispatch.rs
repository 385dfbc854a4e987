//! Single transport exchange
//!
//! Applies the automatic method override, announces the final descriptor on
//! the `request` event and hands it to the transport.

use corbel_domain::constants::{
    FORM_CONTENT_TYPE, HEADER_METHOD_OVERRIDE, METHOD_OVERRIDE_URL_LENGTH,
};
use corbel_domain::{
    ClientEvent, DataType, EventPayload, Method, RequestBody, RequestDescriptor, Result,
    ServiceResponse,
};
use tracing::debug;

use crate::context::ClientContext;

/// Send `descriptor` through the client's transport.
///
/// # Errors
/// Propagates the transport's failure unchanged.
pub async fn dispatch(ctx: &ClientContext, descriptor: RequestDescriptor) -> Result<ServiceResponse> {
    let descriptor = apply_method_override(descriptor);

    ctx.events().trigger(ClientEvent::Request, &EventPayload::Descriptor(Box::new(descriptor.clone())));
    debug!(method = %descriptor.method, url = %descriptor.url, "Dispatching request");

    ctx.transport().send(descriptor).await
}

/// Tunnel an over-long GET through POST.
///
/// The query string moves into a form body (decoded, the transport encodes
/// form fields again) and `X-HTTP-Method-Override: GET` tells the server the
/// real method.
pub fn apply_method_override(mut descriptor: RequestDescriptor) -> RequestDescriptor {
    if descriptor.method != Method::Get || descriptor.url.len() <= METHOD_OVERRIDE_URL_LENGTH {
        return descriptor;
    }

    let (base, query) = match descriptor.url.split_once('?') {
        Some((base, query)) => (base.to_string(), query.to_string()),
        None => (descriptor.url.clone(), String::new()),
    };
    let form = query
        .split('&')
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((key, value)) => (decode_component(key), decode_component(value)),
            None => (decode_component(entry), String::new()),
        })
        .collect();

    debug!(url = %base, "Rewriting long GET as POST with method override");

    descriptor.method = Method::Post;
    descriptor.url = base;
    descriptor.headers.insert(HEADER_METHOD_OVERRIDE.into(), Method::Get.as_str().into());
    descriptor.data = Some(RequestBody::Form(form));
    descriptor.content_type = FORM_CONTENT_TYPE.into();
    if descriptor.data_type.is_none() {
        descriptor.data_type = Some(DataType::Json);
    }
    descriptor
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |decoded| decoded.into_owned())
}
