//! Client factory wiring the reqwest transport and HS256 codec.

use std::sync::Arc;

use corbel_core::CorbelClient;
use corbel_domain::{ClientSettings, Result};
use tracing::instrument;

use crate::auth::HmacTokenCodec;
use crate::config;
use crate::http::ReqwestTransport;

/// Build a client that talks HTTP through reqwest.
///
/// # Errors
/// Fails when the HTTP client cannot be built or `url_base` is missing.
#[instrument(skip_all, fields(url_base = settings.url_base.as_deref().unwrap_or_default()))]
pub fn connect(settings: ClientSettings) -> Result<CorbelClient> {
    let transport = ReqwestTransport::from_settings(&settings.transport)?;
    CorbelClient::new(settings, Arc::new(transport), Arc::new(HmacTokenCodec::new()))
}

/// [`connect`] with settings from [`config::load`].
///
/// # Errors
/// Propagates settings loading and client construction failures.
pub fn connect_from_env() -> Result<CorbelClient> {
    connect(config::load()?)
}
