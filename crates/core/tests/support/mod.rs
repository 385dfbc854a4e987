//! Shared test helpers for `corbel-core` integration tests.
//!
//! Scripted transport and codec doubles so the orchestration tests can focus
//! on behaviour instead of HTTP plumbing.

#![allow(dead_code)]

pub mod mocks;

use std::sync::Arc;

use corbel_core::CorbelClient;
use corbel_domain::ClientSettings;

pub use mocks::{MockCodec, MockTransport};

pub const URL_BASE: &str = "https://{{module}}.corbel.test/v1.0/";
pub const TOKEN_URL: &str = "https://iam.corbel.test/v1.0/oauth/token";

/// Settings with client credentials and the test URL template.
pub fn settings() -> ClientSettings {
    ClientSettings::new(URL_BASE).with_credentials("client-id", "client-secret").with_scopes("scope-a")
}

/// Client over `transport` with default settings and a [`MockCodec`].
pub fn client(transport: &Arc<MockTransport>) -> CorbelClient {
    client_with(settings(), transport)
}

pub fn client_with(settings: ClientSettings, transport: &Arc<MockTransport>) -> CorbelClient {
    client_with_codec(settings, transport, Arc::new(MockCodec::default()))
}

/// Client sharing `codec` with the test, for inspecting generated claims.
pub fn client_with_codec(
    settings: ClientSettings,
    transport: &Arc<MockTransport>,
    codec: Arc<MockCodec>,
) -> CorbelClient {
    match CorbelClient::new(settings, transport.clone(), codec) {
        Ok(client) => client,
        Err(err) => panic!("test client must build: {err}"),
    }
}
