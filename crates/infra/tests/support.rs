//! Shared helpers for `corbel-infra` integration tests.

#![allow(dead_code)]

use corbel_core::{Claims, CorbelClient, TokenCodec};
use corbel_domain::ClientSettings;
use corbel_infra::HmacTokenCodec;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const CLIENT_ID: &str = "integration-client";
pub const CLIENT_SECRET: &str = "integration-secret";

/// URL template routing every module to `/<module>/v1.0/` on the mock server.
pub fn url_base(server: &MockServer) -> String {
    format!("{}/{{{{module}}}}/v1.0/", server.uri())
}

pub fn settings(server: &MockServer) -> ClientSettings {
    ClientSettings::new(url_base(server)).with_credentials(CLIENT_ID, CLIENT_SECRET).with_scopes("scope-a")
}

/// Real reqwest-backed client pointed at the mock server.
pub fn client(server: &MockServer) -> CorbelClient {
    corbel_infra::connect(settings(server)).expect("client should build")
}

/// Access token whose claims carry `domainId`.
pub fn access_token_for(domain: &str) -> String {
    let claims: Claims = json!({ "iss": "iam", "aud": "client", "domainId": domain })
        .as_object()
        .cloned()
        .unwrap_or_default();
    HmacTokenCodec::new().generate(&claims, "server-secret").expect("token should sign")
}

pub fn token_body(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "accessToken": access_token,
        "refreshToken": refresh_token,
        "expiresAt": 1_900_000_000_000_u64,
    })
}
