//! Integration tests for HS256 assertions
//!
//! Covers the claim sets the identity module exchanges for tokens.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use corbel_common::auth::jwt::{self, Claims};
use serde_json::{json, Value};

fn claims(value: Value) -> Claims {
    value.as_object().cloned().unwrap_or_default()
}

/// Token creation assertion: issuer, audience and scopes.
#[test]
fn test_client_credentials_assertion() {
    let input = claims(json!({
        "iss": "client-id",
        "aud": "http://iam.bqws.io",
        "scope": "resources:read resources:write"
    }));

    let assertion = jwt::generate(&input, "client-secret").unwrap();
    let decoded = jwt::decode(&assertion).unwrap();

    assert_eq!(decoded["iss"], "client-id");
    assert_eq!(decoded["aud"], "http://iam.bqws.io");
    assert_eq!(decoded["scope"], "resources:read resources:write");
    assert!(decoded["exp"].is_i64());
}

/// Refresh assertion carries the refresh token after the standard claims.
#[test]
fn test_refresh_assertion_claim_order() {
    let input = claims(json!({
        "refresh_token": "R1",
        "scope": "",
        "iss": "client-id",
        "aud": "http://iam.bqws.io",
        "exp": 1_700_000_000
    }));

    let assertion = jwt::generate(&input, "client-secret").unwrap();
    let payload = assertion.split('.').nth(1).unwrap();
    let payload = String::from_utf8(URL_SAFE_NO_PAD.decode(payload).unwrap()).unwrap();

    assert_eq!(
        payload,
        r#"{"iss":"client-id","aud":"http://iam.bqws.io","exp":1700000000,"refresh_token":"R1","scope":""}"#
    );
}

/// Same claims and secret produce the same assertion.
#[test]
fn test_assertions_are_deterministic() {
    let input = claims(json!({"iss": "c", "aud": "a", "exp": 42}));
    assert_eq!(jwt::sign(&input, "s").unwrap(), jwt::sign(&input, "s").unwrap());
    assert_ne!(jwt::sign(&input, "s").unwrap(), jwt::sign(&input, "other").unwrap());
}

/// Access tokens issued by the server expose their domain.
#[test]
fn test_decode_server_token() {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(r#"{"domainId":"acme","userId":"u1"}"#);
    let decoded = jwt::decode(&format!("{header}.{payload}.signature")).unwrap();

    assert_eq!(decoded["domainId"], "acme");
    assert_eq!(decoded["alg"], "HS256");
}

#[test]
fn test_decode_rejects_opaque_tokens() {
    assert!(jwt::decode("not-a-jwt").is_err());
}
