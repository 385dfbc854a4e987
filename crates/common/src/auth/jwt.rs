//! HS256 JSON Web Token assertions
//!
//! Generates the signed assertions exchanged for access tokens and decodes
//! token claims without verifying them. Encoding and decoding go through
//! `jsonwebtoken`. Claims are emitted in a fixed order
//! (`iss`, `aud`, `exp`, `scope`, ...) before any custom claim, which keeps
//! assertions byte-for-byte reproducible.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Claim set of a token.
pub type Claims = Map<String, Value>;

/// Seconds added to the current time when a claim set has no `exp`.
pub const DEFAULT_EXPIRATION_SECS: i64 = 3500;

/// Claims that lead the payload, in this order.
const ORDERED_CLAIMS: [&str; 11] = [
    "iss",
    "aud",
    "exp",
    "scope",
    "prn",
    "version",
    "refresh_token",
    "request_domain",
    "basic_auth.username",
    "basic_auth.password",
    "device_id",
];

/// Errors raised while generating or decoding assertions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtError {
    #[error("jwt:undefined:{0}")]
    MissingClaim(&'static str),

    #[error("jwt:decode:invalid_assertion")]
    InvalidAssertion,

    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    #[error("claim serialization failed: {0}")]
    Serialization(String),
}

/// Sign `claims` with `secret`, adding an `exp` when none is present.
///
/// # Errors
/// Returns [`JwtError::MissingClaim`] when `iss` or `aud` is absent or empty.
pub fn generate(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let mut claims = claims.clone();
    if !is_set(claims.get("exp")) {
        claims.insert("exp".into(), Value::from(Utc::now().timestamp() + DEFAULT_EXPIRATION_SECS));
    }
    for required in ["iss", "aud"] {
        if !is_set(claims.get(required)) {
            return Err(JwtError::MissingClaim(required));
        }
    }
    sign(&claims, secret)
}

/// Sign `claims` exactly as given.
///
/// # Errors
/// Returns an error if a claim cannot be serialized or the key is rejected.
pub fn sign(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &OrderedClaims::new(claims),
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::Json(inner) => JwtError::Serialization(inner.to_string()),
        _ => JwtError::InvalidKey(e.to_string()),
    })
}

/// Decode header and payload, merging payload claims over header fields.
///
/// The signature is not checked. One unreadable segment is tolerated; both
/// unreadable is an error.
///
/// # Errors
/// Returns [`JwtError::InvalidAssertion`] when neither segment decodes to a
/// JSON object.
pub fn decode(token: &str) -> Result<Claims, JwtError> {
    if let Some(claims) = decode_unverified(token) {
        return Ok(claims);
    }

    let mut segments = token.split('.');
    let header = segments.next().and_then(decode_segment);
    let payload = segments.next().and_then(decode_segment);

    match (header, payload) {
        (None, None) => Err(JwtError::InvalidAssertion),
        (header, payload) => Ok(merge(header.unwrap_or_default(), payload.unwrap_or_default())),
    }
}

/// Well-formed tokens go through `jsonwebtoken` with every check disabled.
fn decode_unverified(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation).ok()?;
    let header = match serde_json::to_value(&data.header).ok()? {
        Value::Object(map) => map,
        _ => return None,
    };
    Some(merge(header, data.claims))
}

fn merge(mut header: Claims, payload: Claims) -> Claims {
    header.extend(payload);
    header
}

/// Claims serialized with the set [`ORDERED_CLAIMS`] leading; unset ones
/// follow among the custom claims.
struct OrderedClaims<'a> {
    entries: Vec<(&'a str, Value)>,
}

impl<'a> OrderedClaims<'a> {
    fn new(claims: &'a Claims) -> Self {
        let mut entries: Vec<(&'a str, Value)> = Vec::with_capacity(claims.len());
        for key in ORDERED_CLAIMS {
            if let Some(value) = claims.get(key).filter(|v| is_set(Some(*v))) {
                entries.push((key, value.clone()));
            }
        }
        for (key, value) in claims {
            if !entries.iter().any(|(k, _)| *k == key.as_str()) {
                entries.push((key.as_str(), value.clone()));
            }
        }
        for (key, value) in &mut entries {
            if *key == "scope" {
                *value = join_scope(std::mem::take(value));
            }
        }
        Self { entries }
    }
}

impl Serialize for OrderedClaims<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

fn join_scope(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::String(
            items
                .iter()
                .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
                .collect::<Vec<_>>()
                .join(" "),
        ),
        other => other,
    }
}

fn decode_segment(segment: &str) -> Option<Claims> {
    // Accept both base64 alphabets, padded or not.
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let bytes = STANDARD_NO_PAD.decode(normalized).ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null | Value::Bool(false)) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
