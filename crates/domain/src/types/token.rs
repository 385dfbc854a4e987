//! Identity token object stored under `iamToken`

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Token returned by the identity module's token endpoint.
///
/// Unknown fields are preserved so the stored object round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IamToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Epoch milliseconds; numbers, floats and numeric strings are accepted.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_timestamp")]
    pub expires_at: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl IamToken {
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self { access_token: access_token.into(), ..Self::default() }
    }

    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Refresh credential, ignoring empty strings.
    #[must_use]
    pub fn refresh_credential(&self) -> Option<&str> {
        self.refresh_token.as_deref().filter(|token| !token.is_empty())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    };
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_camel_case_and_keeps_extra_fields() {
        let token: IamToken = serde_json::from_value(json!({
            "accessToken": "A1",
            "refreshToken": "R1",
            "expiresAt": 1_700_000_000_000_i64,
            "tokenType": "Bearer"
        }))
        .unwrap();

        assert_eq!(token.access_token, "A1");
        assert_eq!(token.refresh_credential(), Some("R1"));
        assert_eq!(token.extra["tokenType"], "Bearer");
        assert_eq!(serde_json::to_value(&token).unwrap()["tokenType"], "Bearer");
    }

    #[test]
    fn expiry_accepts_floats_and_strings() {
        let float: IamToken =
            serde_json::from_value(json!({ "accessToken": "A1", "expiresAt": 1_700_000_000_000.5 })).unwrap();
        let text: IamToken =
            serde_json::from_value(json!({ "accessToken": "A1", "expiresAt": "1700000000000" })).unwrap();
        let junk: IamToken =
            serde_json::from_value(json!({ "accessToken": "A1", "expiresAt": "soon" })).unwrap();

        assert_eq!(float.expires_at, Some(1_700_000_000_000));
        assert_eq!(text.expires_at, Some(1_700_000_000_000));
        assert_eq!(junk.expires_at, None);
    }

    #[test]
    fn empty_refresh_token_is_not_a_credential() {
        let token = IamToken::new("A1").with_refresh_token("");
        assert_eq!(token.refresh_credential(), None);
    }
}
