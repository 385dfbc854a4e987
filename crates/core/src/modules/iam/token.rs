//! Token issuance against the identity module
//!
//! Token exchanges bypass the orchestrator's retry policy: they go straight
//! to the transport, so a rejected exchange can never trigger another
//! refresh.

use std::collections::BTreeMap;
use std::sync::Arc;

use corbel_common::validation;
use corbel_domain::constants::{
    AUDIENCE, CLIENT_ID, CLIENT_SECRET, DEFAULT_ACCEPT, DEFAULT_CONTENT_TYPE, FORM_CONTENT_TYPE,
    HEADER_ACCEPT, HEADER_REQUEST_COOKIE, IAM_DEFAULT_AUDIENCE, IAM_DOMAIN, IAM_GRANT_TYPE,
    IAM_TOKEN, IAM_TOKEN_SCOPES, IAM_TOKEN_URI, SCOPES,
};
use corbel_domain::{DataType, Method, RequestBody, RequestDescriptor, Result, ServiceResponse};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::build_uri;
use crate::context::ClientContext;
use crate::modules::invalid;
use crate::ports::Claims;
use crate::request::dispatch;

/// Inputs for [`TokenBuilder::create`].
#[derive(Debug, Clone, Default)]
pub struct TokenParams {
    /// Pre-built assertion; skips claim generation.
    pub jwt: Option<String>,
    /// Claims merged over the client defaults (`iss`, `aud`, `scope`).
    pub claims: Claims,
    /// Signing secret; defaults to `clientSecret`.
    pub secret: Option<String>,
    /// Third-party login parameters (`oauth.service`, `oauth.code`, ...).
    /// When present the exchange is a GET with everything in the query.
    pub oauth: Option<Vec<(String, String)>>,
}

impl TokenParams {
    #[must_use]
    pub fn with_jwt(jwt: impl Into<String>) -> Self {
        Self { jwt: Some(jwt.into()), ..Self::default() }
    }

    #[must_use]
    pub fn claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(key.into(), value.into());
        self
    }
}

/// Outcome of a token exchange that has not been stored yet.
#[derive(Debug, Clone)]
pub(crate) struct IssuedToken {
    pub(crate) response: ServiceResponse,
    /// Set for created tokens, which also record their domain and scopes.
    granted_scopes: Option<String>,
}

/// Space-separated form of a `scope` claim, which may be a string or a list.
pub(crate) fn scope_text(scope: &Value) -> String {
    match scope {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
            .collect::<Vec<_>>()
            .join(" "),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Creates and refreshes access tokens.
#[derive(Debug, Clone)]
pub struct TokenBuilder {
    ctx: Arc<ClientContext>,
}

impl TokenBuilder {
    pub const fn new(ctx: Arc<ClientContext>) -> Self {
        Self { ctx }
    }

    /// Exchange a client assertion for a new access token.
    ///
    /// On success stores `iamToken`, the token's `domain` and the granted
    /// `iamScopes` in config.
    ///
    /// # Errors
    /// Fails on missing credentials, codec errors or a rejected exchange.
    #[instrument(skip(self, params))]
    pub async fn create(&self, params: TokenParams, set_cookie: bool) -> Result<ServiceResponse> {
        let issued = self.issue(&params, set_cookie).await?;
        self.store(&issued);
        debug!("Access token created");
        Ok(issued.response)
    }

    /// Exchange a refresh token for a new access token; stores `iamToken`.
    ///
    /// # Errors
    /// Returns `CorbelError::Validation` for an empty refresh token, or the
    /// exchange's failure.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, refresh_token: &str, scopes: &str) -> Result<ServiceResponse> {
        let issued = self.reissue(refresh_token, scopes).await?;
        self.store(&issued);
        debug!("Access token refreshed");
        Ok(issued.response)
    }

    /// Run the create exchange without touching config.
    pub(crate) async fn issue(&self, params: &TokenParams, set_cookie: bool) -> Result<IssuedToken> {
        let (assertion, claims) = self.assertion(params)?;

        let response = match &params.oauth {
            Some(oauth) => self.exchange(Method::Get, &assertion, oauth, set_cookie).await?,
            None => self.exchange(Method::Post, &assertion, &[], set_cookie).await?,
        };

        let scope = match &params.jwt {
            Some(jwt) => self.ctx.codec().decode(jwt).ok().and_then(|c| c.get("scope").cloned()),
            None => claims.get("scope").cloned(),
        };
        let config = self.ctx.config();
        let granted = scope_text(&scope.unwrap_or_else(|| config.get_or(SCOPES, Value::from(""))));

        Ok(IssuedToken { response, granted_scopes: Some(granted) })
    }

    /// Run the refresh exchange without touching config.
    pub(crate) async fn reissue(&self, refresh_token: &str, scopes: &str) -> Result<IssuedToken> {
        validation::non_empty("refreshToken", Some(refresh_token)).map_err(invalid)?;

        let params = TokenParams::default()
            .claim("scope", scopes)
            .claim("refresh_token", refresh_token);
        let (assertion, _) = self.assertion(&params)?;

        let response = self.exchange(Method::Post, &assertion, &[], false).await?;
        Ok(IssuedToken { response, granted_scopes: None })
    }

    /// Write an issued token into config.
    pub(crate) fn store(&self, issued: &IssuedToken) {
        let config = self.ctx.config();
        config.set(IAM_TOKEN, issued.response.data.to_json());
        if let Some(scopes) = &issued.granted_scopes {
            self.store_domain(&issued.response);
            config.set(IAM_TOKEN_SCOPES, scopes.as_str());
        }
    }

    /// Assertion for `params` and the claims it was signed with.
    fn assertion(&self, params: &TokenParams) -> Result<(String, Claims)> {
        if let Some(jwt) = &params.jwt {
            return Ok((jwt.clone(), Claims::new()));
        }

        let config = self.ctx.config();
        let mut claims = params.claims.clone();
        if !claims.contains_key("iss") {
            claims.insert("iss".into(), Value::String(config.require_str(CLIENT_ID)?));
        }
        if !claims.contains_key("aud") {
            claims.insert("aud".into(), config.get_or(AUDIENCE, Value::from(IAM_DEFAULT_AUDIENCE)));
        }
        if !claims.contains_key("scope") {
            claims.insert("scope".into(), config.get_or(SCOPES, Value::from("")));
        }

        let secret = match &params.secret {
            Some(secret) => secret.clone(),
            None => config.require_str(CLIENT_SECRET)?,
        };
        let assertion = self.ctx.codec().generate(&claims, &secret)?;
        Ok((assertion, claims))
    }

    async fn exchange(
        &self,
        method: Method,
        assertion: &str,
        extra: &[(String, String)],
        set_cookie: bool,
    ) -> Result<ServiceResponse> {
        let url = build_uri(self.ctx.config(), IAM_TOKEN_URI, None)?;

        let mut fields = vec![
            ("assertion".to_string(), assertion.to_string()),
            ("grant_type".to_string(), IAM_GRANT_TYPE.to_string()),
        ];
        fields.extend(extra.iter().cloned());

        let mut headers = BTreeMap::from([(HEADER_ACCEPT.to_string(), DEFAULT_ACCEPT.to_string())]);
        if set_cookie {
            headers.insert(HEADER_REQUEST_COOKIE.into(), "true".into());
        }

        let descriptor = match method {
            Method::Get => RequestDescriptor {
                url: format!("{url}?{}", encode_query(&fields)),
                method,
                headers,
                data: None,
                content_type: DEFAULT_CONTENT_TYPE.into(),
                data_type: Some(DataType::Json),
                response_type: None,
                with_credentials: true,
            },
            _ => RequestDescriptor {
                url,
                method,
                headers,
                data: Some(RequestBody::Form(fields)),
                content_type: FORM_CONTENT_TYPE.into(),
                data_type: Some(DataType::Json),
                response_type: None,
                with_credentials: true,
            },
        };

        dispatch(&self.ctx, descriptor).await
    }

    fn store_domain(&self, response: &ServiceResponse) {
        let access_token = response
            .data
            .as_json()
            .and_then(|data| data.get("accessToken"))
            .and_then(Value::as_str);
        let Some(access_token) = access_token else {
            warn!("Token response carries no access token");
            return;
        };

        match self.ctx.codec().decode(access_token) {
            Ok(claims) => match claims.get("domainId") {
                Some(domain) => self.ctx.config().set(IAM_DOMAIN, domain.clone()),
                None => debug!("Access token has no domainId claim"),
            },
            Err(error) => warn!(error = %error, "Access token could not be decoded"),
        }
    }
}

fn encode_query(fields: &[(String, String)]) -> String {
    fields
        .iter()
        .map(|(key, value)| format!("{}={}", urlencoding::encode(key), urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
