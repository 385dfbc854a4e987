use corbel_common::validation;
use corbel_domain::{Method, RequestArgs, Result, ServiceResponse};
use serde_json::Value;
use tracing::debug;

use super::build_uri_with_domain;
use crate::modules::{created_id, invalid, join_uri, with_query};
use crate::request::RequestOrchestrator;

const USER_URI: &str = "user";

/// Operations on the users collection of the current domain.
#[derive(Debug, Clone)]
pub struct UsersBuilder {
    orchestrator: RequestOrchestrator,
}

impl UsersBuilder {
    pub(crate) const fn new(orchestrator: RequestOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// Create a user; resolves to the new user's id.
    pub async fn create(&self, user: Value) -> Result<Option<String>> {
        debug!("Creating user");
        let url = build_uri_with_domain(self.orchestrator.config(), USER_URI, None)?;
        let response = self.orchestrator.request(RequestArgs::post(url).json(user)).await?;
        Ok(created_id(&response))
    }

    /// List users; `query` is an already serialized query string.
    pub async fn get(&self, query: Option<&str>) -> Result<ServiceResponse> {
        let url = build_uri_with_domain(self.orchestrator.config(), USER_URI, None)?;
        self.orchestrator.request(with_query(RequestArgs::get(url), query)).await
    }

    pub async fn get_profiles(&self, query: Option<&str>) -> Result<ServiceResponse> {
        let url = build_uri_with_domain(self.orchestrator.config(), USER_URI, Some("profile"))?;
        self.orchestrator.request(with_query(RequestArgs::get(url), query)).await
    }

    pub async fn send_reset_password_email(&self, email: &str) -> Result<ServiceResponse> {
        validation::non_empty("email", Some(email)).map_err(invalid)?;
        let url = build_uri_with_domain(self.orchestrator.config(), USER_URI, Some("resetPassword"))?;
        let query = format!("email={}", urlencoding::encode(email));
        self.orchestrator.request(RequestArgs::get(url).query(query)).await
    }

    /// Confirm the email of the user owning the supplied token.
    pub async fn email_confirmation(&self, token: &str) -> Result<ServiceResponse> {
        let url =
            build_uri_with_domain(self.orchestrator.config(), USER_URI, Some("emailConfirmation"))?;
        self.orchestrator.request(RequestArgs::put(url).access_token(token).no_retry(true)).await
    }
}

/// Operations on a single user. The id `"me"` addresses the logged user.
#[derive(Debug, Clone)]
pub struct UserBuilder {
    orchestrator: RequestOrchestrator,
    id: String,
}

impl UserBuilder {
    pub(crate) const fn new(orchestrator: RequestOrchestrator, id: String) -> Self {
        Self { orchestrator, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn get(&self) -> Result<ServiceResponse> {
        self.send(Method::Get, &[], None).await
    }

    pub async fn update(&self, user: Value) -> Result<ServiceResponse> {
        self.send(Method::Put, &[], Some(user)).await
    }

    pub async fn delete(&self) -> Result<ServiceResponse> {
        self.send(Method::Delete, &[], None).await
    }

    pub async fn sign_out(&self) -> Result<ServiceResponse> {
        self.send(Method::Put, &["signout"], None).await
    }

    /// Invalidate every token of the user.
    pub async fn disconnect(&self) -> Result<ServiceResponse> {
        self.send(Method::Put, &["disconnect"], None).await
    }

    pub async fn get_session(&self) -> Result<ServiceResponse> {
        self.send(Method::Get, &["session"], None).await
    }

    pub async fn close_sessions(&self) -> Result<ServiceResponse> {
        self.send(Method::Delete, &["session"], None).await
    }

    pub async fn add_identity(&self, identity: Value) -> Result<ServiceResponse> {
        validation::value("identity", Some(&identity).filter(|v| !v.is_null())).map_err(invalid)?;
        self.send(Method::Post, &["identity"], Some(identity)).await
    }

    pub async fn get_identities(&self) -> Result<ServiceResponse> {
        self.send(Method::Get, &["identity"], None).await
    }

    /// Register or update a device; resolves to the device id.
    pub async fn register_device(&self, device_id: &str, device: Value) -> Result<Option<String>> {
        self.require_device(device_id)?;
        let response = self.send(Method::Put, &["device", device_id], Some(device)).await?;
        Ok(created_id(&response))
    }

    pub async fn get_device(&self, device_id: &str) -> Result<ServiceResponse> {
        self.require_device(device_id)?;
        self.send(Method::Get, &["device", device_id], None).await
    }

    pub async fn get_devices(&self, query: Option<&str>) -> Result<ServiceResponse> {
        self.require_id()?;
        let url = self.url(&["device"])?;
        self.orchestrator.request(with_query(RequestArgs::get(url), query)).await
    }

    pub async fn delete_device(&self, device_id: &str) -> Result<ServiceResponse> {
        self.require_device(device_id)?;
        self.send(Method::Delete, &["device", device_id], None).await
    }

    pub async fn get_profile(&self) -> Result<ServiceResponse> {
        self.send(Method::Get, &["profile"], None).await
    }

    pub async fn add_groups(&self, groups: Value) -> Result<ServiceResponse> {
        self.send(Method::Put, &["group"], Some(groups)).await
    }

    pub async fn validate_email(&self) -> Result<ServiceResponse> {
        self.send(Method::Get, &["validateEmail"], None).await
    }

    pub async fn delete_group(&self, group: &str) -> Result<ServiceResponse> {
        validation::values(&[("id", Some(self.id.as_str())), ("group", Some(group))])
            .map_err(invalid)?;
        self.send(Method::Delete, &["group", group], None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &[&str],
        data: Option<Value>,
    ) -> Result<ServiceResponse> {
        self.require_id()?;
        let mut args = RequestArgs::new(self.url(path)?).method(method);
        if let Some(data) = data {
            args = args.json(data);
        }
        self.orchestrator.request(args).await
    }

    fn url(&self, path: &[&str]) -> Result<String> {
        let base = build_uri_with_domain(self.orchestrator.config(), USER_URI, Some(&self.id))?;
        Ok(join_uri(&base, path))
    }

    fn require_id(&self) -> Result<()> {
        validation::non_empty("id", Some(self.id.as_str())).map(|_| ()).map_err(invalid)
    }

    fn require_device(&self, device_id: &str) -> Result<()> {
        validation::values(&[("id", Some(self.id.as_str())), ("deviceId", Some(device_id))])
            .map_err(invalid)
    }
}
