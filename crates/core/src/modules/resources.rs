//! Typed resource storage
//!
//! URIs follow `<resources endpoint>/<domain>/resource/<type>[/<id>[/<destType>[;r=<destType>/<destId>]]]`.

use corbel_common::validation;
use corbel_domain::constants::DEFAULT_CONTENT_TYPE;
use corbel_domain::{Module, RequestArgs, Result, ServiceResponse};
use serde_json::{json, Value};

use super::{consume_domain, created_id, invalid, join_uri, module_endpoint, with_query};
use crate::config::ConfigStore;
use crate::request::RequestOrchestrator;

const ACL_MEDIA_TYPE: &str = "application/corbel.acl+json";

/// Per-call options shared by every resource operation.
#[derive(Debug, Clone, Default)]
pub struct ResourceOptions {
    /// Media type used as both `Accept` and request content type.
    pub media_type: Option<String>,
    /// Pre-serialized query (`api:query=...&api:page=...`).
    pub query: Option<String>,
}

impl ResourceOptions {
    #[must_use]
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    fn apply(&self, args: RequestArgs, with_content_type: bool) -> RequestArgs {
        let mut args = with_query(args, self.query.as_deref());
        if let Some(media_type) = &self.media_type {
            args = args.accept(media_type.clone());
            if with_content_type {
                args = args.content_type(media_type.clone());
            }
        }
        args
    }
}

/// Entry point for resource builders.
#[derive(Debug, Clone)]
pub struct Resources {
    orchestrator: RequestOrchestrator,
}

impl Resources {
    pub const fn new(orchestrator: RequestOrchestrator) -> Self {
        Self { orchestrator }
    }

    /// # Errors
    /// Returns `CorbelError::Validation` for an empty type.
    pub fn collection(&self, kind: impl Into<String>) -> Result<Collection> {
        let kind = kind.into();
        validation::non_empty("type", Some(kind.as_str())).map_err(invalid)?;
        Ok(Collection { orchestrator: self.orchestrator.clone(), kind })
    }

    /// # Errors
    /// Returns `CorbelError::Validation` when the type or id is empty.
    pub fn resource(&self, kind: impl Into<String>, id: impl Into<String>) -> Result<Resource> {
        let (kind, id) = (kind.into(), id.into());
        validation::values(&[("type", Some(kind.as_str())), ("id", Some(id.as_str()))])
            .map_err(invalid)?;
        Ok(Resource { orchestrator: self.orchestrator.clone(), kind, id })
    }

    /// # Errors
    /// Returns `CorbelError::Validation` when any part is empty.
    pub fn relation(
        &self,
        kind: impl Into<String>,
        src_id: impl Into<String>,
        dest_type: impl Into<String>,
    ) -> Result<Relation> {
        let (kind, src_id, dest_type) = (kind.into(), src_id.into(), dest_type.into());
        validation::values(&[
            ("type", Some(kind.as_str())),
            ("srcId", Some(src_id.as_str())),
            ("destType", Some(dest_type.as_str())),
        ])
        .map_err(invalid)?;
        Ok(Relation { orchestrator: self.orchestrator.clone(), kind, src_id, dest_type })
    }
}

/// Build a resource URI, consuming any one-shot domain override.
///
/// # Errors
/// Returns `CorbelError::ConfigKeyMissing` when no base URL is configured.
pub fn build_uri(
    config: &ConfigStore,
    kind: &str,
    src_id: Option<&str>,
    dest_type: Option<&str>,
    dest_id: Option<&str>,
) -> Result<String> {
    let base = module_endpoint(config, Module::Resources)?;
    let domain = consume_domain(config);
    let mut uri = join_uri(&base, &[&domain, "resource", kind]);

    if let Some(src_id) = src_id.filter(|s| !s.is_empty()) {
        uri = join_uri(&uri, &[src_id]);
        if let Some(dest_type) = dest_type.filter(|s| !s.is_empty()) {
            uri = join_uri(&uri, &[dest_type]);
            if let Some(dest_id) = dest_id.filter(|s| !s.is_empty()) {
                uri.push_str(&format!(";r={dest_type}/{dest_id}"));
            }
        }
    }
    Ok(uri)
}

/// All resources of one type.
#[derive(Debug, Clone)]
pub struct Collection {
    orchestrator: RequestOrchestrator,
    kind: String,
}

impl Collection {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub async fn get(&self, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(options.apply(RequestArgs::get(url), false)).await
    }

    /// Add a resource; resolves to its id.
    pub async fn add(&self, data: Value, options: &ResourceOptions) -> Result<Option<String>> {
        let url = self.url()?;
        let response =
            self.orchestrator.request(options.apply(RequestArgs::post(url).json(data), true)).await?;
        Ok(created_id(&response))
    }

    /// Bulk update of the resources matched by `options.query`.
    pub async fn update(&self, data: Value, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(options.apply(RequestArgs::put(url).json(data), true)).await
    }

    pub async fn delete(&self, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(options.apply(RequestArgs::delete(url), true)).await
    }

    fn url(&self) -> Result<String> {
        build_uri(self.orchestrator.config(), &self.kind, None, None, None)
    }
}

/// One resource, addressed by type and id.
#[derive(Debug, Clone)]
pub struct Resource {
    orchestrator: RequestOrchestrator,
    kind: String,
    id: String,
}

impl Resource {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn get(&self, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(options.apply(RequestArgs::get(url), true)).await
    }

    pub async fn update(&self, data: Value, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(options.apply(RequestArgs::put(url).json(data), true)).await
    }

    /// Replace the access control list of the resource.
    pub async fn update_acl(&self, acl: Value) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(RequestArgs::put(url).json(acl).accept(ACL_MEDIA_TYPE)).await
    }

    pub async fn delete(&self, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url()?;
        self.orchestrator.request(options.apply(RequestArgs::delete(url), true)).await
    }

    fn url(&self) -> Result<String> {
        build_uri(self.orchestrator.config(), &self.kind, Some(&self.id), None, None)
    }
}

/// Links from one resource to resources of another type.
#[derive(Debug, Clone)]
pub struct Relation {
    orchestrator: RequestOrchestrator,
    kind: String,
    src_id: String,
    dest_type: String,
}

impl Relation {
    /// Fetch one link, or every link when `dest_id` is `None`.
    pub async fn get(&self, dest_id: Option<&str>, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url(dest_id)?;
        self.orchestrator.request(options.apply(RequestArgs::get(url), false)).await
    }

    pub async fn add(
        &self,
        dest_id: &str,
        data: Option<Value>,
        options: &ResourceOptions,
    ) -> Result<ServiceResponse> {
        validation::non_empty("destId", Some(dest_id)).map_err(invalid)?;
        let url = self.url(Some(dest_id))?;
        let mut args = RequestArgs::put(url);
        if let Some(data) = data {
            args = args.json(data);
        }
        self.orchestrator.request(options.apply(args, true)).await
    }

    /// Link to a new anonymous resource created from `data`.
    pub async fn add_anonymous(&self, data: Value, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url(None)?;
        self.orchestrator.request(options.apply(RequestArgs::post(url).json(data), true)).await
    }

    /// Move a link to position `pos`. `dest_id` may be given as `type/id`.
    pub async fn move_to(&self, dest_id: &str, pos: u32) -> Result<ServiceResponse> {
        validation::non_empty("destId", Some(dest_id)).map_err(invalid)?;
        let dest_id = dest_id.split_once('/').map_or(dest_id, |(_, id)| id);
        let url = self.url(Some(dest_id))?;
        let args = RequestArgs::put(url)
            .json(json!({ "_order": format!("$pos({pos})") }))
            .content_type(DEFAULT_CONTENT_TYPE);
        self.orchestrator.request(args).await
    }

    /// Remove one link, or every link when `dest_id` is `None`.
    pub async fn delete(&self, dest_id: Option<&str>, options: &ResourceOptions) -> Result<ServiceResponse> {
        let url = self.url(dest_id)?;
        self.orchestrator.request(options.apply(RequestArgs::delete(url), false)).await
    }

    fn url(&self, dest_id: Option<&str>) -> Result<String> {
        build_uri(
            self.orchestrator.config(),
            &self.kind,
            Some(&self.src_id),
            Some(&self.dest_type),
            dest_id,
        )
    }
}
