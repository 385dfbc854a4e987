//! # Corbel Core
//!
//! Request orchestration and token lifecycle for the Corbel client SDK.
//!
//! This crate contains:
//! - Port interfaces for the HTTP transport and the JWT codec
//! - Per-client config store and event bus
//! - The request orchestrator (401 refresh-and-retry, forced-update counting)
//! - Single-flight token refresh
//! - Resource builders for the identity and resource modules
//!
//! ## Architecture Principles
//! - Depends only on `corbel-common` and `corbel-domain`
//! - No HTTP or crypto code; both arrive through traits
//! - Every client owns its state; nothing is process-global

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod events;
pub mod modules;
pub mod ports;
pub mod request;

pub use auth::TokenProvider;
pub use client::CorbelClient;
pub use config::ConfigStore;
pub use context::ClientContext;
pub use events::{EventBus, Listener};
pub use modules::iam::{
    ClientBuilder, Iam, ScopeBuilder, TokenBuilder, TokenParams, UserBuilder, UsersBuilder,
};
pub use modules::resources::{Collection, Relation, Resource, ResourceOptions, Resources};
pub use ports::{Claims, HttpTransport, TokenCodec};
pub use request::{build_params, dispatch, RequestOrchestrator};
