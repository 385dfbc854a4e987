//! # Corbel Infrastructure
//!
//! Infrastructure implementations of core SDK ports.
//!
//! This crate contains:
//! - The reqwest-backed `HttpTransport`
//! - The HS256 `TokenCodec`
//! - Client settings loading from environment variables and files
//! - Tracing subscriber initialisation
//!
//! ## Architecture
//! - Implements traits defined in `corbel-core`
//! - Depends on `corbel-common`, `corbel-domain` and `corbel-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use auth::HmacTokenCodec;
pub use client::{connect, connect_from_env};
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder, ReqwestTransport};
pub use observability::init_tracing;
