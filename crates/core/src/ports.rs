//! Port interfaces for the SDK core
//!
//! These traits define the boundaries between request orchestration and the
//! infrastructure that performs HTTP exchanges and signs tokens.

use async_trait::async_trait;
use corbel_domain::{RequestDescriptor, Result, ServiceResponse};
use serde_json::{Map, Value};

/// Claim set of a token.
pub type Claims = Map<String, Value>;

/// Performs one HTTP exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the descriptor and normalize the outcome.
    ///
    /// # Errors
    /// Error statuses and network failures are returned as
    /// `CorbelError::Request`; a network failure carries status 0.
    async fn send(&self, descriptor: RequestDescriptor) -> Result<ServiceResponse>;
}

/// Issues signed assertions and reads token claims.
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` with `secret`.
    ///
    /// # Errors
    /// Returns `CorbelError::Codec` when required claims are missing.
    fn generate(&self, claims: &Claims, secret: &str) -> Result<String>;

    /// Read the claims of an assertion or access token.
    ///
    /// # Errors
    /// Returns `CorbelError::Codec` when the token cannot be decoded.
    fn decode(&self, token: &str) -> Result<Claims>;
}
