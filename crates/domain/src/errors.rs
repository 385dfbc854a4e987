//! Error types used throughout the SDK

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{FORCE_UPDATE_STATUS_CODE, UNAUTHORIZED_STATUS_CODE};
use crate::types::ServiceResponse;

/// Main error type for the Corbel SDK.
///
/// The type is `Clone` because a single refresh outcome is handed to every
/// caller awaiting it.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum CorbelError {
    /// A required config field was read with no default.
    #[error("config:undefined:{0}")]
    ConfigKeyMissing(String),

    /// Caller-supplied input was rejected before any I/O.
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The transport delivered a failure (error status or network failure).
    #[error("Request failed with status {}", .0.status)]
    Request(Box<ServiceResponse>),

    /// Token encode or decode failed.
    #[error("Token codec error: {0}")]
    Codec(String),

    /// Loading or parsing configuration failed.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`CorbelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigKeyMissing,
    Validation,
    Unauthorized,
    ForcedUpdate,
    Transport,
    Http,
    Codec,
    Config,
    Internal,
}

impl CorbelError {
    /// Wrap a failed response.
    #[must_use]
    pub fn request(response: ServiceResponse) -> Self {
        Self::Request(Box::new(response))
    }

    /// Failed response carried by this error, if any.
    #[must_use]
    pub fn response(&self) -> Option<&ServiceResponse> {
        match self {
            Self::Request(response) => Some(response),
            _ => None,
        }
    }

    /// HTTP status of a request failure; `0` means the server was never reached.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        self.response().map(|response| response.status)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(UNAUTHORIZED_STATUS_CODE)
    }

    /// A 403 carrying the unsupported-version marker.
    #[must_use]
    pub fn is_forced_update(&self) -> bool {
        self.response().is_some_and(|response| {
            response.status == FORCE_UPDATE_STATUS_CODE && response.has_force_update_marker()
        })
    }

    #[must_use]
    pub fn is_transport_failure(&self) -> bool {
        self.status() == Some(0)
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigKeyMissing(_) => ErrorKind::ConfigKeyMissing,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Request(_) if self.is_transport_failure() => ErrorKind::Transport,
            Self::Request(_) if self.is_unauthorized() => ErrorKind::Unauthorized,
            Self::Request(_) if self.is_forced_update() => ErrorKind::ForcedUpdate,
            Self::Request(_) => ErrorKind::Http,
            Self::Codec(_) => ErrorKind::Codec,
            Self::Config(_) => ErrorKind::Config,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, CorbelError>;
