//! Conversions from external infrastructure errors into domain errors.

use corbel_domain::{CorbelError, ServiceResponse};
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub CorbelError);

impl From<InfraError> for CorbelError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<CorbelError> for InfraError {
    fn from(value: CorbelError) -> Self {
        Self(value)
    }
}

trait IntoCorbelError {
    fn into_corbel(self) -> CorbelError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → CorbelError */
/* -------------------------------------------------------------------------- */

impl IntoCorbelError for HttpError {
    fn into_corbel(self) -> CorbelError {
        if self.is_builder() {
            return CorbelError::Internal(format!("invalid http request: {self}"));
        }

        let reason = if self.is_timeout() {
            format!("http request timed out: {self}")
        } else if self.is_connect() {
            format!("http connection failed: {self}")
        } else if self.is_decode() || self.is_body() {
            format!("http response body could not be read: {self}")
        } else {
            format!("http request failed: {self}")
        };

        // Anything that never produced a usable response is a network failure.
        CorbelError::request(ServiceResponse::network_failure(reason))
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_corbel())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml / io → CorbelError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        Self(CorbelError::Config(format!("Invalid JSON format: {value}")))
    }
}

impl From<toml::de::Error> for InfraError {
    fn from(value: toml::de::Error) -> Self {
        Self(CorbelError::Config(format!("Invalid TOML format: {value}")))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        Self(CorbelError::Config(format!("Failed to read config file: {value}")))
    }
}
