//! Client lifecycle events

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::CorbelError;
use crate::impl_wire_name_conversions;
use crate::types::{RequestArgs, RequestDescriptor, ServiceResponse};

/// Closed set of events a client emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientEvent {
    /// Fired with the raw arguments before a top-level request is dispatched.
    #[serde(rename = "service:request:before")]
    ServiceRequestBefore,
    /// Fired with the terminal outcome of a top-level request.
    #[serde(rename = "service:request:after")]
    ServiceRequestAfter,
    /// Fired with the token payload after a successful create or refresh.
    #[serde(rename = "token:refresh")]
    TokenRefresh,
    /// Fired with the response when the server requires a client upgrade.
    #[serde(rename = "force:update")]
    ForceUpdate,
    /// Fired with the final descriptor for every transport exchange.
    #[serde(rename = "request")]
    Request,
}

impl_wire_name_conversions!(ClientEvent {
    ServiceRequestBefore => "service:request:before",
    ServiceRequestAfter => "service:request:after",
    TokenRefresh => "token:refresh",
    ForceUpdate => "force:update",
    Request => "request",
});

/// Data handed to event listeners.
#[derive(Debug, Clone)]
pub enum EventPayload {
    Args(Box<RequestArgs>),
    Descriptor(Box<RequestDescriptor>),
    Response(ServiceResponse),
    Failure(CorbelError),
    Token(Value),
}

impl EventPayload {
    /// Response carried by the payload, including a failed one.
    #[must_use]
    pub fn response(&self) -> Option<&ServiceResponse> {
        match self {
            Self::Response(response) => Some(response),
            Self::Failure(error) => error.response(),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

impl From<&crate::Result<ServiceResponse>> for EventPayload {
    fn from(outcome: &crate::Result<ServiceResponse>) -> Self {
        match outcome {
            Ok(response) => Self::Response(response.clone()),
            Err(error) => Self::Failure(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseData;

    #[test]
    fn event_names_round_trip() {
        for event in [
            ClientEvent::ServiceRequestBefore,
            ClientEvent::ServiceRequestAfter,
            ClientEvent::TokenRefresh,
            ClientEvent::ForceUpdate,
            ClientEvent::Request,
        ] {
            assert_eq!(event.as_str().parse::<ClientEvent>(), Ok(event));
        }
        assert_eq!(serde_json::to_value(ClientEvent::ForceUpdate).unwrap(), "force:update");
    }

    #[test]
    fn failure_payload_exposes_response() {
        let outcome: crate::Result<ServiceResponse> =
            Err(CorbelError::request(ServiceResponse::new(500, ResponseData::Empty)));
        let payload = EventPayload::from(&outcome);
        assert!(payload.is_failure());
        assert_eq!(payload.response().map(|r| r.status), Some(500));
    }
}
