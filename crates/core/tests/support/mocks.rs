//! Transport and codec doubles
//!
//! `MockTransport` answers by URL substring with scripted responses and
//! records every descriptor it receives. `MockCodec` signs by serializing the
//! claims, so tests can read back exactly what was asserted.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use corbel_core::{Claims, HttpTransport, TokenCodec};
use corbel_domain::{
    CorbelError, Method, RequestDescriptor, ResponseData, Result as CorbelResult, ServiceResponse,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

type Handler = Arc<dyn Fn(&RequestDescriptor) -> ServiceResponse + Send + Sync>;

enum Reply {
    Queue(VecDeque<ServiceResponse>),
    Handler(Handler),
}

struct Route {
    pattern: String,
    method: Option<Method>,
    reply: Reply,
}

/// Scripted [`HttpTransport`].
///
/// Each route replays its queued responses in order and keeps repeating the
/// last one. Responses with an error status come back as
/// `CorbelError::Request`, like the real transport.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<Vec<Route>>,
    calls: Mutex<Vec<RequestDescriptor>>,
    delay: Option<Duration>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend every call for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue `responses` for URLs containing `pattern`, any method.
    pub fn route(&self, pattern: &str, responses: Vec<ServiceResponse>) -> &Self {
        self.push_route(pattern, None, responses)
    }

    pub fn route_method(&self, pattern: &str, method: Method, responses: Vec<ServiceResponse>) -> &Self {
        self.push_route(pattern, Some(method), responses)
    }

    /// Answer URLs containing `pattern` by inspecting the descriptor.
    pub fn route_with(
        &self,
        pattern: &str,
        handler: impl Fn(&RequestDescriptor) -> ServiceResponse + Send + Sync + 'static,
    ) -> &Self {
        self.routes.lock().push(Route {
            pattern: pattern.to_string(),
            method: None,
            reply: Reply::Handler(Arc::new(handler)),
        });
        self
    }

    /// 200 with `body` when the request carries `Bearer <token>`, 401
    /// otherwise.
    pub fn route_requiring_token(&self, pattern: &str, token: &str, body: Value) -> &Self {
        let expected = format!("Bearer {token}");
        self.route_with(pattern, move |descriptor| {
            if descriptor.header("Authorization") == Some(expected.as_str()) {
                ok_json(body.clone())
            } else {
                status(401)
            }
        })
    }

    fn push_route(&self, pattern: &str, method: Option<Method>, responses: Vec<ServiceResponse>) -> &Self {
        self.routes.lock().push(Route {
            pattern: pattern.to_string(),
            method,
            reply: Reply::Queue(responses.into()),
        });
        self
    }

    pub fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().clone()
    }

    pub fn calls_to(&self, pattern: &str) -> Vec<RequestDescriptor> {
        self.calls().into_iter().filter(|call| call.url.contains(pattern)).collect()
    }

    pub fn call_count(&self, pattern: &str) -> usize {
        self.calls_to(pattern).len()
    }

    fn answer(&self, descriptor: &RequestDescriptor) -> ServiceResponse {
        let mut routes = self.routes.lock();
        let route = routes.iter_mut().find(|route| {
            descriptor.url.contains(&route.pattern)
                && route.method.map_or(true, |method| method == descriptor.method)
        });
        let Some(route) = route else {
            return ServiceResponse::new(404, ResponseData::Empty);
        };
        match &mut route.reply {
            Reply::Queue(queue) if queue.len() > 1 => queue.pop_front().unwrap_or_default(),
            Reply::Queue(queue) => queue.front().cloned().unwrap_or_default(),
            Reply::Handler(handler) => handler(descriptor),
        }
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, descriptor: RequestDescriptor) -> CorbelResult<ServiceResponse> {
        self.calls.lock().push(descriptor.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = self.answer(&descriptor);
        if response.is_success() {
            Ok(response)
        } else {
            Err(CorbelError::request(response))
        }
    }
}

/// Deterministic [`TokenCodec`].
///
/// Assertions are `signed:<claims json>`; any other token decodes to a
/// `domainId` of `test-domain`, except tokens starting with `bad` which fail.
#[derive(Default)]
pub struct MockCodec {
    generated: Mutex<Vec<Claims>>,
}

impl MockCodec {
    pub fn generated(&self) -> Vec<Claims> {
        self.generated.lock().clone()
    }
}

impl TokenCodec for MockCodec {
    fn generate(&self, claims: &Claims, _secret: &str) -> CorbelResult<String> {
        self.generated.lock().push(claims.clone());
        Ok(format!("signed:{}", Value::Object(claims.clone())))
    }

    fn decode(&self, token: &str) -> CorbelResult<Claims> {
        if let Some(body) = token.strip_prefix("signed:") {
            return serde_json::from_str(body).map_err(|err| CorbelError::Codec(err.to_string()));
        }
        if token.starts_with("bad") {
            return Err(CorbelError::Codec("malformed token".into()));
        }
        let mut claims = Claims::new();
        claims.insert("domainId".into(), json!("test-domain"));
        Ok(claims)
    }
}

/// 200 with a JSON body.
pub fn ok_json(body: Value) -> ServiceResponse {
    ServiceResponse::new(200, ResponseData::Json(body))
}

pub fn status(code: u16) -> ServiceResponse {
    ServiceResponse::new(code, ResponseData::Empty)
}

/// 201 with a `Location` header pointing at `location`.
pub fn created(location: &str) -> ServiceResponse {
    ServiceResponse::new(201, ResponseData::Empty).with_header("Location", location)
}

/// Token endpoint success carrying `access` and an optional refresh token.
pub fn token_response(access: &str, refresh: Option<&str>) -> ServiceResponse {
    let mut body = json!({ "accessToken": access, "expiresAt": 4_102_444_800_000_i64 });
    if let Some(refresh) = refresh {
        body["refreshToken"] = json!(refresh);
    }
    ok_json(body)
}

/// 403 carrying the unsupported-version marker.
pub fn forced_update() -> ServiceResponse {
    ServiceResponse::new(403, ResponseData::Json(json!({ "error": "unsupported_version" })))
}
