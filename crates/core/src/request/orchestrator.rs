//! Request orchestration
//!
//! Every builder call funnels through [`RequestOrchestrator::request`]:
//!
//! 1. `service:request:before` fires with the raw arguments.
//! 2. Parameters are normalized and the transport is called.
//! 3. A 401 triggers one shared token refresh and one retry of the same
//!    arguments. A failed refresh surfaces the original 401.
//! 4. A 403 carrying the unsupported-version marker is counted (up to three
//!    times per client) and announced on `force:update`; it is never retried.
//! 5. `service:request:after` fires with the terminal outcome and the
//!    unauthorized counter returns to 0.
//!
//! The retry counters live in the client config, so every caller sharing a
//! client shares the same budget.

use std::sync::Arc;

use corbel_domain::constants::{
    FORCE_UPDATE_MAX_RETRIES, FORCE_UPDATE_STATUS, UNAUTHORIZED_MAX_RETRIES,
    UNAUTHORIZED_NUM_RETRIES,
};
use corbel_domain::{
    ClientEvent, EventPayload, RequestArgs, RequestDescriptor, Result, ServiceResponse,
};
use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, instrument, warn};

use super::dispatch::dispatch;
use super::params::build_params;
use crate::auth::TokenProvider;
use crate::config::ConfigStore;
use crate::context::ClientContext;

/// Builds, sends and retries requests for one client.
#[derive(Debug, Clone)]
pub struct RequestOrchestrator {
    ctx: Arc<ClientContext>,
}

impl RequestOrchestrator {
    pub const fn new(ctx: Arc<ClientContext>) -> Self {
        Self { ctx }
    }

    pub const fn context(&self) -> &Arc<ClientContext> {
        &self.ctx
    }

    pub fn config(&self) -> &ConfigStore {
        self.ctx.config()
    }

    /// Normalize `args` into a transport descriptor without sending it.
    ///
    /// # Errors
    /// Returns `CorbelError::Validation` when the url is missing.
    pub fn build_params(&self, args: &RequestArgs) -> Result<RequestDescriptor> {
        build_params(self.ctx.config(), args)
    }

    /// Execute a request with the client's refresh and force-update policy.
    ///
    /// # Errors
    /// Returns the terminal failure: the transport's `CorbelError::Request`
    /// (after at most one refresh-and-retry on 401), or a validation error.
    #[instrument(skip(self, args), fields(url = %args.url, method = ?args.method))]
    pub async fn request(&self, args: RequestArgs) -> Result<ServiceResponse> {
        let events = self.ctx.events();
        events.trigger(ClientEvent::ServiceRequestBefore, &EventPayload::Args(Box::new(args.clone())));

        let outcome = self.request_with_retries(&args).await;

        events.trigger(ClientEvent::ServiceRequestAfter, &EventPayload::from(&outcome));
        self.ctx.config().set_counter(UNAUTHORIZED_NUM_RETRIES, 0);

        match &outcome {
            Ok(response) => {
                if let Some(hook) = &args.on_success {
                    hook(response);
                }
            }
            Err(error) => {
                debug!(error = %error, "Request failed");
                if let Some(hook) = &args.on_error {
                    hook(error);
                }
            }
        }

        outcome
    }

    fn request_with_retries<'a>(
        &'a self,
        args: &'a RequestArgs,
    ) -> BoxFuture<'a, Result<ServiceResponse>> {
        async move {
            let config = self.ctx.config();
            let descriptor = build_params(config, args)?;

            let error = match self.do_request(descriptor).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            let retries = config.counter(UNAUTHORIZED_NUM_RETRIES);
            if args.no_retry || retries >= UNAUTHORIZED_MAX_RETRIES || !error.is_unauthorized() {
                debug!(status = ?error.status(), retries, "No token refresh for this failure");
                config.set_counter(UNAUTHORIZED_NUM_RETRIES, 0);
                return Err(error);
            }

            debug!("Unauthorized response, refreshing token before retrying");
            match TokenProvider::new(self.ctx.clone()).refresh_token().await {
                Ok(_) => {
                    config.set_counter(UNAUTHORIZED_NUM_RETRIES, retries + 1);
                    // The retry's outcome is final, failure included.
                    self.request_with_retries(args).await
                }
                Err(refresh_error) => {
                    warn!(error = %refresh_error, "Token refresh failed, returning original response");
                    Err(error)
                }
            }
        }
        .boxed()
    }

    async fn do_request(&self, descriptor: RequestDescriptor) -> Result<ServiceResponse> {
        let config = self.ctx.config();
        match dispatch(&self.ctx, descriptor).await {
            Ok(response) => {
                config.set_counter(FORCE_UPDATE_STATUS, 0);
                config.set_counter(UNAUTHORIZED_NUM_RETRIES, 0);
                Ok(response)
            }
            Err(error) => {
                if let Some(response) = error.response().filter(|_| error.is_forced_update()) {
                    let retries = config.counter(FORCE_UPDATE_STATUS);
                    if retries < FORCE_UPDATE_MAX_RETRIES {
                        config.set_counter(FORCE_UPDATE_STATUS, retries + 1);
                        warn!(attempt = retries + 1, "Server requires a client update");
                        self.ctx
                            .events()
                            .trigger(ClientEvent::ForceUpdate, &EventPayload::Response(response.clone()));
                    }
                }
                Err(error)
            }
        }
    }
}
