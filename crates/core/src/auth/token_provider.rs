//! Single-flight access token refresh
//!
//! At most one create-or-refresh exchange runs per client. Callers arriving
//! while it is in flight await the same shared future and observe the same
//! outcome.

use std::sync::Arc;

use corbel_domain::constants::IAM_TOKEN_SCOPES;
use corbel_domain::{ClientEvent, EventPayload, Result, ServiceResponse};
use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::context::ClientContext;
use crate::modules::iam::{scope_text, TokenBuilder, TokenParams};

#[derive(Debug, Clone)]
pub struct TokenProvider {
    ctx: Arc<ClientContext>,
}

impl TokenProvider {
    pub const fn new(ctx: Arc<ClientContext>) -> Self {
        Self { ctx }
    }

    /// Obtain a new access token, joining any refresh already in flight.
    ///
    /// Refreshes with the stored refresh token when there is one, otherwise
    /// creates a token from the client credentials.
    ///
    /// # Errors
    /// Returns the exchange's failure to every waiter; config is untouched.
    pub async fn refresh_token(&self) -> Result<ServiceResponse> {
        let ctx = self.ctx.clone();
        let (refresh, started) = self.ctx.join_or_start_refresh(move || run(ctx).boxed());
        if !started {
            debug!("Joining in-flight token refresh");
        }
        refresh.await
    }
}

async fn run(ctx: Arc<ClientContext>) -> Result<ServiceResponse> {
    let tokens = TokenBuilder::new(ctx.clone());
    let config = ctx.config();

    let issued = match config.refresh_token() {
        Some(refresh_token) => {
            info!("Refreshing access token");
            let scopes = config.get(IAM_TOKEN_SCOPES).map(|scope| scope_text(&scope)).unwrap_or_default();
            tokens.reissue(&refresh_token, &scopes).await
        }
        None => {
            info!("Requesting new access token");
            tokens.issue(&TokenParams::default(), false).await
        }
    };

    // Settled: later callers start a fresh exchange.
    ctx.clear_pending_refresh();

    match issued {
        Ok(issued) => {
            tokens.store(&issued);
            ctx.events().trigger(ClientEvent::TokenRefresh, &EventPayload::Token(issued.response.data.to_json()));
            Ok(issued.response)
        }
        Err(error) => {
            warn!(error = %error, "Access token refresh failed");
            Err(error)
        }
    }
}
