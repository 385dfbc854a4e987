//! Tracing initialisation
//!
//! The SDK only emits `tracing` events; applications that do not install a
//! subscriber of their own can call [`init_tracing`].

use corbel_domain::{CorbelError, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,corbel_core=debug,corbel_infra=debug";

/// Install a global fmt subscriber filtered by `RUST_LOG`.
///
/// # Errors
/// Returns `CorbelError::Internal` when a global subscriber is already set.
pub fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if json {
        registry.with(fmt::layer().json().with_target(true)).try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed.map_err(|e| CorbelError::Internal(format!("tracing subscriber already installed: {e}")))
}
