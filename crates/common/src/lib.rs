//! Modular common utilities shared across Corbel crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: argument validation
//! - `platform`: token signing (HS256 assertions)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod validation;

// Platform tier
// -------------------------------------------------------------------
#[cfg(feature = "platform")]
pub mod auth;

// Re-export commonly used types for convenience
// ------------------------
#[cfg(feature = "platform")]
pub use auth::{Claims, JwtError};
#[cfg(feature = "foundation")]
pub use validation::{FieldError, ValidationError, ValidationResult};
