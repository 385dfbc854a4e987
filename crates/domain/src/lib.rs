//! # Corbel Domain
//!
//! Domain types shared by every Corbel SDK crate.
//!
//! This crate contains:
//! - The SDK error type and Result alias
//! - Request descriptors, normalized responses and token objects
//! - Backend module catalogue (names and default ports)
//! - Lifecycle event names and payloads
//! - Typed client settings and well-known configuration keys
//!
//! ## Architecture
//! - No dependencies on other Corbel crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use events::*;
pub use types::*;
