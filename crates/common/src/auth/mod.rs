//! Token signing primitives

pub mod jwt;

pub use jwt::{Claims, JwtError};
