//! Access token lifecycle

pub mod token_provider;

pub use token_provider::TokenProvider;
