//! Client configuration

pub mod store;

pub use store::ConfigStore;
