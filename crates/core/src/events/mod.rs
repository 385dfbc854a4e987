//! Client lifecycle events

pub mod bus;

pub use bus::{EventBus, Listener};
