//! Request building, dispatch and retry policy

pub mod dispatch;
pub mod orchestrator;
pub mod params;

pub use dispatch::{apply_method_override, dispatch};
pub use orchestrator::RequestOrchestrator;
pub use params::build_params;
