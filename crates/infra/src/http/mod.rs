//! HTTP infrastructure

pub mod client;
pub mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use transport::ReqwestTransport;
