//! Domain types and models
//!
//! Request arguments and descriptors, normalized responses, token objects
//! and the backend module catalogue.

pub mod module;
pub mod request;
pub mod response;
pub mod token;

pub use module::Module;
pub use request::{
    DataType, ErrorHook, Method, RequestArgs, RequestBody, RequestDescriptor, ResponseHook,
};
pub use response::{ResponseData, ServiceResponse};
pub use token::IamToken;
