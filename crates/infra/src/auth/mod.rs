//! Token signing adapters

pub mod jwt_codec;

pub use jwt_codec::HmacTokenCodec;
