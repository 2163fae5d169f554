//! wire types for the ABDM gateway and enrollment endpoints.
//!
//! the `client` feature adds a blocking http client that sends them.

pub mod error;
pub use error::{GatewayError, GatewayErrorKind};

pub mod headers;
pub use headers::RequestMeta;

pub mod session;
pub mod enrollment;

#[cfg(feature = "client")]
pub mod client;
