//! HTTP transport mapping
//!
//! [`status`] holds the error-code-to-status policy and has no HTTP
//! dependency. The axum adapter is compiled with the `http-server` feature.

#[cfg(feature = "http-server")]
pub mod axum_adapter;
pub mod status;

#[cfg(feature = "http-server")]
pub use axum_adapter::{ErrorBody, OutcomeResponse};
pub use status::ResponseClass;
