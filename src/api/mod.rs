//! HTTP-facing layer for the flotilla control plane.
//!
//! This layer owns only transport concerns: request binding, query parsing,
//! error-to-status translation, and serialization. Lifecycle semantics live
//! in [`crate::services::NlbService`].

pub mod docs;
pub mod error;
pub mod handlers;
pub mod routes;

pub use error::ApiError;
pub use routes::{build_router, start_api_server, ApiState};
