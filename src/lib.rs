//! # flotilla
//!
//! flotilla is a namespaced control plane that manages the lifecycle of
//! network load balancers spanning multiple cloud providers, presenting one
//! logical resource model over heterogeneous provider APIs. Each NLB is
//! either provisioned fresh through a provider driver or adopted
//! ("registered") from an already-existing provider-side resource, then
//! tracked as a uniform internal record.
//!
//! ## Architecture
//!
//! ```text
//! REST API Layer → Lifecycle Controller → Provider Driver Gateway → Cloud APIs
//!                        ↓
//!                  Resource Store (SQLite)
//! ```
//!
//! ## Core Components
//!
//! - **Lifecycle Controller** ([`services::NlbService`]): create/register,
//!   get, list, delete and bulk delete, with per-key serialization and
//!   bounded bulk concurrency
//! - **Provider Driver Gateway** ([`provider`]): the create/describe/delete
//!   capability set, one driver per provider behind a registration table
//! - **Resource Store** ([`storage`]): namespace-scoped durable map from
//!   resource identifier to NLB record
//! - **REST API** ([`api`]): axum handlers binding the controller to
//!   `/ns/{namespace}/nlb` routes

pub mod api;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod provider;
pub mod services;
pub mod storage;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{Error, Result};

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "flotilla");
    }
}
