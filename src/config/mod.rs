//! Configuration management for the flotilla control plane.

mod settings;

pub use settings::{
    AppConfig, DatabaseConfig, ObservabilityConfig, ProviderConfig, ServerConfig,
};
