//! # Configuration Settings
//!
//! Defines the configuration structure for the flotilla control plane.
//! All sections can be built from environment variables (`FLOTILLA_*`), with
//! defaults suitable for local development.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::{Error, Result};
use crate::provider::ConnectionConfig;

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|s| s.parse::<T>().ok()).unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key).map(|s| s.to_lowercase() == "true" || s == "1").unwrap_or(default)
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,

    #[validate(nested)]
    pub database: DatabaseConfig,

    #[validate(nested)]
    pub provider: ProviderConfig,

    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Build the full configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            provider: ProviderConfig::from_env(),
            observability: ObservabilityConfig::from_env(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()
    }

    fn validate_custom(&self) -> Result<()> {
        if !self.database.url.starts_with("sqlite://") {
            return Err(Error::validation("database URL must start with 'sqlite://'"));
        }

        if self.provider.broker_url.is_none() && !self.provider.use_mock_driver {
            return Err(Error::validation(
                "either FLOTILLA_BROKER_URL or FLOTILLA_USE_MOCK_DRIVER=1 must be set",
            ));
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1, message = "host cannot be empty"))]
    pub host: String,

    #[validate(range(min = 1, message = "port must be between 1 and 65535"))]
    pub port: u16,

    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8056, enable_cors: true }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("FLOTILLA_HOST").unwrap_or(defaults.host),
            port: env_parse("FLOTILLA_PORT", defaults.port),
            enable_cors: env_bool("FLOTILLA_ENABLE_CORS", defaults.enable_cors),
        }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DatabaseConfig {
    #[validate(length(min = 1, message = "database URL cannot be empty"))]
    pub url: String,

    #[validate(range(min = 1, max = 100, message = "max connections must be between 1 and 100"))]
    pub max_connections: u32,

    pub connect_timeout_seconds: u64,

    /// Run the embedded schema migration on startup
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/flotilla.db".to_string(),
            max_connections: 10,
            connect_timeout_seconds: 10,
            auto_migrate: true,
        }
    }
}

impl DatabaseConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: std::env::var("FLOTILLA_DATABASE_URL").unwrap_or(defaults.url),
            max_connections: env_parse("FLOTILLA_DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            connect_timeout_seconds: env_parse(
                "FLOTILLA_DATABASE_CONNECT_TIMEOUT_SECONDS",
                defaults.connect_timeout_seconds,
            ),
            auto_migrate: env_bool("FLOTILLA_DATABASE_AUTO_MIGRATE", defaults.auto_migrate),
        }
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

/// Provider driver gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProviderConfig {
    /// Base URL of the external resource broker each HTTP driver fronts
    pub broker_url: Option<String>,

    /// Register the in-memory mock driver instead of HTTP drivers
    pub use_mock_driver: bool,

    /// YAML file holding the connection table (name, provider, region)
    pub connections_file: Option<String>,

    /// Deadline applied to each provider call
    #[validate(range(min = 1, max = 600, message = "timeout must be between 1 and 600 seconds"))]
    pub request_timeout_seconds: u64,

    /// Worker pool bound for bulk deletions
    #[validate(range(min = 1, max = 64, message = "concurrency must be between 1 and 64"))]
    pub delete_concurrency: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            broker_url: None,
            use_mock_driver: false,
            connections_file: None,
            request_timeout_seconds: 30,
            delete_concurrency: 8,
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            broker_url: std::env::var("FLOTILLA_BROKER_URL").ok(),
            use_mock_driver: env_bool("FLOTILLA_USE_MOCK_DRIVER", defaults.use_mock_driver),
            connections_file: std::env::var("FLOTILLA_CONNECTIONS_FILE").ok(),
            request_timeout_seconds: env_parse(
                "FLOTILLA_PROVIDER_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            ),
            delete_concurrency: env_parse(
                "FLOTILLA_DELETE_CONCURRENCY",
                defaults.delete_concurrency,
            ),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Load the connection table from the configured YAML file.
    ///
    /// Returns an empty table when no file is configured, which is valid for
    /// mock-driver deployments.
    pub fn load_connections(&self) -> Result<Vec<ConnectionConfig>> {
        let Some(path) = self.connections_file.as_deref() else {
            return Ok(Vec::new());
        };

        let raw = std::fs::read_to_string(path).map_err(|e| Error::Io {
            source: e,
            context: format!("failed to read connections file '{}'", path),
        })?;

        serde_yaml::from_str(&raw).map_err(|e| {
            Error::config(format!("failed to parse connections file '{}': {}", path, e))
        })
    }
}

/// Observability configuration for logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ObservabilityConfig {
    #[validate(length(min = 1, message = "service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Optional log file; stdout when unset
    pub log_file: Option<String>,

    /// Enable Prometheus metrics collection
    pub enable_metrics: bool,

    /// Metrics server port (0 = disabled)
    pub metrics_port: u16,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            service_name: "flotilla".to_string(),
            log_level: "info".to_string(),
            json_logging: false,
            log_file: None,
            enable_metrics: false,
            metrics_port: 9090,
        }
    }
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            service_name: std::env::var("FLOTILLA_SERVICE_NAME").unwrap_or(defaults.service_name),
            log_level: std::env::var("FLOTILLA_LOG_LEVEL").unwrap_or(defaults.log_level),
            json_logging: env_bool("FLOTILLA_JSON_LOGGING", defaults.json_logging),
            log_file: std::env::var("FLOTILLA_LOG_FILE").ok(),
            enable_metrics: env_bool("FLOTILLA_ENABLE_METRICS", defaults.enable_metrics),
            metrics_port: env_parse("FLOTILLA_METRICS_PORT", defaults.metrics_port),
        }
    }

    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if !self.enable_metrics || self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_server_config_bind_address() {
        let config = ServerConfig { host: "0.0.0.0".to_string(), port: 8056, enable_cors: true };
        assert_eq!(config.bind_address(), "0.0.0.0:8056");
    }

    #[test]
    fn test_database_config_defaults() {
        let config = DatabaseConfig::default();
        assert!(config.url.starts_with("sqlite://"));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
        assert!(config.auto_migrate);
    }

    #[test]
    fn test_app_config_requires_some_driver() {
        let config = AppConfig::default();
        // Neither broker URL nor mock driver configured
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.provider.use_mock_driver = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_app_config_rejects_non_sqlite_url() {
        let mut config = AppConfig::default();
        config.provider.use_mock_driver = true;
        config.database.url = "postgresql://localhost/flotilla".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_connections_empty_without_file() {
        let config = ProviderConfig::default();
        assert!(config.load_connections().unwrap().is_empty());
    }

    #[test]
    fn test_load_connections_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- name: aws-ap-northeast-2\n  provider: aws\n  region: ap-northeast-2\n- name: gcp-us-west1\n  provider: gcp\n  region: us-west1"
        )
        .unwrap();

        let config = ProviderConfig {
            connections_file: Some(file.path().to_string_lossy().into_owned()),
            ..Default::default()
        };

        let connections = config.load_connections().unwrap();
        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].name, "aws-ap-northeast-2");
        assert_eq!(connections[1].provider, "gcp");
    }

    #[test]
    fn test_metrics_bind_address() {
        let config = ObservabilityConfig {
            enable_metrics: true,
            metrics_port: 9090,
            ..Default::default()
        };
        assert_eq!(config.metrics_bind_address(), Some("0.0.0.0:9090".to_string()));

        let disabled = ObservabilityConfig::default();
        assert_eq!(disabled.metrics_bind_address(), None);
    }
}
