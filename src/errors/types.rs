//! # Error Types
//!
//! Error types for the flotilla control plane using `thiserror`.

/// Custom result type for flotilla operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the flotilla control plane.
///
/// Every failure that can surface from a lifecycle operation carries the
/// resource identifier involved, so callers can distinguish "does not exist"
/// from "exists but teardown failed" from "infrastructure unavailable".
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No record exists for the given key
    #[error("{resource_type} '{id}' not found")]
    NotFound { resource_type: String, id: String },

    /// Create collision: a live record already holds this (namespace, id)
    #[error("{resource_type} '{id}' already exists")]
    DuplicateResource { resource_type: String, id: String },

    /// Register path: the provider-side resource to adopt does not exist
    #[error("no provider resource '{csp_nlb_id}' found on connection '{connection}'")]
    RegistrationNotFound { connection: String, csp_nlb_id: String },

    /// Provider rejected the provisioning spec
    #[error("provider rejected request on connection '{connection}': {message}")]
    ProviderRejected { connection: String, message: String },

    /// Provider transiently unreachable or failing
    #[error("provider unavailable on connection '{connection}': {message}")]
    ProviderUnavailable { connection: String, message: String },

    /// Provider-side quota exhausted
    #[error("provider quota exceeded on connection '{connection}': {message}")]
    ProviderQuotaExceeded { connection: String, message: String },

    /// Delete rejected by the provider and not forced; the record is retained
    #[error("provider teardown failed for '{id}': {message}")]
    ProviderTeardownFailed { id: String, message: String },

    /// Durable store unreachable; fatal to the whole operation
    #[error("storage unavailable: {context}")]
    StorageUnavailable {
        context: String,
        #[source]
        source: Option<sqlx::Error>,
    },

    /// Request validation errors
    #[error("validation error: {message}")]
    Validation { message: String, field: Option<String> },

    /// Serialization/deserialization errors
    #[error("serialization error: {context}")]
    Serialization {
        #[source]
        source: serde_json::Error,
        context: String,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Config { message: String },

    /// I/O errors with additional context
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },

    /// Operation exceeded its deadline; the record keeps its last-committed status
    #[error("operation timed out: {operation} after {duration_ms}ms")]
    Timeout { operation: String, duration_ms: u64 },

    /// Internal errors
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create a duplicate resource error
    pub fn duplicate(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::DuplicateResource { resource_type: resource_type.into(), id: id.into() }
    }

    /// Create a registration lookup failure
    pub fn registration_not_found(
        connection: impl Into<String>,
        csp_nlb_id: impl Into<String>,
    ) -> Self {
        Self::RegistrationNotFound {
            connection: connection.into(),
            csp_nlb_id: csp_nlb_id.into(),
        }
    }

    /// Create a teardown failure for a retained record
    pub fn teardown_failed(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderTeardownFailed { id: id.into(), message: message.into() }
    }

    /// Create a storage unavailable error without an underlying cause
    pub fn storage_unavailable(context: impl Into<String>) -> Self {
        Self::StorageUnavailable { context: context.into(), source: None }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), field: None }
    }

    /// Create a validation error with field information
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation { message: message.into(), field: Some(field.into()) }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration_ms: u64) -> Self {
        Self::Timeout { operation: operation.into(), duration_ms }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal { message: message.into() }
    }

    /// Get the HTTP status code that should be returned for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::NotFound { .. } => 404,
            Error::RegistrationNotFound { .. } => 404,
            Error::DuplicateResource { .. } => 409,
            Error::ProviderTeardownFailed { .. } => 409,
            Error::ProviderRejected { .. } => 400,
            Error::Validation { .. } => 400,
            Error::ProviderQuotaExceeded { .. } => 429,
            Error::ProviderUnavailable { .. } => 502,
            Error::Timeout { .. } => 504,
            Error::StorageUnavailable { .. } => 500,
            Error::Serialization { .. } => 500,
            Error::Config { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal { .. } => 500,
        }
    }

    /// Stable machine-readable label for this error kind, used on the wire
    /// and in bulk-operation outcome reporting
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::DuplicateResource { .. } => "duplicate_resource",
            Error::RegistrationNotFound { .. } => "registration_not_found",
            Error::ProviderRejected { .. } => "provider_rejected",
            Error::ProviderUnavailable { .. } => "provider_unavailable",
            Error::ProviderQuotaExceeded { .. } => "provider_quota_exceeded",
            Error::ProviderTeardownFailed { .. } => "provider_teardown_failed",
            Error::StorageUnavailable { .. } => "storage_unavailable",
            Error::Validation { .. } => "validation",
            Error::Serialization { .. } => "serialization",
            Error::Config { .. } => "config",
            Error::Io { .. } => "io",
            Error::Timeout { .. } => "timeout",
            Error::Internal { .. } => "internal",
        }
    }

    /// Check if this error should be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::ProviderUnavailable { .. }
                | Error::ProviderQuotaExceeded { .. }
                | Error::StorageUnavailable { .. }
                | Error::Timeout { .. }
                | Error::Io { .. }
        )
    }
}

// Error conversions for common external error types
impl From<sqlx::Error> for Error {
    fn from(error: sqlx::Error) -> Self {
        Self::StorageUnavailable {
            context: "storage operation failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io { source: error, context: "I/O operation failed".to_string() }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization { source: error, context: "JSON serialization failed".to_string() }
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .map(|(field, field_errors)| {
                let error_messages: Vec<String> = field_errors
                    .iter()
                    .map(|e| {
                        e.message.as_ref().map_or("invalid value".to_string(), |m| m.to_string())
                    })
                    .collect();
                format!("{}: {}", field, error_messages.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");

        Self::validation(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_identifier() {
        let error = Error::not_found("NLB", "nlb-01");
        assert_eq!(error.to_string(), "NLB 'nlb-01' not found");

        let error = Error::teardown_failed("nlb-01", "csp refused");
        assert!(error.to_string().contains("nlb-01"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::not_found("NLB", "x").status_code(), 404);
        assert_eq!(Error::registration_not_found("aws-east", "lb-1").status_code(), 404);
        assert_eq!(Error::duplicate("NLB", "x").status_code(), 409);
        assert_eq!(Error::teardown_failed("x", "refused").status_code(), 409);
        assert_eq!(Error::validation("bad").status_code(), 400);
        assert_eq!(Error::storage_unavailable("down").status_code(), 500);
        assert_eq!(Error::timeout("create", 1000).status_code(), 504);
    }

    #[test]
    fn test_retryable_errors() {
        assert!(Error::storage_unavailable("down").is_retryable());
        assert!(Error::timeout("create", 1000).is_retryable());
        assert!(!Error::validation("bad").is_retryable());
        assert!(!Error::not_found("NLB", "x").is_retryable());
        assert!(!Error::duplicate("NLB", "x").is_retryable());
    }

    #[test]
    fn test_validation_field() {
        let error = Error::validation_field("must not be empty", "name");
        if let Error::Validation { field, .. } = error {
            assert_eq!(field, Some("name".to_string()));
        } else {
            panic!("expected validation error");
        }
    }

    #[test]
    fn test_error_conversions() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: Error = io_error.into();
        assert!(matches!(error, Error::Io { .. }));

        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: Error = json_error.into();
        assert!(matches!(error, Error::Serialization { .. }));
    }
}
