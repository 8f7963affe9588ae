//! Error types for provider driver operations.

use thiserror::Error;

use crate::errors::Error as CrateError;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors reported by a provider driver.
///
/// Drivers perform no retries themselves; callers decide what a failure
/// means for the internal record.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The provider refused the request outright (invalid spec)
    #[error("provider rejected the request: {message}")]
    Rejected { message: String },

    /// The provider could not be reached or answered with a server fault
    #[error("provider unavailable: {message}")]
    Unavailable { message: String },

    /// Provider-side quota exhausted
    #[error("provider quota exceeded: {message}")]
    QuotaExceeded { message: String },
}

impl DriverError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected { message: message.into() }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable { message: message.into() }
    }

    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::QuotaExceeded { message: message.into() }
    }

    /// Whether a failed provisioning call may have left a provider-side
    /// resource behind. A clean rejection never allocates; an unavailable
    /// provider might have accepted the request before failing.
    pub fn may_have_allocated(&self) -> bool {
        matches!(self, DriverError::Unavailable { .. })
    }

    /// Translate into the crate error, attaching the connection the call
    /// went through.
    pub fn into_error(self, connection: &str) -> CrateError {
        let connection = connection.to_string();
        match self {
            DriverError::Rejected { message } => {
                CrateError::ProviderRejected { connection, message }
            }
            DriverError::Unavailable { message } => {
                CrateError::ProviderUnavailable { connection, message }
            }
            DriverError::QuotaExceeded { message } => {
                CrateError::ProviderQuotaExceeded { connection, message }
            }
        }
    }
}
