//! Layered error definitions
//!
//! Categorized by recovery policy: transient (retried) / handle (one
//! reinitialize cycle) / deadline / caller error / unrecoverable.

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum CameraError {
    // ===== Retried transparently =====
    /// Service temporarily unavailable (restart, switchover)
    #[error("camera service unavailable: {message}")]
    Unavailable { message: String },

    // ===== Absorbed once via reinitialization =====
    /// Server-side handle no longer exists
    #[error("camera handle not found: {message}")]
    HandleNotFound { message: String },

    // ===== Fail fast, never retried =====
    /// Operation deadline expired before or during a remote call
    #[error("deadline exceeded during '{operation}'")]
    DeadlineExceeded { operation: String },

    // ===== Caller errors =====
    /// Requested sensor name is not in the registry
    #[error("unknown sensor '{name}'")]
    UnknownSensor { name: String },

    /// Setting does not exist, or supplied value has the wrong type
    #[error("invalid setting '{name}': {message}")]
    InvalidSetting { name: String, message: String },

    // ===== Unrecoverable without caller intervention =====
    /// Service accepted the create call but returned no handle id
    #[error("could not create camera handle: {message}")]
    HandleCreationFailed { message: String },

    /// No configuration could be obtained for reinitialization
    #[error("camera configuration missing for '{resource}': {message}")]
    ConfigurationMissing { resource: String, message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error, surfaced unchanged and never retried
    #[error("{0}")]
    Other(String),
}

impl CameraError {
    /// Create a transient-unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a handle-not-found error
    pub fn handle_not_found(message: impl Into<String>) -> Self {
        Self::HandleNotFound {
            message: message.into(),
        }
    }

    /// Create a deadline-exceeded error for a named operation
    pub fn deadline_exceeded(operation: impl Into<String>) -> Self {
        Self::DeadlineExceeded {
            operation: operation.into(),
        }
    }

    /// Create an unknown-sensor error
    pub fn unknown_sensor(name: impl Into<String>) -> Self {
        Self::UnknownSensor { name: name.into() }
    }

    /// Create an invalid-setting error
    pub fn invalid_setting(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSetting {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a handle-creation-failed error
    pub fn handle_creation_failed(message: impl Into<String>) -> Self {
        Self::HandleCreationFailed {
            message: message.into(),
        }
    }

    /// Create a configuration-missing error
    pub fn configuration_missing(
        resource: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::ConfigurationMissing {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Create a configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether the retry policy may absorb this error.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    /// Whether this error triggers the one-shot reinitialize cycle.
    pub fn is_handle_not_found(&self) -> bool {
        matches!(self, Self::HandleNotFound { .. })
    }

    /// Whether the operation deadline expired.
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, Self::DeadlineExceeded { .. })
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, CameraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(CameraError::unavailable("x").is_unavailable());
        assert!(!CameraError::unavailable("x").is_handle_not_found());
        assert!(CameraError::handle_not_found("x").is_handle_not_found());
        assert!(CameraError::deadline_exceeded("capture").is_deadline_exceeded());
        assert!(!CameraError::unknown_sensor("left").is_unavailable());
    }

    #[test]
    fn test_display_carries_context() {
        let err = CameraError::deadline_exceeded("capture");
        assert!(err.to_string().contains("capture"));

        let err = CameraError::unknown_sensor("left");
        assert!(err.to_string().contains("left"));
    }
}
