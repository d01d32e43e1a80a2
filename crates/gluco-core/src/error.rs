//! Error types for the glucocast service.

use std::path::PathBuf;

use thiserror::Error;

/// Core error type for the forecasting service
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Request payload is absent or is not the expected JSON shape
    #[error("{0}")]
    InvalidPayload(String),

    /// Reading sequence has the wrong length or contains unusable values
    #[error("{0}")]
    InvalidReadings(String),

    /// A required artifact file does not exist
    #[error("Artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// Scaler artifact is malformed or incompatible with the input
    #[error("Scaler error: {0}")]
    ScalerError(String),

    /// Array shape does not match the artifact contract
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// The expected shape
        expected: String,
        /// The shape actually seen
        actual: String,
    },

    /// Model loading or inference error
    #[error("Model inference error: {0}")]
    ModelError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the error was caused by the client's request rather than the service
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidPayload(_) | Error::InvalidReadings(_))
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_unprefixed() {
        let err = Error::InvalidReadings("Enter exactly 10 glucose readings".to_string());
        assert_eq!(err.to_string(), "Enter exactly 10 glucose readings");
    }

    #[test]
    fn test_artifact_not_found_names_path() {
        let err = Error::ArtifactNotFound(PathBuf::from("/opt/glucocast/scaler.json"));
        assert_eq!(
            err.to_string(),
            "Artifact not found: /opt/glucocast/scaler.json"
        );
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::InvalidPayload("x".into()).is_client_error());
        assert!(Error::InvalidReadings("x".into()).is_client_error());
        assert!(!Error::ModelError("x".into()).is_client_error());
        assert!(!Error::ShapeMismatch {
            expected: "72".into(),
            actual: "10".into(),
        }
        .is_client_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::IoError(_)));
        assert!(err.to_string().contains("denied"));
    }
}
