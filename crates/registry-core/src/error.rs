//! Error types for the mods registry.
//!
//! Per-document validation problems are *not* errors in this sense; they are
//! collected as diagnostics by the index builder so a single run can surface
//! every broken manifest at once. `RegistryError` covers boundary failures:
//! I/O, codecs, network, configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    // Network errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        /// Optional cause description
        cause: Option<String>,
    },

    #[error("Request timeout after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    // File system errors
    #[error("IO error at {path:?}: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Manifest file not found: {0}")]
    ManifestNotFound(PathBuf),

    #[error("Manifests directory not found: {0}")]
    CorpusNotFound(PathBuf),

    // Serialization errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: Option<serde_yaml::Error>,
    },

    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    // Integrity errors
    #[error("Hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: String, actual: String },

    // Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    // Generic errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

// Conversion implementations for common error types

impl From<std::io::Error> for RegistryError {
    fn from(err: std::io::Error) -> Self {
        RegistryError::Io {
            message: err.to_string(),
            path: None,
            source: Some(err),
        }
    }
}

impl From<serde_yaml::Error> for RegistryError {
    fn from(err: serde_yaml::Error) -> Self {
        RegistryError::Yaml {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Json {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RegistryError::Timeout(std::time::Duration::from_secs(0))
        } else {
            RegistryError::Network {
                message: err.to_string(),
                cause: Some(err.to_string()),
            }
        }
    }
}

impl RegistryError {
    /// Create an IO error with path context.
    pub fn io_with_path(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        RegistryError::Io {
            message: err.to_string(),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Check if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RegistryError::Network { .. } | RegistryError::Timeout(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::HashMismatch {
            expected: "aa".into(),
            actual: "bb".into(),
        };
        assert_eq!(err.to_string(), "Hash mismatch: expected aa, got bb");
    }

    #[test]
    fn test_retryable_errors() {
        assert!(RegistryError::Timeout(std::time::Duration::from_secs(5)).is_retryable());
        assert!(!RegistryError::ManifestNotFound(PathBuf::from("x.yaml")).is_retryable());
    }
}
