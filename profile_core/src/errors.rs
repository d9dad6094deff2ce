//! # Error Types
//!
//! Structured error types for profile_core. The digitizer itself never fails
//! (bad input degrades to "no change"), so these errors only surface from the
//! fallible edges: geometry export validation, configuration parsing and
//! profile document IO.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::errors::{ProfileError, ProfileResult};
//!
//! fn validate_clearance(clearance: f64) -> ProfileResult<()> {
//!     if !(clearance > 0.0) {
//!         return Err(ProfileError::invalid_input(
//!             "clearance",
//!             clearance.to_string(),
//!             "Clearance must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for profile_core operations
pub type ProfileResult<T> = Result<T, ProfileError>;

/// Structured error type for profile operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ProfileError {
    /// An input value is invalid (non-finite, negative, malformed)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Externally supplied true lengths are not index-aligned with the segments
    #[error("True lengths misaligned: {lengths} lengths supplied for {segments} segments")]
    LengthMismatch { segments: usize, lengths: usize },

    /// Configuration could not be parsed or holds unusable values
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl ProfileError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ProfileError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        ProfileError::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ProfileError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        ProfileError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ProfileError::InvalidInput { .. } => "INVALID_INPUT",
            ProfileError::LengthMismatch { .. } => "LENGTH_MISMATCH",
            ProfileError::ConfigError { .. } => "CONFIG_ERROR",
            ProfileError::FileError { .. } => "FILE_ERROR",
            ProfileError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ProfileError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
