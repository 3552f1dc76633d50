//! # Error Types
//!
//! Structured error types for wingbox_core. Every stage of the analysis
//! pipeline returns [`WingBoxResult`]; the first failing evaluation aborts
//! the stage and the error propagates unchanged to the caller.
//!
//! Structural failures (a margin below one, a deflection over its limit) are
//! *not* errors. They are reported in the analysis report and the run
//! continues.
//!
//! ## Example
//!
//! ```rust
//! use wingbox_core::errors::{WingBoxError, WingBoxResult};
//!
//! fn validate_step(step_m: f64) -> WingBoxResult<()> {
//!     if step_m <= 0.0 {
//!         return Err(WingBoxError::invalid_input(
//!             "step",
//!             step_m.to_string(),
//!             "Span step must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! # assert!(validate_step(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for wingbox_core operations
pub type WingBoxResult<T> = Result<T, WingBoxError>;

/// Structured error type for analysis operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum WingBoxError {
    /// Sample data cannot form a curve (too few points, unsorted, non-finite)
    #[error("Domain error: {reason}")]
    Domain { reason: String },

    /// Adaptive quadrature did not reach its tolerance within the subdivision limit
    #[error(
        "Integration over [{lower}, {upper}] did not converge after {subdivisions} subdivisions \
         (error estimate {error_estimate:.3e}, tolerance {tolerance:.3e})"
    )]
    Integration {
        lower: f64,
        upper: f64,
        subdivisions: usize,
        error_estimate: f64,
        tolerance: f64,
    },

    /// A span position lies outside every wing-box section
    #[error("No wing-box section covers span position y = {y} m")]
    Geometry { y: f64 },

    /// An input value is invalid (out of range, inconsistent, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

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

    /// Case-file schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (worker panic and the like)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WingBoxError {
    /// Create a Domain error
    pub fn domain(reason: impl Into<String>) -> Self {
        WingBoxError::Domain {
            reason: reason.into(),
        }
    }

    /// Create a Geometry error for an uncovered span position
    pub fn geometry(y: f64) -> Self {
        WingBoxError::Geometry { y }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        WingBoxError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        WingBoxError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        WingBoxError::Internal {
            message: message.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            WingBoxError::Domain { .. } => "DOMAIN_ERROR",
            WingBoxError::Integration { .. } => "INTEGRATION_ERROR",
            WingBoxError::Geometry { .. } => "GEOMETRY_ERROR",
            WingBoxError::InvalidInput { .. } => "INVALID_INPUT",
            WingBoxError::FileError { .. } => "FILE_ERROR",
            WingBoxError::SerializationError { .. } => "SERIALIZATION_ERROR",
            WingBoxError::VersionMismatch { .. } => "VERSION_MISMATCH",
            WingBoxError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for WingBoxError {
    fn from(err: serde_json::Error) -> Self {
        WingBoxError::SerializationError {
            reason: err.to_string(),
        }
    }
}
