//! Error types for aqua-core operations
//!
//! This module provides a structured error system with:
//! - Descriptive error messages
//! - Stable error codes for programmatic handling
//! - HTTP status code mapping for server integrations
//! - Error categories for grouping and filtering
//! - JSON serialization for API responses
//!
//! Most of the library is deliberately lenient: the validator reports
//! findings as data ([`crate::tree::TreeValidation`]) and the link resolver
//! reports outcomes as data ([`crate::resolve::LinkResolution`]). `AquaError`
//! is reserved for the strict API boundary: parsing untrusted input into an
//! [`crate::AquaTree`] and the `require_*` accessors.
//!
//! # Example
//!
//! ```rust
//! use aqua_core::error::{AquaError, ErrorCategory};
//!
//! fn handle_error(err: AquaError) {
//!     match err.category() {
//!         ErrorCategory::Validation => println!("Malformed tree"),
//!         ErrorCategory::NotFound => println!("Missing revision"),
//!         _ => println!("Other error"),
//!     }
//!
//!     // Get HTTP status for API response
//!     let status = err.http_status_code();
//!     let _ = status;
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for aqua-core operations
pub type Result<T> = std::result::Result<T, AquaError>;

/// Error category for grouping related errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Resource not found (404)
    NotFound,
    /// Input validation failed (400)
    Validation,
    /// Data integrity error (422)
    Integrity,
    /// Internal error (500)
    Internal,
    /// External input could not be decoded (502)
    External,
}

/// Errors that can occur in aqua-core operations
///
/// All errors include:
/// - A human-readable error message
/// - A stable error code for programmatic handling
/// - A category for grouping
/// - An HTTP status code for server integrations
#[derive(Error, Debug)]
pub enum AquaError {
    /// The input failed structural validation
    #[error("Invalid aqua tree: {reason}")]
    InvalidTree { reason: String },

    /// A revision hash was looked up but is not present in the tree
    #[error("Revision not found: '{hash}'")]
    RevisionNotFound { hash: String },

    /// No revision with an empty previous_verification_hash exists
    #[error("Aqua tree has no genesis revision")]
    MissingGenesis,

    /// A link target could not be resolved in any available tree
    #[error("Linked revision '{hash}' cannot be resolved in any available tree")]
    UnresolvedLink { hash: String },

    /// JSON serialization or deserialization failed
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Internal error that shouldn't happen
    #[error("Internal error: {reason}. This is a bug; please report it.")]
    InternalError { reason: String },
}

impl AquaError {
    /// Returns the error category for grouping
    pub fn category(&self) -> ErrorCategory {
        match self {
            AquaError::InvalidTree { .. } => ErrorCategory::Validation,

            AquaError::RevisionNotFound { .. } | AquaError::MissingGenesis => {
                ErrorCategory::NotFound
            }

            AquaError::UnresolvedLink { .. } => ErrorCategory::Integrity,

            AquaError::InternalError { .. } => ErrorCategory::Internal,

            AquaError::JsonError(_) => ErrorCategory::External,
        }
    }

    /// Returns the stable error code for this error
    ///
    /// Error codes are uppercase, underscore-separated identifiers that
    /// remain stable across versions. Use these for client-side error
    /// handling, logging and alerting.
    pub fn error_code(&self) -> &'static str {
        match self {
            AquaError::InvalidTree { .. } => "INVALID_TREE",
            AquaError::RevisionNotFound { .. } => "REVISION_NOT_FOUND",
            AquaError::MissingGenesis => "MISSING_GENESIS",
            AquaError::UnresolvedLink { .. } => "UNRESOLVED_LINK",
            AquaError::JsonError(_) => "JSON_ERROR",
            AquaError::InternalError { .. } => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error
    ///
    /// Use this when building HTTP API responses around the library. Maps
    /// errors to appropriate status codes following REST conventions.
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client sent invalid data
            AquaError::InvalidTree { .. } => 400,

            // 404 Not Found - Resource doesn't exist
            AquaError::RevisionNotFound { .. } | AquaError::MissingGenesis => 404,

            // 422 Unprocessable Entity - Semantic error
            AquaError::UnresolvedLink { .. } => 422,

            // 500 Internal Server Error - Our fault
            AquaError::InternalError { .. } => 500,

            // 502 Bad Gateway - External input failed to decode
            AquaError::JsonError(_) => 502,
        }
    }

    /// Returns true if this error is a client error (4xx equivalent)
    pub fn is_client_error(&self) -> bool {
        matches!(self.http_status_code(), 400..=499)
    }

    /// Returns true if this error is a server error (5xx equivalent)
    pub fn is_server_error(&self) -> bool {
        matches!(self.http_status_code(), 500..=599)
    }

    /// Converts this error to a JSON-serializable response object
    ///
    /// Returns a structure suitable for API error responses:
    /// ```json
    /// {
    ///   "error": {
    ///     "code": "INVALID_TREE",
    ///     "message": "Invalid aqua tree: ...",
    ///     "category": "validation"
    ///   }
    /// }
    /// ```
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.to_string(),
                category: self.category(),
            },
        }
    }
}

/// JSON-serializable error response for APIs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail for JSON responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Stable error code (e.g., "INVALID_TREE")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Error category
    pub category: ErrorCategory,
}
