//! Unified error type for the chanstream application.
//!
//! All failures funnel into [`Error`], which carries enough context for the
//! HTTP layer to derive a status code via [`Error::http_status`]. The display
//! strings of the file-serving variants are the exact client-facing messages;
//! path details go to the logs at the failure site, never into response
//! bodies.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

/// Unified error type covering all failure modes in chanstream.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested entity could not be found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g. "channel").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },

    /// The requested file does not exist or its path does not canonicalize.
    #[error("File not found")]
    FileNotFound,

    /// The canonical path lies outside every allowed base directory.
    #[error("Access denied")]
    AccessDenied,

    /// The file exists but cannot be opened for reading.
    #[error("File not accessible")]
    FileNotAccessible,

    /// The file size could not be determined.
    #[error("Unable to determine file size")]
    SizeUnavailable,

    /// Request data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::FileNotFound => StatusCode::NOT_FOUND,
            Error::AccessDenied => StatusCode::FORBIDDEN,
            Error::FileNotAccessible => StatusCode::FORBIDDEN,
            Error::SizeUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the JSON error body.
    fn code(&self) -> &'static str {
        match self {
            Error::NotFound { .. } => "not_found",
            Error::FileNotFound => "file_not_found",
            Error::AccessDenied => "access_denied",
            Error::FileNotAccessible => "file_not_accessible",
            Error::SizeUnavailable => "size_unavailable",
            Error::Validation(_) => "validation_error",
            Error::Database { .. } => "database_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl fmt::Display) -> Self {
        Error::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.http_status();

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self,
                "Server error in API handler"
            );
        }

        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
