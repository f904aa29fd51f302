//! HTTP error mapping for upload failures.
//!
//! Every rejection renders as a JSON [`ErrorResponse`] with a stable
//! machine-readable `code` alongside the human-readable message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use shelfmark::{KeyError, SizeError};
use thiserror::Error;

/// JSON body returned for a failed upload.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Upload failures.
///
/// Wraps the core size and key errors so they can carry HTTP semantics;
/// Rust's orphan rules keep us from implementing `IntoResponse` for the
/// core types directly.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Size(#[from] SizeError),

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error("Multipart body could not be read: {0}")]
    Multipart(String),

    #[error("No field named 'file' in the multipart body")]
    MissingFile,

    #[error("More than one 'file' field in the multipart body")]
    DuplicateFile,
}

impl UploadError {
    /// Machine-readable error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            UploadError::Size(err) => err.code(),
            UploadError::Key(err) => err.code(),
            UploadError::Multipart(_) => "multipart_invalid",
            UploadError::MissingFile => "missing_file",
            UploadError::DuplicateFile => "duplicate_file",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::Size(SizeError::TooLarge { .. }) => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Size(SizeError::TooSmall { .. })
            | UploadError::Key(_)
            | UploadError::Multipart(_)
            | UploadError::MissingFile
            | UploadError::DuplicateFile => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match &self {
            // Warn level, an unreadable body is suspicious rather than expected.
            UploadError::Multipart(reason) => {
                tracing::warn!(reason = %reason, "Rejecting unreadable multipart body");
            }
            _ => {
                tracing::debug!(error = %self, code = self.code(), "Rejecting upload");
            }
        }

        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string(), self.code()));
        (status, body).into_response()
    }
}
