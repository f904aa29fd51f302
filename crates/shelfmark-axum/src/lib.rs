//! Axum integration for shelfmark.
//!
//! [`FileUpload`] extracts the single `file` field of a multipart
//! request, [`check_upload`] applies a [`shelfmark::UploadPolicy`]'s
//! size rules and computes the storage key, and every failure renders
//! as a JSON error body with a stable machine-readable code.

pub mod check;
pub mod error;
pub mod extract;

// Re-export commonly used types
pub use check::{check_upload, CheckedUpload};
pub use error::{ErrorResponse, UploadError};
pub use extract::{extract_upload, FileUpload, UploadedFile};
