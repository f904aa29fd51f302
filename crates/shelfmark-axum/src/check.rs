//! Policy checks for extracted uploads.

use shelfmark::{KeyGenerator, UploadPolicy};

use crate::error::UploadError;
use crate::extract::UploadedFile;

/// A policy-approved upload and the storage key it lands under.
#[derive(Debug, Clone)]
pub struct CheckedUpload {
    pub storage_key: String,
    pub content_type: String,
    pub size: u64,
}

/// Run the policy's size rules over `upload`, then compute its storage
/// key with `generator`. Nothing is written; the caller hands the
/// approved key to its storage backend.
pub fn check_upload<R, G>(
    policy: &UploadPolicy,
    generator: &G,
    record: &R,
    upload: &UploadedFile,
) -> Result<CheckedUpload, UploadError>
where
    R: ?Sized,
    G: KeyGenerator<R>,
{
    policy.validate_size(upload.size())?;
    let storage_key = generator.storage_key(record, &upload.filename)?;
    tracing::debug!(key = %storage_key, size = upload.size(), "Upload admitted");

    Ok(CheckedUpload {
        storage_key,
        content_type: upload.content_type.clone(),
        size: upload.size(),
    })
}
