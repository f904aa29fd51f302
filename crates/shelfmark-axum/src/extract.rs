//! Multipart upload extraction.

use axum::extract::{FromRequest, Multipart, Request};
use bytes::Bytes;
use shelfmark::FileSize;

use crate::error::UploadError;

/// One file pulled out of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    /// Client-supplied file name, `"unknown"` when the part had none.
    pub filename: String,
    /// Client-supplied content type, `"application/octet-stream"` when
    /// the part had none.
    pub content_type: String,
}

impl UploadedFile {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

impl FileSize for UploadedFile {
    fn file_size(&self) -> u64 {
        self.size()
    }
}

/// Extract the file from a multipart form.
/// Only one field named "file" is accepted; multiple file fields are
/// rejected and other fields are ignored.
pub async fn extract_upload(mut multipart: Multipart) -> Result<UploadedFile, UploadError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if upload.is_some() {
            return Err(UploadError::DuplicateFile);
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;

        upload = Some(UploadedFile {
            data,
            filename,
            content_type,
        });
    }

    let upload = upload.ok_or(UploadError::MissingFile)?;
    tracing::debug!(
        filename = %upload.filename,
        size = upload.size(),
        "Extracted multipart upload"
    );
    Ok(upload)
}

/// Extractor form of [`extract_upload`], for use as a handler argument.
#[derive(Debug)]
pub struct FileUpload(pub UploadedFile);

impl<S> FromRequest<S> for FileUpload
where
    S: Send + Sync,
{
    type Rejection = UploadError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| UploadError::Multipart(e.to_string()))?;
        Ok(FileUpload(extract_upload(multipart).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_file_size() {
        let upload = UploadedFile {
            data: Bytes::from_static(b"hello"),
            filename: "hello.txt".to_string(),
            content_type: "text/plain".to_string(),
        };
        assert_eq!(upload.size(), 5);
        assert_eq!(upload.file_size(), 5);
    }
}
