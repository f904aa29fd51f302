//! Upload round-trip tests against a minimal router.
//!
//! Run with: `cargo test -p shelfmark-axum --test upload_test`

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use serde_json::{json, Value};
use shelfmark::{FileNaming, KeyTemplate, UploadPolicy};
use shelfmark_axum::{check_upload, FileUpload, UploadError};

#[derive(Clone)]
struct AppState {
    policy: Arc<UploadPolicy>,
    template: KeyTemplate,
}

async fn upload(
    State(state): State<AppState>,
    FileUpload(file): FileUpload,
) -> Result<Json<Value>, UploadError> {
    let checked = check_upload(&state.policy, &state.template, &(), &file)?;
    Ok(Json(json!({
        "key": checked.storage_key,
        "content_type": checked.content_type,
        "size": checked.size,
    })))
}

fn test_server(policy: UploadPolicy) -> TestServer {
    let template = policy.template();
    let state = AppState {
        policy: Arc::new(policy),
        template,
    };
    let app = Router::new()
        .route("/uploads", post(upload))
        .with_state(state);
    TestServer::new(app).expect("test server")
}

fn pdf_part(data: &'static [u8], filename: &str) -> Part {
    Part::bytes(Bytes::from_static(data))
        .file_name(filename.to_string())
        .mime_type("application/pdf")
}

#[tokio::test]
async fn test_upload_lands_under_policy_prefix() {
    let server = test_server(UploadPolicy {
        prefix: "attachments/%Y".to_string(),
        ..Default::default()
    });

    let form = MultipartForm::new().add_part("file", pdf_part(b"hello", "Tést Report.PDF"));
    let response = server.post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let year = chrono::Utc::now().format("%Y").to_string();
    assert_eq!(body["key"], format!("attachments/{year}/test_report.pdf"));
    assert_eq!(body["content_type"], "application/pdf");
    assert_eq!(body["size"], 5);
}

#[tokio::test]
async fn test_upload_with_uuid_naming() {
    let server = test_server(UploadPolicy {
        prefix: "media".to_string(),
        naming: FileNaming::Uuid,
        ..Default::default()
    });

    let form = MultipartForm::new().add_part("file", pdf_part(b"hello", "report.PDF"));
    let response = server.post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let key = body["key"].as_str().expect("key");
    let name = key.strip_prefix("media/").expect("prefix");
    let stem = name.strip_suffix(".pdf").expect("extension");
    assert_eq!(stem.len(), 32);
    assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
}

#[tokio::test]
async fn test_missing_file_field_is_rejected() {
    let server = test_server(UploadPolicy::default());

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = server.post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "missing_file");
}

#[tokio::test]
async fn test_duplicate_file_fields_are_rejected() {
    let server = test_server(UploadPolicy::default());

    let form = MultipartForm::new()
        .add_part("file", pdf_part(b"one", "one.pdf"))
        .add_part("file", pdf_part(b"two", "two.pdf"));
    let response = server.post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "duplicate_file");
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let server = test_server(UploadPolicy {
        max_size: Some(16),
        ..Default::default()
    });

    let form = MultipartForm::new().add_part("file", pdf_part(&[0u8; 64], "big.pdf"));
    let response = server.post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 413);
    let body: Value = response.json();
    assert_eq!(body["code"], "max_file_size");
    let message = body["error"].as_str().expect("error message");
    assert!(message.contains("16 bytes"), "{message}");
    assert!(message.contains("64 bytes"), "{message}");
}

#[tokio::test]
async fn test_undersized_upload_is_rejected() {
    let server = test_server(UploadPolicy {
        min_size: Some(1),
        ..Default::default()
    });

    let form = MultipartForm::new().add_part("file", pdf_part(b"", "empty.pdf"));
    let response = server.post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "min_file_size");
    assert!(body["error"].as_str().expect("error").contains("0 bytes"));
}

#[tokio::test]
async fn test_invalid_filename_is_rejected() {
    let server = test_server(UploadPolicy::default());

    // Nothing survives normalization of this name.
    let form = MultipartForm::new().add_part("file", pdf_part(b"data", "日本語"));
    let response = server.post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    let body: Value = response.json();
    assert_eq!(body["code"], "invalid_filename");
}

#[tokio::test]
async fn test_part_without_filename_gets_default_name() {
    let server = test_server(UploadPolicy {
        prefix: "drop".to_string(),
        ..Default::default()
    });

    let part = Part::bytes(Bytes::from_static(b"raw"));
    let form = MultipartForm::new().add_part("file", part);
    let response = server.post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["key"], "drop/unknown");
    assert_eq!(body["content_type"], "application/octet-stream");
}
