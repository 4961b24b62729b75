//! Avatar upload endpoint.
//!
//! Accepts one JPEG or PNG in the `avatar` field of a multipart form and
//! stores it under a random name in the upload directory. Unauthenticated.

use anyhow::Context;
use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{info, warn};

pub const UPLOAD_FIELD: &str = "avatar";
pub const ALLOWED_MIME_TYPES: [&str; 2] = ["image/jpeg", "image/png"];

#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub filename: String,
    pub mimetype: String,
    pub size: usize,
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only JPG/PNG allowed")]
    UnsupportedType,
    #[error("File too large")]
    TooLarge,
    #[error("Too many files")]
    TooManyFiles,
    #[error("Unexpected field")]
    UnexpectedField,
    #[error("No file uploaded")]
    NoFile,
    #[error("Upload failed")]
    Failed(#[from] anyhow::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match &self {
            UploadError::Failed(cause) => warn!("Upload failed: {:#}", cause),
            other => warn!("Upload rejected: {}", other),
        }
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

struct StoredFile {
    path: PathBuf,
    filename: String,
    mimetype: String,
    size: usize,
}

/// Upload endpoint - POST /upload
pub async fn upload_avatar(
    State(settings): State<UploadSettings>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut multipart = multipart.map_err(|e| anyhow::anyhow!(e.body_text()))?;
    let mut stored: Option<StoredFile> = None;

    let outcome = receive(&settings, &mut multipart, &mut stored).await;
    if let Err(err) = outcome {
        if let Some(file) = stored.take() {
            let _ = fs::remove_file(&file.path).await;
        }
        return Err(err);
    }

    let file = stored.ok_or(UploadError::NoFile)?;
    info!(
        "📁 Stored upload {} ({}, {} bytes)",
        file.filename, file.mimetype, file.size
    );

    Ok(Json(UploadResponse {
        message: "File Uploaded Successfully",
        filename: file.filename,
        mimetype: file.mimetype,
        size: file.size,
    }))
}

async fn receive(
    settings: &UploadSettings,
    multipart: &mut Multipart,
    stored: &mut Option<StoredFile>,
) -> Result<(), UploadError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        // Plain text fields are ignored
        if field.file_name().is_none() {
            continue;
        }
        if field.name() != Some(UPLOAD_FIELD) {
            return Err(UploadError::UnexpectedField);
        }
        if stored.is_some() {
            return Err(UploadError::TooManyFiles);
        }

        let mimetype = field.content_type().unwrap_or_default().to_string();
        if !ALLOWED_MIME_TYPES.contains(&mimetype.as_str()) {
            return Err(UploadError::UnsupportedType);
        }

        let filename = random_filename(field.file_name().unwrap_or_default());
        let path = settings.dir.join(&filename);
        *stored = Some(StoredFile {
            path: path.clone(),
            filename,
            mimetype,
            size: 0,
        });

        let size = write_field(field, &path, settings.max_bytes).await?;
        if let Some(file) = stored.as_mut() {
            file.size = size;
        }
    }
    Ok(())
}

async fn write_field(
    mut field: Field<'_>,
    path: &Path,
    max_bytes: usize,
) -> Result<usize, UploadError> {
    let mut out = fs::File::create(path)
        .await
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut size = 0usize;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len();
        if size > max_bytes {
            return Err(UploadError::TooLarge);
        }
        out.write_all(&chunk).await.context("Failed to write upload")?;
    }
    out.flush().await.context("Failed to flush upload")?;

    Ok(size)
}

fn multipart_error(err: MultipartError) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge
    } else {
        UploadError::Failed(anyhow::anyhow!(err.body_text()))
    }
}

/// `<unix-millis>-<random>.<ext>`, keeping the lower-cased original extension
fn random_filename(original: &str) -> String {
    let ext = Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
        .unwrap_or_default();
    let random: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{}-{}{}", Utc::now().timestamp_millis(), random, ext)
}
