//! Image uploads.
//!
//! `POST /api/upload` (bearer token required) stores one image on disk under
//! a random name. Stored files are served publicly from `/uploads/{name}`.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use super::error::ApiError;
use crate::auth::AdminAuth;
use crate::impl_has_auth_settings;
use crate::settings::AuthSettings;

/// Largest accepted image.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Public URL prefix for stored files.
pub const UPLOADS_PATH: &str = "/uploads";

/// State for upload endpoints.
#[derive(Clone)]
pub struct UploadState {
    pub auth: AuthSettings,
    pub upload_dir: Arc<PathBuf>,
}

impl_has_auth_settings!(UploadState);

/// Router for `POST /api/upload`.
pub fn router(state: UploadState) -> Router {
    Router::new()
        .route("/", post(upload_image))
        // Multipart framing overhead on top of the image itself
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .with_state(state)
}

/// Router for `GET /uploads/{name}`.
pub fn files_router(state: UploadState) -> Router {
    Router::new()
        .route("/{name}", get(get_upload))
        .with_state(state)
}

/// Image formats we accept, identified by their leading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Detect the format from file contents. The client-declared content type is not trusted.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::Png)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::Gif)
        } else if data.len() >= 12 && &data[..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(ImageFormat::Webp)
        } else {
            None
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "jpg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// Parse a stored file name (`<uuid>.<ext>`). Anything else, including
/// path traversal attempts, is rejected.
pub fn parse_stored_name(name: &str) -> Option<ImageFormat> {
    let (stem, ext) = name.split_once('.')?;
    uuid::Uuid::parse_str(stem).ok()?;
    // Only the hyphenated lowercase form is ever written
    if stem.len() != 36 || stem.chars().any(|c| c.is_ascii_uppercase()) {
        return None;
    }
    ImageFormat::from_extension(ext)
}

#[derive(Serialize)]
struct UploadResponse {
    success: bool,
    url: String,
    filename: String,
}

/// Upload an image using multipart form data. Expects a single `file` field.
async fn upload_image(
    State(state): State<UploadState>,
    AdminAuth(claims): AdminAuth,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut data = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Invalid multipart data"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::payload_too_large("Image is too large")
            } else {
                ApiError::bad_request("Failed to read file data")
            }
        })?;
        data = Some(bytes);
    }

    let data = data.ok_or_else(|| ApiError::bad_request("Missing file field"))?;
    if data.is_empty() {
        return Err(ApiError::bad_request("File is empty"));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::payload_too_large("Image is too large"));
    }

    let format = ImageFormat::sniff(&data)
        .ok_or_else(|| ApiError::bad_request("Only JPEG, PNG, GIF and WebP images are allowed"))?;

    let filename = format!("{}.{}", uuid::Uuid::new_v4(), format.extension());

    tokio::fs::create_dir_all(state.upload_dir.as_path())
        .await
        .map_err(|e| ApiError::io_error("Failed to create upload directory", e))?;
    tokio::fs::write(state.upload_dir.join(&filename), &data)
        .await
        .map_err(|e| ApiError::io_error("Failed to store upload", e))?;

    info!(filename = %filename, size = data.len(), admin = %claims.sub, "Image uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            url: format!("{}/{}", UPLOADS_PATH, filename),
            filename,
        }),
    ))
}

/// Serve a stored upload.
async fn get_upload(
    State(state): State<UploadState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let format = parse_stored_name(&name).ok_or_else(|| ApiError::not_found("File not found"))?;

    let data = match tokio::fs::read(state.upload_dir.join(&name)).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found("File not found"));
        }
        Err(e) => return Err(ApiError::io_error("Failed to read upload", e)),
    };

    Ok((
        [
            (header::CONTENT_TYPE, format.mime()),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        data,
    ))
}
