use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::Embed;

/// Cache duration for scripts and styles
pub const ASSET_CACHE: &str = "public, max-age=3600";
/// Cache duration for HTML files (no cache, always revalidate)
pub const NO_CACHE: &str = "no-cache";

/// Pages load only same-origin scripts, styles, images and API calls.
pub const ADMIN_CSP: &str = "default-src 'none'; script-src 'self'; style-src 'self'; \
     img-src 'self' data:; connect-src 'self'; form-action 'self'; \
     frame-ancestors 'none'; base-uri 'none'";

/// Get MIME type from file extension. Only supports types we actually serve.
#[inline]
pub fn mime_from_path(path: &str) -> &'static str {
    match path.rsplit('.').next() {
        Some("js") => "text/javascript",
        Some("css") => "text/css",
        Some("html") => "text/html; charset=utf-8",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Serve an embedded HTML page with the admin CSP
pub fn serve_page<T: Embed>(path: &str) -> Response {
    match T::get(path) {
        Some(content) => (
            [
                (header::CONTENT_TYPE, mime_from_path(path)),
                (header::CACHE_CONTROL, NO_CACHE),
                (header::CONTENT_SECURITY_POLICY, ADMIN_CSP),
                (header::X_FRAME_OPTIONS, "DENY"),
            ],
            content.data,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve a non-HTML asset from embedded files
#[inline]
pub fn serve_asset<T: Embed>(path: &str) -> Response {
    match T::get(path) {
        Some(content) => (
            [
                (header::CONTENT_TYPE, mime_from_path(path)),
                (header::CACHE_CONTROL, ASSET_CACHE),
            ],
            content.data,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
