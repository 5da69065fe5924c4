use axum::{extract::Path, response::Response};

use super::embed::{AdminAssets, AdminPages};
use super::response::{serve_asset, serve_page};

/// Serve the admin shell. Client-side routes under `/admin` all get the same
/// page; the script picks the view from the URL.
pub async fn admin_handler() -> Response {
    serve_page::<AdminPages>("index.html")
}

/// Serve the login page (the session gate redirects signed-in users away).
pub async fn login_page_handler() -> Response {
    serve_page::<AdminPages>("login.html")
}

/// Serve admin scripts and styles.
pub async fn asset_handler(Path(path): Path<String>) -> Response {
    serve_asset::<AdminAssets>(&path)
}
