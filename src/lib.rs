pub mod api;
pub mod assets;
pub mod auth;
pub mod cli;
pub mod db;
pub mod jwt;
pub mod rate_limit;
pub mod settings;

use api::{UPLOADS_PATH, UploadState, create_api_router, uploads_router};
use assets::{ADMIN_ASSETS_PATH, admin_handler, asset_handler, login_page_handler};
use auth::{ADMIN_LOGIN_PATH, ADMIN_PATH, session_gate};
use axum::{Router, middleware, routing::get};
use db::Database;
use rate_limit::{RateLimitConfig, spawn_limiter_cleanup};
use settings::AuthSettings;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Signing key and admin credentials
    pub auth: AuthSettings,
    /// Directory where uploaded images are stored
    pub upload_dir: PathBuf,
    /// Whether to set Secure flag on cookies (should be true in production with HTTPS)
    pub secure_cookies: bool,
    /// Login rate limiter, shared by the API and UI login endpoints
    pub rate_limit: Arc<RateLimitConfig>,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let upload_dir = Arc::new(config.upload_dir.clone());

    let api_router = create_api_router(
        config.db.clone(),
        config.auth.clone(),
        upload_dir.clone(),
        config.secure_cookies,
        config.rate_limit.clone(),
    );

    let uploads = uploads_router(UploadState {
        auth: config.auth.clone(),
        upload_dir,
    });

    // Admin UI pages. The session gate below decides who may see them.
    let admin_routes = Router::new()
        .route(ADMIN_PATH, get(admin_handler))
        .route(&format!("{}/", ADMIN_PATH), get(admin_handler))
        .route(ADMIN_LOGIN_PATH, get(login_page_handler))
        .route(&format!("{}/{{*path}}", ADMIN_PATH), get(admin_handler))
        .route(
            &format!("{}/{{*path}}", ADMIN_ASSETS_PATH),
            get(asset_handler),
        );

    Router::new()
        .nest("/api", api_router)
        .nest(UPLOADS_PATH, uploads)
        .merge(admin_routes)
        .layer(middleware::from_fn_with_state(
            config.auth.clone(),
            session_gate,
        ))
}

/// Run the server on the given listener. This function blocks until the server exits.
/// Also starts the background task that prunes the login rate limiter.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    let cleanup = spawn_limiter_cleanup(config.rate_limit.clone());

    let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
    let result = axum::serve(listener, make_service).await;

    cleanup.abort();
    result
}
