mod admin;
mod auth;
mod error;
mod news;
mod profiles;
mod upload;

use axum::Router;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

use crate::db::{Database, ProfileKind};
use crate::rate_limit::RateLimitConfig;
use crate::settings::AuthSettings;

pub use error::ApiError;
pub use news::slugify;
pub use upload::{
    ImageFormat, MAX_UPLOAD_BYTES, UPLOADS_PATH, UploadState, files_router as uploads_router,
    parse_stored_name,
};

/// Query string shared by the list endpoints.
#[derive(Deserialize, Default)]
pub struct ListQuery {
    /// Also return unpublished/inactive records. Requires a bearer token.
    #[serde(default)]
    pub include_hidden: bool,
}

#[derive(Serialize)]
pub struct SuccessResponse {
    success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `{"success": true, ...item fields}`
#[derive(Serialize)]
pub struct ItemResponse<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    item: T,
}

impl<T: Serialize> ItemResponse<T> {
    pub fn ok(item: T) -> Self {
        Self {
            success: true,
            item,
        }
    }
}

/// Create the API router.
pub fn create_api_router(
    db: Database,
    auth: AuthSettings,
    upload_dir: Arc<PathBuf>,
    secure_cookies: bool,
    rate_limit: Arc<RateLimitConfig>,
) -> Router {
    let auth_state = auth::AuthState { auth: auth.clone() };

    let admin_state = admin::AdminState {
        auth: auth.clone(),
        secure_cookies,
    };

    let news_state = news::NewsState {
        db: db.clone(),
        auth: auth.clone(),
    };

    let profiles_state = |kind| profiles::ProfilesState {
        db: db.clone(),
        auth: auth.clone(),
        kind,
    };

    let upload_state = upload::UploadState {
        auth: auth.clone(),
        upload_dir,
    };

    Router::new()
        .nest("/auth", auth::router(auth_state, rate_limit.clone()))
        .nest("/admin", admin::router(admin_state, rate_limit))
        .nest("/news", news::router(news_state))
        .nest(
            "/doctors",
            profiles::router(profiles_state(ProfileKind::Doctors)),
        )
        .nest("/staff", profiles::router(profiles_state(ProfileKind::Staff)))
        .nest("/team", profiles::router(profiles_state(ProfileKind::Team)))
        .nest("/upload", upload::router(upload_state))
}
