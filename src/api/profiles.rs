//! Doctors, staff and team APIs.
//!
//! One router per `ProfileKind`. Reads are public and only see active
//! profiles; writes require a bearer token.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use super::error::{ApiError, ResultExt, optional_text, require_text};
use super::{ItemResponse, ListQuery, SuccessResponse};
use crate::auth::{AdminAuth, MaybeAdmin, UNAUTHORIZED_MESSAGE};
use crate::db::{Database, ProfileInput, ProfileKind, ProfileStore};
use crate::impl_has_auth_settings;
use crate::settings::AuthSettings;

const MAX_NAME_LENGTH: usize = 120;
const MAX_TITLE_LENGTH: usize = 120;

/// State for one profile resource.
#[derive(Clone)]
pub struct ProfilesState {
    pub db: Database,
    pub auth: AuthSettings,
    pub kind: ProfileKind,
}

impl_has_auth_settings!(ProfilesState);

impl ProfilesState {
    fn store(&self) -> ProfileStore {
        self.db.profiles(self.kind)
    }

    fn not_found(&self) -> ApiError {
        ApiError::not_found(format!("{} not found", self.kind.label()))
    }
}

pub fn router(state: ProfilesState) -> Router {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/{id}",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .with_state(state)
}

#[derive(Deserialize)]
struct ProfileRequest {
    name: String,
    title: Option<String>,
    bio: Option<String>,
    image_url: Option<String>,
    position: Option<i64>,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

fn validate(payload: ProfileRequest) -> Result<ProfileInput, ApiError> {
    require_text(&payload.name, "Name", MAX_NAME_LENGTH)?;
    if let Some(title) = &payload.title {
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(ApiError::bad_request("Title is too long"));
        }
    }
    if payload.position.is_some_and(|p| p < 0) {
        return Err(ApiError::bad_request("Position must not be negative"));
    }

    Ok(ProfileInput {
        name: payload.name.trim().to_string(),
        title: optional_text(payload.title),
        bio: optional_text(payload.bio),
        image_url: optional_text(payload.image_url),
        position: payload.position,
        active: payload.active,
    })
}

async fn list_profiles(
    State(state): State<ProfilesState>,
    MaybeAdmin(admin): MaybeAdmin,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.include_hidden && admin.is_none() {
        return Err(ApiError::unauthorized(UNAUTHORIZED_MESSAGE));
    }

    let profiles = state
        .store()
        .list(query.include_hidden)
        .await
        .db_err("Failed to list profiles")?;

    Ok(Json(profiles))
}

async fn get_profile(
    State(state): State<ProfilesState>,
    MaybeAdmin(admin): MaybeAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = state
        .store()
        .get(id)
        .await
        .db_err("Failed to get profile")?
        .filter(|p| p.active || admin.is_some())
        .ok_or_else(|| state.not_found())?;

    Ok(Json(profile))
}

async fn create_profile(
    State(state): State<ProfilesState>,
    AdminAuth(claims): AdminAuth,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let input = validate(payload)?;
    let store = state.store();

    let id = store
        .create(&input)
        .await
        .db_err("Failed to create profile")?;

    let profile = store
        .get(id)
        .await
        .db_err("Failed to get created profile")?
        .ok_or_else(|| ApiError::internal("Created profile not found"))?;

    info!(kind = state.kind.table(), id, admin = %claims.sub, "Profile created");

    Ok((StatusCode::CREATED, Json(ItemResponse::ok(profile))))
}

async fn update_profile(
    State(state): State<ProfilesState>,
    AdminAuth(claims): AdminAuth,
    Path(id): Path<i64>,
    payload: Result<Json<ProfileRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let input = validate(payload)?;
    let store = state.store();

    if !store
        .update(id, &input)
        .await
        .db_err("Failed to update profile")?
    {
        return Err(state.not_found());
    }

    let profile = store
        .get(id)
        .await
        .db_err("Failed to get updated profile")?
        .ok_or_else(|| state.not_found())?;

    info!(kind = state.kind.table(), id, admin = %claims.sub, "Profile updated");

    Ok(Json(ItemResponse::ok(profile)))
}

async fn delete_profile(
    State(state): State<ProfilesState>,
    AdminAuth(claims): AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    if !state
        .store()
        .delete(id)
        .await
        .db_err("Failed to delete profile")?
    {
        return Err(state.not_found());
    }

    info!(kind = state.kind.table(), id, admin = %claims.sub, "Profile deleted");
    Ok(Json(SuccessResponse::ok()))
}
