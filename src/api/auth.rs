//! Bearer-token login for the content API.
//!
//! `POST /api/auth` takes an action-tagged body:
//! - `{"action":"login","username":..,"password":..}` issues a 24 hour token
//! - `{"action":"verify","token":..}` reports whether a token is still valid

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::error::ApiError;
use crate::auth::{GateRejection, issue_token};
use crate::impl_has_auth_settings;
use crate::jwt::TokenType;
use crate::rate_limit::{RateLimitConfig, rate_limit_login};
use crate::settings::AuthSettings;

/// State for the token endpoint.
#[derive(Clone)]
pub struct AuthState {
    pub auth: AuthSettings,
}

impl_has_auth_settings!(AuthState);

pub fn router(state: AuthState, rate_limit: Arc<RateLimitConfig>) -> Router {
    Router::new()
        .route("/", post(handle_auth))
        .route_layer(middleware::from_fn_with_state(rate_limit, rate_limit_login))
        .with_state(state)
}

// --- Request/Response types ---

/// Unknown actions fail deserialization and are answered with 400.
#[derive(Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum AuthRequest {
    Login {
        username: Option<String>,
        password: Option<String>,
    },
    Verify {
        token: Option<String>,
    },
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    token: String,
    expires_at: u64,
}

#[derive(Serialize)]
struct VerifyResponse {
    success: bool,
    username: String,
}

// --- Handlers ---

async fn handle_auth(
    State(state): State<AuthState>,
    payload: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload.map_err(|_| ApiError::bad_request("Invalid request"))?;

    match payload {
        AuthRequest::Login { username, password } => {
            let username = username.unwrap_or_default();
            let password = password.unwrap_or_default();

            Ok(match issue_token(&state.auth, &username, &password) {
                Ok(issued) => Json(LoginResponse {
                    success: true,
                    token: issued.token,
                    expires_at: issued.expires_at,
                })
                .into_response(),
                Err(e) => e.into_response(),
            })
        }
        AuthRequest::Verify { token } => {
            let claims = token
                .as_deref()
                .and_then(|token| state.auth.jwt().verify_token(token, TokenType::Api));

            Ok(match claims {
                Some(claims) => Json(VerifyResponse {
                    success: true,
                    username: claims.sub,
                })
                .into_response(),
                None => GateRejection::InvalidToken.into_response(),
            })
        }
    }
}
