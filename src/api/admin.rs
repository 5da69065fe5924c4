//! Admin UI session endpoints.
//!
//! These live under `/api/admin`, which the session gate never guards, so the
//! login page can always reach them.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::auth::{clear_session_cookie, issue_session, session_cookie};
use crate::rate_limit::{RateLimitConfig, rate_limit_login};
use crate::settings::AuthSettings;

/// State for admin session endpoints.
#[derive(Clone)]
pub struct AdminState {
    pub auth: AuthSettings,
    pub secure_cookies: bool,
}

pub fn router(state: AdminState, rate_limit: Arc<RateLimitConfig>) -> Router {
    let login = Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(rate_limit, rate_limit_login));

    Router::new()
        .merge(login)
        .route("/logout", post(logout))
        .with_state(state)
}

#[derive(Deserialize)]
struct LoginRequest {
    username: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct SessionResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

impl SessionResponse {
    fn ok() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn failed(message: &'static str) -> Self {
        Self {
            success: false,
            message: Some(message),
        }
    }
}

fn with_cookie(mut response: Response, cookie: &str) -> Response {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
            response
        }
        Err(e) => {
            error!(error = %e, "Invalid Set-Cookie value");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SessionResponse::failed("Failed to set session")),
            )
                .into_response()
        }
    }
}

async fn login(
    State(state): State<AdminState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let (username, password) = match payload {
        Ok(Json(req)) => (
            req.username.unwrap_or_default(),
            req.password.unwrap_or_default(),
        ),
        Err(_) => (String::new(), String::new()),
    };

    match issue_session(&state.auth, &username, &password) {
        Ok(issued) => with_cookie(
            Json(SessionResponse::ok()).into_response(),
            &session_cookie(&issued.token, issued.duration, state.secure_cookies),
        ),
        Err(e) => (e.status_code(), Json(SessionResponse::failed(e.message()))).into_response(),
    }
}

async fn logout(State(state): State<AdminState>) -> Response {
    with_cookie(
        Json(SessionResponse::ok()).into_response(),
        &clear_session_cookie(state.secure_cookies),
    )
}
