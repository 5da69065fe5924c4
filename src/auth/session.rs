//! Session gate for the admin UI.
//!
//! Browser navigations under `/admin` need a valid session cookie. Requests
//! without one are redirected to the login page, carrying the original
//! destination in `next`. This gate only ever redirects; API clients get
//! their 401s from the bearer-token extractors instead.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;
use url::form_urlencoded;

use super::cookie::{SESSION_COOKIE_NAME, get_cookie};
use crate::jwt::TokenType;
use crate::settings::AuthSettings;

/// Root of the admin UI tree.
pub const ADMIN_PATH: &str = "/admin";
/// Admin UI login page.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login";
/// Admin auth API. Always reachable, otherwise the cookie could never be set.
pub const ADMIN_API_PATH: &str = "/api/admin";

/// Outcome of the session gate for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Pass,
    Redirect(String),
}

/// True if `path` is `prefix` itself or lies below it.
pub fn is_under(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Decide what to do with a request given its path, query and session state.
pub fn decide(path: &str, query: Option<&str>, has_session: bool) -> GateDecision {
    if is_under(path, ADMIN_API_PATH) || !is_under(path, ADMIN_PATH) {
        return GateDecision::Pass;
    }

    if path == ADMIN_LOGIN_PATH {
        return if has_session {
            GateDecision::Redirect(ADMIN_PATH.to_string())
        } else {
            GateDecision::Pass
        };
    }

    if has_session {
        return GateDecision::Pass;
    }

    let destination = match query {
        Some(query) if !query.is_empty() => format!("{}?{}", path, query),
        _ => path.to_string(),
    };
    let next: String = form_urlencoded::byte_serialize(destination.as_bytes()).collect();
    GateDecision::Redirect(format!("{}?next={}", ADMIN_LOGIN_PATH, next))
}

/// Check the session cookie against the shared verifier.
pub fn has_valid_session(headers: &HeaderMap, auth: &AuthSettings) -> bool {
    get_cookie(headers, SESSION_COOKIE_NAME)
        .filter(|token| !token.is_empty())
        .and_then(|token| auth.jwt().verify_token(token, TokenType::Session))
        .is_some()
}

/// Middleware applied to the whole application router.
pub async fn session_gate(
    State(auth): State<AuthSettings>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();

    // Skip the cookie check entirely for paths the gate never guards.
    if is_under(path, ADMIN_API_PATH) || !is_under(path, ADMIN_PATH) {
        return next.run(request).await;
    }

    let has_session = has_valid_session(request.headers(), &auth);

    match decide(path, request.uri().query(), has_session) {
        GateDecision::Pass => next.run(request).await,
        GateDecision::Redirect(location) => {
            debug!(path = %path, location = %location, "Session gate redirect");
            Redirect::temporary(&location).into_response()
        }
    }
}
