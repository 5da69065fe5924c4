//! Axum extractors for the bearer-token request gate.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::debug;

use super::errors::GateRejection;
use super::state::HasAuthSettings;
use crate::jwt::{Claims, TokenType};

const BEARER_PREFIX: &str = "Bearer ";

/// Return the token after `Bearer ` in the Authorization header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

fn authenticate<S>(parts: &Parts, state: &S) -> Result<Claims, GateRejection>
where
    S: HasAuthSettings,
{
    let token = bearer_token(&parts.headers).ok_or(GateRejection::MissingToken)?;

    state
        .auth()
        .jwt()
        .verify_token(token, TokenType::Api)
        .ok_or(GateRejection::InvalidToken)
}

/// Extractor for routes that mutate content.
///
/// The wrapped handler only runs when the request carries a valid API
/// bearer token, and receives the decoded claims.
pub struct AdminAuth(pub Claims);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: HasAuthSettings + Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match authenticate(parts, state) {
            Ok(claims) => Ok(AdminAuth(claims)),
            Err(rejection) => {
                debug!(
                    method = %parts.method,
                    path = %parts.uri.path(),
                    reason = ?rejection,
                    "Request gate rejected"
                );
                Err(rejection)
            }
        }
    }
}

/// Optional authentication extractor - never fails.
/// Used by public read routes that show more to an authenticated admin.
pub struct MaybeAdmin(pub Option<Claims>);

impl<S> FromRequestParts<S> for MaybeAdmin
where
    S: HasAuthSettings + Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAdmin(authenticate(parts, state).ok()))
    }
}
