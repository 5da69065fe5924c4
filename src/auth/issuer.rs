//! Token issuance after a credential check.

use tracing::{error, info, warn};

use super::errors::AuthError;
use crate::jwt::{IssuedToken, TokenType};
use crate::settings::{AuthSettings, Credential};

/// Validate the API credential pair and mint a 24 hour bearer token.
pub fn issue_token(
    auth: &AuthSettings,
    username: &str,
    password: &str,
) -> Result<IssuedToken, AuthError> {
    issue(auth, auth.api_credential(), username, password, TokenType::Api)
}

/// Validate the UI credential pair and mint an 8 hour session token for the cookie.
pub fn issue_session(
    auth: &AuthSettings,
    username: &str,
    password: &str,
) -> Result<IssuedToken, AuthError> {
    issue(auth, auth.ui_credential(), username, password, TokenType::Session)
}

fn issue(
    auth: &AuthSettings,
    credential: &Credential,
    username: &str,
    password: &str,
    token_type: TokenType,
) -> Result<IssuedToken, AuthError> {
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::Validation);
    }

    if !credential.matches(username, password) {
        warn!(username = %username, kind = ?token_type, "Failed admin login");
        return Err(AuthError::InvalidCredentials);
    }

    let issued = auth
        .jwt()
        .generate_token(credential.username(), token_type)
        .map_err(|e| {
            error!(error = %e, "Failed to generate token");
            AuthError::Internal
        })?;

    info!(username = %username, kind = ?token_type, "Admin logged in");
    Ok(issued)
}
