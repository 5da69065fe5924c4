//! JWT token generation and validation.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Token type for distinguishing API bearer tokens from admin UI sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Bearer token for the content API (24 hours)
    Api,
    /// Admin UI session carried in a cookie (8 hours)
    Session,
}

impl TokenType {
    pub fn duration_secs(self) -> u64 {
        match self {
            TokenType::Api => API_TOKEN_DURATION_SECS,
            TokenType::Session => SESSION_TOKEN_DURATION_SECS,
        }
    }
}

/// JWT claims. The only identity carried is the admin username.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin username)
    pub sub: String,
    /// Token type
    #[serde(rename = "typ")]
    pub token_type: TokenType,
    /// Issued at (Unix timestamp)
    pub iat: u64,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
}

impl Claims {
    pub fn username(&self) -> &str {
        &self.sub
    }
}

/// API token duration: 24 hours
pub const API_TOKEN_DURATION_SECS: u64 = 24 * 60 * 60;

/// Session token duration: 8 hours
pub const SESSION_TOKEN_DURATION_SECS: u64 = 8 * 60 * 60;

/// Configuration for JWT operations.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

/// Result of generating a token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The JWT token string
    pub token: String,
    /// Expiration timestamp (Unix seconds)
    pub expires_at: u64,
    /// Token duration in seconds
    pub duration: u64,
}

impl JwtConfig {
    /// Create a new JWT configuration with the given secret.
    /// Length requirements are enforced by `AuthSettings`.
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Generate a signed token for the given username.
    pub fn generate_token(
        &self,
        username: &str,
        token_type: TokenType,
    ) -> Result<IssuedToken, JwtError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| JwtError::TimeError)?
            .as_secs();

        let duration = token_type.duration_secs();
        let exp = now + duration;

        let claims = Claims {
            sub: username.to_string(),
            token_type,
            iat: now,
            exp,
        };

        let token = jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(JwtError::Encoding)?;

        Ok(IssuedToken {
            token,
            expires_at: exp,
            duration,
        })
    }

    /// Validate and decode a token, reporting why it was rejected.
    pub fn validate_token(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let token_data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(JwtError::Decoding)?;

        if token_data.claims.token_type != expected {
            return Err(JwtError::WrongTokenType);
        }

        Ok(token_data.claims)
    }

    /// Verify a token. Every failure collapses to `None` so callers cannot
    /// tell a bad signature from an expired or malformed token.
    pub fn verify_token(&self, token: &str, expected: TokenType) -> Option<Claims> {
        match self.validate_token(token, expected) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "Token rejected");
                None
            }
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug)]
pub enum JwtError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// Error decoding the token
    Decoding(jsonwebtoken::errors::Error),
    /// System time error
    TimeError,
    /// Wrong token type (e.g., a session cookie presented as a bearer token)
    WrongTokenType,
}

impl std::fmt::Display for JwtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JwtError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            JwtError::Decoding(e) => write!(f, "Failed to decode token: {}", e),
            JwtError::TimeError => write!(f, "System time error"),
            JwtError::WrongTokenType => write!(f, "Wrong token type"),
        }
    }
}

impl std::error::Error for JwtError {}
