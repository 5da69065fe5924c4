//! Authentication settings built once at startup.
//!
//! Everything here is immutable after construction and shared with request
//! handlers through `Arc`. Invalid settings are rejected by the constructors,
//! so the server cannot be started with a short signing key.

use std::sync::Arc;

use crate::jwt::JwtConfig;

/// Minimum length of the JWT signing secret, in bytes.
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// A fixed admin username/password pair.
#[derive(Clone)]
pub struct Credential {
    username: String,
    password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(ConfigError::MissingCredential("username"));
        }
        if password.is_empty() {
            return Err(ConfigError::MissingCredential("password"));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Exact match on both fields. No trimming, no case folding.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signing key and the two admin credential pairs.
#[derive(Clone)]
pub struct AuthSettings {
    jwt: Arc<JwtConfig>,
    /// Checked by `POST /api/auth` (bearer tokens)
    api_credential: Credential,
    /// Checked by `POST /api/admin/login` (UI session cookie)
    ui_credential: Credential,
}

impl AuthSettings {
    pub fn new(
        jwt_secret: &[u8],
        api_credential: Credential,
        ui_credential: Credential,
    ) -> Result<Self, ConfigError> {
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                length: jwt_secret.len(),
            });
        }
        Ok(Self {
            jwt: Arc::new(JwtConfig::new(jwt_secret)),
            api_credential,
            ui_credential,
        })
    }

    pub fn jwt(&self) -> &Arc<JwtConfig> {
        &self.jwt
    }

    pub fn api_credential(&self) -> &Credential {
        &self.api_credential
    }

    pub fn ui_credential(&self) -> &Credential {
        &self.ui_credential
    }
}

/// Fatal configuration errors. The process must not serve traffic with any of these.
#[derive(Debug)]
pub enum ConfigError {
    SecretTooShort { length: usize },
    MissingCredential(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::SecretTooShort { length } => write!(
                f,
                "JWT secret is {} characters, at least {} are required",
                length, MIN_JWT_SECRET_LENGTH
            ),
            ConfigError::MissingCredential(field) => {
                write!(f, "Admin {} must not be empty", field)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
