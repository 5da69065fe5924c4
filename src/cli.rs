//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use crate::rate_limit::RateLimitConfig;
use crate::settings::{AuthSettings, ConfigError, Credential};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "hcdental",
    about = "Haines City Dental content API and admin UI"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value = "dental.db")]
    pub database: String,

    /// Directory for uploaded images
    #[arg(long, env = "UPLOAD_DIR", default_value = "uploads")]
    pub upload_dir: PathBuf,

    /// Path to file containing JWT secret. Prefer using JWT_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Admin username for the content API
    #[arg(long, env = "ADMIN_USERNAME")]
    pub admin_username: Option<String>,

    /// Admin password for the content API
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    pub admin_password: Option<String>,

    /// Admin UI username. Defaults to the API username
    #[arg(long, env = "ADMIN_UI_USERNAME")]
    pub admin_ui_username: Option<String>,

    /// Admin UI password. Defaults to the API password
    #[arg(long, env = "ADMIN_UI_PASSWORD", hide_env_values = true)]
    pub admin_ui_password: Option<String>,

    /// Set the Secure flag on the session cookie (enable when served over HTTPS)
    #[arg(long, env = "SECURE_COOKIES")]
    pub secure_cookies: bool,

    /// Rate limit logins by the first X-Forwarded-For entry (only behind a trusted proxy)
    #[arg(long, env = "TRUST_PROXY")]
    pub trust_proxy: bool,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load JWT secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
/// The length check happens in `AuthSettings::new`.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    if let Ok(secret) = std::env::var("JWT_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("JWT_SECRET") };
        Some(secret)
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content.trim().to_string()),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                None
            }
        }
    } else {
        error!(
            "JWT secret is required. Set JWT_SECRET environment variable (recommended) or use --jwt-secret-file"
        );
        None
    }
}

/// Build the API and UI credential pairs. The UI pair falls back field by
/// field to the API pair.
pub fn build_credentials(args: &Args) -> Result<(Credential, Credential), ConfigError> {
    let api_username = args.admin_username.clone().unwrap_or_default();
    let api_password = args.admin_password.clone().unwrap_or_default();

    let ui_username = args
        .admin_ui_username
        .clone()
        .unwrap_or_else(|| api_username.clone());
    let ui_password = args
        .admin_ui_password
        .clone()
        .unwrap_or_else(|| api_password.clone());

    Ok((
        Credential::new(api_username, api_password)?,
        Credential::new(ui_username, ui_password)?,
    ))
}

/// Validate the secret and credentials into `AuthSettings`.
pub fn build_auth_settings(args: &Args, jwt_secret: &str) -> Result<AuthSettings, ConfigError> {
    let (api_credential, ui_credential) = build_credentials(args)?;
    let settings = AuthSettings::new(jwt_secret.as_bytes(), api_credential, ui_credential)?;
    info!(
        api_user = %settings.api_credential().username(),
        ui_user = %settings.ui_credential().username(),
        "Admin credentials configured"
    );
    Ok(settings)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(args: &Args, db: Database, auth: AuthSettings) -> ServerConfig {
    ServerConfig {
        db,
        auth,
        upload_dir: args.upload_dir.clone(),
        secure_cookies: args.secure_cookies,
        rate_limit: Arc::new(RateLimitConfig::new(args.trust_proxy)),
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["hcdental"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_ui_credentials_fall_back_to_api() {
        let args = args(&["--admin-username", "admin", "--admin-password", "secret"]);
        let (api, ui) = build_credentials(&args).unwrap();
        assert!(api.matches("admin", "secret"));
        assert!(ui.matches("admin", "secret"));
    }

    #[test]
    fn test_ui_credentials_independent() {
        let args = args(&[
            "--admin-username",
            "admin",
            "--admin-password",
            "secret",
            "--admin-ui-username",
            "frontdesk",
            "--admin-ui-password",
            "other",
        ]);
        let (api, ui) = build_credentials(&args).unwrap();
        assert!(api.matches("admin", "secret"));
        assert!(!ui.matches("admin", "secret"));
        assert!(ui.matches("frontdesk", "other"));
    }

    #[test]
    fn test_short_secret_is_fatal() {
        let args = args(&["--admin-username", "admin", "--admin-password", "secret"]);
        assert!(matches!(
            build_auth_settings(&args, "too-short"),
            Err(ConfigError::SecretTooShort { length: 9 })
        ));
    }
}
