#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    extract::ConnectInfo,
    http::{Request, Response, header},
};
use hcdental::{
    ServerConfig, create_app,
    db::Database,
    rate_limit::RateLimitConfig,
    settings::{AuthSettings, Credential},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"test-jwt-secret-that-is-long-enough";
pub const API_USERNAME: &str = "hainescitydental";
pub const API_PASSWORD: &str = "correct-horse-battery";
pub const UI_USERNAME: &str = "frontdesk";
pub const UI_PASSWORD: &str = "front-desk-password";

pub fn test_auth() -> AuthSettings {
    AuthSettings::new(
        TEST_SECRET,
        Credential::new(API_USERNAME, API_PASSWORD).unwrap(),
        Credential::new(UI_USERNAME, UI_PASSWORD).unwrap(),
    )
    .unwrap()
}

/// Fresh upload directory per test.
pub fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("hcdental-test-{}", uuid::Uuid::new_v4()))
}

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub auth: AuthSettings,
    pub upload_dir: PathBuf,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_rate_limit(RateLimitConfig::new(false)).await
    }

    pub async fn with_rate_limit(rate_limit: RateLimitConfig) -> Self {
        let db = Database::open(":memory:")
            .await
            .expect("Failed to open test database");
        let auth = test_auth();
        let upload_dir = temp_upload_dir();
        let config = ServerConfig {
            db: db.clone(),
            auth: auth.clone(),
            upload_dir: upload_dir.clone(),
            secure_cookies: false,
            rate_limit: Arc::new(rate_limit),
        };
        Self {
            app: create_app(&config),
            db,
            auth,
            upload_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Log in through `POST /api/auth` and return the bearer token.
    pub async fn login(&self) -> String {
        let response = self
            .send(auth_request(&format!(
                r#"{{"action":"login","username":"{}","password":"{}"}}"#,
                API_USERNAME, API_PASSWORD
            )))
            .await;
        assert_eq!(response.status(), 200);
        let json = body_json(response).await;
        json["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

/// Peer address that login requests appear to come from.
pub fn client_addr() -> SocketAddr {
    SocketAddr::from(([192, 0, 2, 10], 50000))
}

/// Attach the peer address the rate limiter keys on.
pub fn with_client_addr(mut request: Request<Body>) -> Request<Body> {
    request.extensions_mut().insert(ConnectInfo(client_addr()));
    request
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_json_request(method: &str, uri: &str, token: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_request(method: &str, uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// `POST /api/auth` with the given body, from the test client address.
pub fn auth_request(body: &str) -> Request<Body> {
    with_client_addr(json_request("POST", "/api/auth", body))
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
