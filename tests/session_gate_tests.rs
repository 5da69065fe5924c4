mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::{
    TestApp, UI_PASSWORD, UI_USERNAME, body_bytes, body_json, get, json_request, with_client_addr,
};
use hcdental::jwt::TokenType;

fn location(response: &axum::http::Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

/// Log in through the UI endpoint and return the `name=value` cookie pair.
async fn ui_login(app: &TestApp) -> String {
    let response = app
        .send(with_client_addr(json_request(
            "POST",
            "/api/admin/login",
            &format!(
                r#"{{"username":"{}","password":"{}"}}"#,
                UI_USERNAME, UI_PASSWORD
            ),
        )))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Strict"));
    assert!(set_cookie.contains("Path=/admin"));
    assert!(set_cookie.contains("Max-Age=28800"));
    assert!(!set_cookie.contains("Secure"));

    let json = body_json(response).await;
    assert_eq!(json["success"], true);

    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_admin_without_session_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.send(get("/admin/anything")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        "/admin/login?next=%2Fadmin%2Fanything"
    );

    let response = app.send(get("/admin")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/admin/login?next=%2Fadmin");
}

#[tokio::test]
async fn test_redirect_keeps_query() {
    let app = TestApp::new().await;

    let response = app.send(get("/admin/news?page=2")).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        location(&response),
        "/admin/login?next=%2Fadmin%2Fnews%3Fpage%3D2"
    );
}

#[tokio::test]
async fn test_login_page_is_public() {
    let app = TestApp::new().await;

    let response = app.send(get("/admin/login")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::CONTENT_SECURITY_POLICY)
            .is_some()
    );
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("login-form"));
}

#[tokio::test]
async fn test_admin_assets_are_public() {
    let app = TestApp::new().await;

    let response = app.send(get("/admin-assets/login.js")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/javascript"
    );

    let response = app.send(get("/admin-assets/missing.js")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_admin_paths_pass_through() {
    let app = TestApp::new().await;

    // Public API is never redirected
    let response = app.send(get("/api/news")).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Lookalike prefix is not under /admin
    let response = app.send(get("/administrator")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_api_always_passes() {
    let app = TestApp::new().await;

    // Wrong credentials reach the handler and get a 401 rather than a redirect
    let response = app
        .send(with_client_addr(json_request(
            "POST",
            "/api/admin/login",
            r#"{"username":"frontdesk","password":"wrong"}"#,
        )))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Invalid username or password");

    let response = app
        .send(with_client_addr(json_request(
            "POST",
            "/api/admin/login",
            r#"{"username":"frontdesk"}"#,
        )))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_cookie_grants_access() {
    let app = TestApp::new().await;
    let cookie = ui_login(&app).await;

    let response = app.send(get_with_cookie("/admin/news", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.contains("/admin-assets/admin.js"));

    let response = app.send(get_with_cookie("/admin", &cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_page_with_session_redirects_home() {
    let app = TestApp::new().await;
    let cookie = ui_login(&app).await;

    let response = app.send(get_with_cookie("/admin/login", &cookie)).await;
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn test_invalid_cookies_redirect() {
    let app = TestApp::new().await;
    let api_token = app
        .auth
        .jwt()
        .generate_token(UI_USERNAME, TokenType::Api)
        .unwrap();

    for cookie in [
        "admin_session=".to_string(),
        "admin_session=true".to_string(),
        "admin_session=garbage.token.value".to_string(),
        // API bearer tokens are not sessions
        format!("admin_session={}", api_token.token),
        "other=1".to_string(),
    ] {
        let response = app.send(get_with_cookie("/admin/news", &cookie)).await;
        assert_eq!(
            response.status(),
            StatusCode::TEMPORARY_REDIRECT,
            "cookie: {}",
            cookie
        );
    }
}

#[tokio::test]
async fn test_api_credentials_do_not_open_ui_when_pairs_differ() {
    let app = TestApp::new().await;

    let response = app
        .send(with_client_addr(json_request(
            "POST",
            "/api/admin/login",
            &format!(
                r#"{{"username":"{}","password":"{}"}}"#,
                common::API_USERNAME,
                common::API_PASSWORD
            ),
        )))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new().await;

    let response = app
        .send(json_request("POST", "/api/admin/logout", ""))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with("admin_session=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}
