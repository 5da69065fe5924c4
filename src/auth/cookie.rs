//! Cookie helpers for the admin UI session.

use axum::http::header;

use super::session::ADMIN_PATH;

/// Cookie name for the admin UI session token (8 hours).
pub const SESSION_COOKIE_NAME: &str = "admin_session";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let part = part.trim();
        if let Some((key, value)) = part.split_once('=') {
            if key.trim() == name {
                return Some(value.trim());
            }
        }
    }
    None
}

/// Build the Set-Cookie value that stores a session token, scoped to the admin UI.
pub fn session_cookie(token: &str, max_age: u64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path={}; Max-Age={}{}",
        SESSION_COOKIE_NAME, token, ADMIN_PATH, max_age, secure
    )
}

/// Build the Set-Cookie value that clears the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
