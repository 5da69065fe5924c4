//! Client IP extraction for per-IP rate limiting.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request};

/// Header consulted when the server runs behind a reverse proxy.
pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Extract the client IP address.
///
/// With `trust_proxy` the first address in `X-Forwarded-For` is used and a
/// missing header is an error (no fallback to the socket address, which would
/// be the proxy itself). Otherwise the peer address from `ConnectInfo` is used.
pub fn extract_client_ip(request: &Request, trust_proxy: bool) -> Result<String, &'static str> {
    if trust_proxy {
        let value = request
            .headers()
            .get(FORWARDED_FOR_HEADER)
            .ok_or("Forwarded header not present")?
            .to_str()
            .map_err(|_| "Forwarded header contains invalid characters")?;
        return value
            .split(',')
            .next()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string)
            .ok_or("Forwarded header is empty");
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ci| ci.0.ip().to_string())
        .ok_or("No client IP available")
}
