//! Rate limiting for login endpoints.
//!
//! Uses a token bucket algorithm with per-IP tracking to slow down password guessing.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DefaultKeyedStateStore};
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tracing::{debug, warn};

use crate::auth::extract_client_ip;

/// Per-IP rate limiter.
pub type IpLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Default number of login attempts allowed in a burst.
pub const LOGIN_BURST: NonZeroU32 = NonZeroU32::new(10).unwrap();

/// Default time for one attempt to be replenished (10 per minute sustained).
pub const LOGIN_REPLENISH: Duration = Duration::from_secs(6);

/// Interval between pruning runs of the per-IP limiter map.
const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Rate limiting configuration for login endpoints.
#[derive(Clone)]
pub struct RateLimitConfig {
    /// Shared by `POST /api/auth` and `POST /api/admin/login`
    pub login: Arc<IpLimiter>,
    /// Key on `X-Forwarded-For` instead of the socket address
    pub trust_proxy: bool,
}

impl RateLimitConfig {
    pub fn new(trust_proxy: bool) -> Self {
        Self::with_quota(LOGIN_BURST.get(), LOGIN_REPLENISH, trust_proxy)
    }

    /// Build a limiter allowing `burst` attempts, replenishing one every `period`.
    /// A zero burst or period falls back to the defaults.
    pub fn with_quota(burst: u32, period: Duration, trust_proxy: bool) -> Self {
        let burst = NonZeroU32::new(burst).unwrap_or(LOGIN_BURST);
        let quota = Quota::with_period(period)
            .unwrap_or(Quota::per_minute(LOGIN_BURST))
            .allow_burst(burst);

        Self {
            login: Arc::new(RateLimiter::keyed(quota)),
            trust_proxy,
        }
    }
}

impl RateLimitConfig {
    /// Drop clients whose bucket has fully refilled. Returns the number still tracked.
    pub fn prune(&self) -> usize {
        self.login.retain_recent();
        self.login.shrink_to_fit();
        self.login.len()
    }
}

/// Spawn a background task that prunes the limiter periodically.
/// Returns a handle that can be used to abort the task.
pub fn spawn_limiter_cleanup(config: Arc<RateLimitConfig>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(LIMITER_CLEANUP_INTERVAL);

        loop {
            interval.tick().await;
            let tracked = config.prune();
            debug!(tracked, "Pruned login rate limiter");
        }
    })
}

/// Middleware for rate limiting login endpoints.
pub async fn rate_limit_login(
    State(config): State<Arc<RateLimitConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let ip = match extract_client_ip(&request, config.trust_proxy) {
        Ok(ip) => ip,
        Err(_) => {
            return (StatusCode::FORBIDDEN, "Unable to determine client IP.").into_response();
        }
    };

    match config.login.check_key(&ip) {
        Ok(_) => next.run(request).await,
        Err(_) => {
            warn!(ip = %ip, "Login rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts. Please wait before trying again.",
            )
                .into_response()
        }
    }
}
