//! Admin authentication.
//!
//! Two gates share one signing key and one verifier:
//! - API routes: stateless bearer tokens (24 h) checked by the `AdminAuth`
//!   extractor before a mutating handler runs.
//! - Admin UI: a session token (8 h) in an HttpOnly cookie, checked by the
//!   `session_gate` middleware which redirects to the login page.
//!
//! There is no server-side session table and no revocation; a token stays
//! valid until it expires.

mod cookie;
mod errors;
mod extractors;
mod ip;
mod issuer;
mod session;
mod state;

pub use cookie::{SESSION_COOKIE_NAME, clear_session_cookie, get_cookie, session_cookie};
pub use errors::{AuthError, GateRejection, UNAUTHORIZED_MESSAGE};
pub use extractors::{AdminAuth, MaybeAdmin, bearer_token};
pub use ip::{FORWARDED_FOR_HEADER, extract_client_ip};
pub use issuer::{issue_session, issue_token};
pub use session::{
    ADMIN_API_PATH, ADMIN_LOGIN_PATH, ADMIN_PATH, GateDecision, decide, has_valid_session,
    is_under, session_gate,
};
pub use state::HasAuthSettings;
