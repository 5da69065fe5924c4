//! Embedded admin UI shell.
//!
//! Pages live under `/admin` behind the session gate, so handlers here do no
//! auth checks of their own. Scripts and styles are served from
//! `/admin-assets`, outside the gated tree, because the login page needs
//! them before a session exists.

mod embed;
mod handlers;
mod response;

pub use handlers::{admin_handler, asset_handler, login_page_handler};

/// Public prefix for admin scripts and styles.
pub const ADMIN_ASSETS_PATH: &str = "/admin-assets";
