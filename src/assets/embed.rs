use rust_embed::Embed;

/// Admin UI pages, served under `/admin` (session required except the login page)
#[derive(Embed)]
#[folder = "admin/pages/"]
pub struct AdminPages;

/// Scripts and styles shared by the admin pages (public)
#[derive(Embed)]
#[folder = "admin/assets/"]
pub struct AdminAssets;
