//! Authentication state trait and macro.

use crate::settings::AuthSettings;

/// Trait for state types that give extractors access to the auth settings.
pub trait HasAuthSettings {
    fn auth(&self) -> &AuthSettings;
}

impl HasAuthSettings for AuthSettings {
    fn auth(&self) -> &AuthSettings {
        self
    }
}

/// Macro to implement `HasAuthSettings` for state structs with an
/// `auth: AuthSettings` field.
///
/// # Example
/// ```ignore
/// #[derive(Clone)]
/// pub struct NewsState {
///     pub db: Database,
///     pub auth: AuthSettings,
/// }
///
/// impl_has_auth_settings!(NewsState);
/// ```
#[macro_export]
macro_rules! impl_has_auth_settings {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthSettings for $state_type {
            fn auth(&self) -> &$crate::settings::AuthSettings {
                &self.auth
            }
        }
    };
}
