use crate::{i18n::Translator, session::profile::UserProfile};
use std::sync::Arc;

pub const HOME_PATH: &str = "/";
pub const ADMIN_DASHBOARD_PATH: &str = "/admin/dashboard";
pub const FORGOT_PASSWORD_PATH: &str = "/forgot/password";

/// Navigation surface the host implements (router push, window location, ...).
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

/// Navigator that only records the destination in the logs.
#[derive(Clone, Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, destination: &str) {
        tracing::info!(destination, "navigate");
    }
}

/// Computes post-login destinations. Localized paths are built from
/// translated segments, each percent-encoded.
#[derive(Clone)]
pub struct RoleRouter {
    translator: Arc<dyn Translator>,
}

impl RoleRouter {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Admins go to the dashboard, everyone else to their order history.
    #[must_use]
    pub fn route(&self, profile: &UserProfile) -> String {
        if profile.is_admin() {
            ADMIN_DASHBOARD_PATH.to_string()
        } else {
            self.localized(&["user", "history"])
        }
    }

    #[must_use]
    pub fn registration_path(&self) -> String {
        self.localized(&["register"])
    }

    fn localized(&self, keys: &[&str]) -> String {
        keys.iter().fold(String::new(), |mut path, key| {
            path.push('/');
            path.push_str(&urlencoding::encode(&self.translator.translate(key)));
            path
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Catalog;
    use crate::session::profile::AccountRecord;
    use secrecy::SecretString;

    fn profile(role: &str) -> UserProfile {
        UserProfile::from_record(
            AccountRecord {
                id: "1".to_string(),
                name: "Ada".to_string(),
                email: "ada@wizcart.dev".to_string(),
                role: role.to_string(),
                picture: None,
            },
            SecretString::from("token".to_string()),
        )
    }

    #[test]
    fn admin_goes_to_dashboard() {
        let router = RoleRouter::new(Arc::new(Catalog::with_defaults("zh")));
        assert_eq!(router.route(&profile("admin")), "/admin/dashboard");
    }

    #[test]
    fn subscriber_goes_to_localized_history() {
        let router = RoleRouter::new(Arc::new(Catalog::with_defaults("en")));
        assert_eq!(router.route(&profile("subscriber")), "/user/history");

        let router = RoleRouter::new(Arc::new(Catalog::with_defaults("ms")));
        assert_eq!(router.route(&profile("subscriber")), "/pengguna/sejarah");
    }

    #[test]
    fn segments_are_percent_encoded() {
        let router = RoleRouter::new(Arc::new(Catalog::with_defaults("zh")));
        assert_eq!(
            router.route(&profile("subscriber")),
            "/%E7%94%A8%E6%88%B7/%E5%8E%86%E5%8F%B2"
        );

        let mut catalog = Catalog::new("en");
        catalog.extend("en", [("register".to_string(), "sign up/now".to_string())]);
        let router = RoleRouter::new(Arc::new(catalog));
        assert_eq!(router.registration_path(), "/sign%20up%2Fnow");
    }

    #[test]
    fn role_match_is_exact() {
        let router = RoleRouter::new(Arc::new(Catalog::new("en")));
        assert_eq!(router.route(&profile("Admin")), "/user/history");
    }
}
