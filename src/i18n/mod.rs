//! Translation surface. The session core only consumes resolved strings: the
//! route segments used for localized paths and the notification texts. How
//! bundles are fetched is up to the host; [`Catalog`] is an in-memory store the
//! host fills (or uses with the built-in defaults).
//!
//! Keys are the English source strings, and a missing key resolves to itself.

use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

pub const FALLBACK_LOCALE: &str = "en";
pub const SUPPORTED_LOCALES: [&str; 3] = ["en", "zh", "ms"];

/// Resolves human-readable strings for the current locale.
pub trait Translator: Send + Sync {
    fn locale(&self) -> &str;

    fn translate(&self, key: &str) -> String;
}

/// The supported locale a language tag names, if any. `zh-CN` is `zh`.
#[must_use]
pub fn supported_locale(requested: &str) -> Option<&'static str> {
    let primary = requested
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|locale| *locale == primary)
}

/// Maps a requested language tag onto a supported locale.
///
/// `zh-CN` becomes `zh`; anything unsupported falls back to `en`.
#[must_use]
pub fn negotiate_locale(requested: &str) -> &'static str {
    supported_locale(requested).unwrap_or(FALLBACK_LOCALE)
}

#[derive(Clone, Debug)]
pub struct Catalog {
    locale: String,
    bundles: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    /// Empty catalog for `locale`; every lookup resolves to its key.
    #[must_use]
    pub fn new(locale: &str) -> Self {
        Self {
            locale: negotiate_locale(locale).to_string(),
            bundles: HashMap::new(),
        }
    }

    /// Catalog preloaded with the storefront's login strings.
    #[must_use]
    pub fn with_defaults(locale: &str) -> Self {
        let mut catalog = Self::new(locale);
        for (bundle_locale, entries) in [("zh", ZH), ("ms", MS)] {
            catalog.extend(
                bundle_locale,
                entries
                    .iter()
                    .map(|(key, value)| ((*key).to_string(), (*value).to_string())),
            );
        }
        catalog
    }

    /// Adds or replaces entries of one locale bundle. Entries for an
    /// unsupported locale are dropped so they never land in the `en` fallback.
    /// Returns whether the entries were merged.
    pub fn extend<I>(&mut self, locale: &str, entries: I) -> bool
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let Some(bundle_locale) = supported_locale(locale) else {
            warn!(locale, "skipping bundle for unsupported locale");
            return false;
        };
        self.bundles
            .entry(bundle_locale.to_string())
            .or_default()
            .extend(entries);
        true
    }

    /// Merges a flat JSON object (`{"key": "text"}`) into a locale bundle.
    /// Non-string values are skipped. Returns whether the bundle was merged,
    /// as [`Catalog::extend`].
    ///
    /// # Errors
    /// Returns an error if `json` is not a JSON object.
    pub fn extend_from_json(&mut self, locale: &str, json: &str) -> Result<bool, serde_json::Error> {
        let entries: HashMap<String, Value> = serde_json::from_str(json)?;
        Ok(self.extend(
            locale,
            entries.into_iter().filter_map(|(key, value)| match value {
                Value::String(text) => Some((key, text)),
                _ => None,
            }),
        ))
    }

    fn lookup(&self, locale: &str, key: &str) -> Option<&str> {
        self.bundles
            .get(locale)
            .and_then(|bundle| bundle.get(key))
            .map(String::as_str)
    }
}

impl Translator for Catalog {
    fn locale(&self) -> &str {
        &self.locale
    }

    fn translate(&self, key: &str) -> String {
        self.lookup(&self.locale, key)
            .or_else(|| self.lookup(FALLBACK_LOCALE, key))
            .unwrap_or(key)
            .to_string()
    }
}

const ZH: &[(&str, &str)] = &[
    ("user", "用户"),
    ("history", "历史"),
    ("register", "注册"),
    ("Email and password is required", "需要电子邮件和密码"),
    ("Password must be at least 6 characters long", "密码长度至少为6个字符"),
    ("User is not registered", "用户未注册"),
    ("Sign-in popup was closed", "登录窗口已关闭"),
    ("A sign-in popup is already open", "登录窗口已打开"),
    ("Unable to reach the server", "无法连接服务器"),
    ("Unable to sync your account", "无法同步您的帐户"),
];

const MS: &[(&str, &str)] = &[
    ("user", "pengguna"),
    ("history", "sejarah"),
    ("register", "daftar"),
    ("Email and password is required", "E-mel dan kata laluan diperlukan"),
    (
        "Password must be at least 6 characters long",
        "Kata laluan mestilah sekurang-kurangnya 6 aksara",
    ),
    ("User is not registered", "Pengguna tidak berdaftar"),
    ("Sign-in popup was closed", "Tetingkap log masuk telah ditutup"),
    ("A sign-in popup is already open", "Tetingkap log masuk sudah dibuka"),
    ("Unable to reach the server", "Tidak dapat menghubungi pelayan"),
    ("Unable to sync your account", "Tidak dapat menyegerakkan akaun anda"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negotiate_locale_uses_primary_subtag() {
        assert_eq!(negotiate_locale("zh-CN"), "zh");
        assert_eq!(negotiate_locale("ms_MY"), "ms");
        assert_eq!(negotiate_locale(" EN "), "en");
        assert_eq!(negotiate_locale("fr"), "en");
        assert_eq!(negotiate_locale(""), "en");
        assert_eq!(supported_locale("fr"), None);
        assert_eq!(supported_locale("zh-TW"), Some("zh"));
    }

    #[test]
    fn missing_keys_resolve_to_themselves() {
        let catalog = Catalog::new("en");
        assert_eq!(catalog.translate("history"), "history");
    }

    #[test]
    fn defaults_cover_route_segments() {
        let catalog = Catalog::with_defaults("zh");
        assert_eq!(catalog.locale(), "zh");
        assert_eq!(catalog.translate("user"), "用户");
        assert_eq!(catalog.translate("history"), "历史");
    }

    #[test]
    fn falls_back_to_english_bundle() {
        let mut catalog = Catalog::new("ms");
        catalog.extend("en", [("Sign Up".to_string(), "Sign up now".to_string())]);
        assert_eq!(catalog.translate("Sign Up"), "Sign up now");
    }

    #[test]
    fn extend_from_json_skips_non_strings() {
        let mut catalog = Catalog::new("ms");
        catalog
            .extend_from_json("ms", r#"{"login": "log masuk", "count": 3}"#)
            .unwrap();
        assert_eq!(catalog.translate("login"), "log masuk");
        assert_eq!(catalog.translate("count"), "count");

        assert!(catalog.extend_from_json("ms", "[1, 2]").is_err());
    }

    #[test]
    fn unsupported_bundles_leave_fallback_alone() {
        let mut catalog = Catalog::with_defaults("fr");
        assert!(catalog.extend("en", [("user".to_string(), "customer".to_string())]));

        assert!(!catalog.extend("fr", [("user".to_string(), "utilisateur".to_string())]));
        assert!(!catalog
            .extend_from_json("de", r#"{"user": "Benutzer", "history": "Verlauf"}"#)
            .unwrap());

        assert_eq!(catalog.locale(), "en");
        assert_eq!(catalog.translate("user"), "customer");
        assert_eq!(catalog.translate("history"), "history");
    }
}
