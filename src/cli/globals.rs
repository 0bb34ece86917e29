use crate::i18n::negotiate_locale;
use secrecy::SecretString;

/// Backend settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub identity_url: String,
    pub api_key: SecretString,
    pub locale: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, identity_url: String, api_key: SecretString) -> Self {
        Self {
            api_url,
            identity_url,
            api_key,
            locale: "en".to_string(),
        }
    }

    /// Unsupported locales fall back to English.
    #[must_use]
    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locale = negotiate_locale(locale).to_string();
        self
    }
}
