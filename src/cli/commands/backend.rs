use crate::session::identity_toolkit::DEFAULT_IDENTITY_URL;
use clap::{Arg, Command};

pub const ARG_API_URL: &str = "api-url";
pub const ARG_IDENTITY_URL: &str = "identity-url";
pub const ARG_API_KEY: &str = "api-key";
pub const ARG_LOCALE: &str = "locale";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Storefront backend base URL, example: https://api.wizcart.dev")
                .env("WIZCART_API_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDENTITY_URL)
                .long(ARG_IDENTITY_URL)
                .help("Identity provider base URL")
                .env("WIZCART_IDENTITY_URL")
                .default_value(DEFAULT_IDENTITY_URL),
        )
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("Identity provider web API key")
                .env("WIZCART_API_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_LOCALE)
                .short('l')
                .long(ARG_LOCALE)
                .help("Locale for messages and localized paths (en, zh, ms)")
                .env("WIZCART_LOCALE")
                .default_value("en"),
        )
}
