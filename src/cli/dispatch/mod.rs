//! Maps parsed arguments to the action the binary runs.

use crate::cli::{
    actions::{login, popup, Action},
    commands::{
        backend::{ARG_API_KEY, ARG_API_URL, ARG_IDENTITY_URL, ARG_LOCALE},
        ARG_EMAIL, ARG_PASSWORD, ARG_PROVIDER, CMD_LOGIN, CMD_POPUP,
    },
    globals::GlobalArgs,
};
use crate::session::ProviderId;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::new(
        required(matches, ARG_API_URL)?,
        required(matches, ARG_IDENTITY_URL)?,
        SecretString::from(required(matches, ARG_API_KEY)?),
    )
    .with_locale(
        matches
            .get_one::<String>(ARG_LOCALE)
            .map_or("en", String::as_str),
    );

    match matches.subcommand() {
        Some((CMD_LOGIN, sub_m)) => Ok(Action::Login(login::Args {
            globals,
            email: sub_m.get_one::<String>(ARG_EMAIL).cloned().unwrap_or_default(),
            password: SecretString::from(
                sub_m.get_one::<String>(ARG_PASSWORD).cloned().unwrap_or_default(),
            ),
        })),
        Some((CMD_POPUP, sub_m)) => Ok(Action::Popup(popup::Args {
            globals,
            provider: ProviderId::new(required(sub_m, ARG_PROVIDER)?),
        })),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    fn parse(args: &[&str]) -> clap::ArgMatches {
        temp_env::with_vars(
            [
                ("WIZCART_API_URL", None::<&str>),
                ("WIZCART_IDENTITY_URL", None),
                ("WIZCART_API_KEY", None),
                ("WIZCART_LOCALE", None),
                ("WIZCART_EMAIL", None),
                ("WIZCART_PASSWORD", None),
                ("WIZCART_PROVIDER", None),
            ],
            || commands::new().get_matches_from(args),
        )
    }

    #[test]
    fn test_login_action() {
        let matches = parse(&[
            "wizcart",
            "--api-url",
            "https://api.wizcart.dev",
            "--api-key",
            "key",
            "--locale",
            "zh-TW",
            "login",
            "-e",
            "ada@wizcart.dev",
            "-p",
            "hunter22",
        ]);

        let Action::Login(args) = handler(&matches).unwrap() else {
            panic!("expected login action");
        };
        assert_eq!(args.globals.api_url, "https://api.wizcart.dev");
        assert_eq!(args.globals.locale, "zh");
        assert_eq!(args.email, "ada@wizcart.dev");
        assert_eq!(args.password.expose_secret(), "hunter22");
    }

    #[test]
    fn test_login_without_credentials_defers_to_validation() {
        let matches = parse(&[
            "wizcart",
            "--api-url",
            "https://api.wizcart.dev",
            "--api-key",
            "key",
            "login",
        ]);

        let Action::Login(args) = handler(&matches).unwrap() else {
            panic!("expected login action");
        };
        assert!(args.email.is_empty());
        assert!(args.password.expose_secret().is_empty());
    }

    #[test]
    fn test_popup_action() {
        let matches = parse(&[
            "wizcart",
            "--api-url",
            "https://api.wizcart.dev",
            "--api-key",
            "key",
            "popup",
            "--provider",
            "github.com",
        ]);

        let Action::Popup(args) = handler(&matches).unwrap() else {
            panic!("expected popup action");
        };
        assert_eq!(args.provider.as_str(), "github.com");
        assert_eq!(args.globals.locale, "en");
    }
}
