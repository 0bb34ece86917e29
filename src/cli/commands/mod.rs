pub mod backend;
pub mod logging;

use crate::session::ProviderId;
use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const CMD_LOGIN: &str = "login";
pub const CMD_POPUP: &str = "popup";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_PROVIDER: &str = "provider";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("wizcart")
        .about("WizCart storefront sign-in")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(login())
        .subcommand(popup());

    let command = backend::with_args(command);
    logging::with_args(command)
}

fn login() -> Command {
    // Missing values are left to the session's own validation.
    Command::new(CMD_LOGIN)
        .about("Sign in with email and password")
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long(ARG_EMAIL)
                .help("Account email")
                .env("WIZCART_EMAIL"),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .short('p')
                .long(ARG_PASSWORD)
                .help("Account password")
                .env("WIZCART_PASSWORD")
                .hide_env_values(true),
        )
}

fn popup() -> Command {
    Command::new(CMD_POPUP)
        .about("Sign in through a federated identity provider")
        .arg(
            Arg::new(ARG_PROVIDER)
                .long(ARG_PROVIDER)
                .help("Identity provider id")
                .env("WIZCART_PROVIDER")
                .default_value(ProviderId::GOOGLE),
        )
}
