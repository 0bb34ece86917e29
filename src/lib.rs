//! # WizCart session client
//!
//! `wizcart-session` owns a storefront sign-in session. A visitor authenticates
//! with an email/password pair or through a federated identity popup, the
//! resulting identity token is exchanged for the canonical account record, and
//! the visitor is routed by role.
//!
//! ## Login Flow
//!
//! 1. **Validate:** credentials are checked locally (non-empty, password length).
//! 2. **Authenticate:** the identity provider turns them into an identity token.
//! 3. **Sync:** `POST /account/sync` upserts the account and returns the profile.
//! 4. **Route:** admins land on `/admin/dashboard`, everyone else on the
//!    localized `/{user}/{history}` page.
//!
//! Any failure moves the session to `Failed`, shows exactly one notification
//! and arms a recovery timer that returns the session to `Idle` after 6 s.
//!
//! Credentials and tokens are wrapped in `secrecy` types and must never be logged.

pub mod cli;
pub mod i18n;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
