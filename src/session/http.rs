//! Shared HTTP plumbing for the identity provider and account sync clients:
//! one client setup, one timeout policy, one way of turning error bodies into
//! user-facing text. Nothing here stores tokens; callers attach them per request.

use crate::APP_USER_AGENT;
use reqwest::Client;
use std::time::Duration;

/// Default request timeout applied to every outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

/// Builds the client used by the session collaborators.
///
/// # Errors
/// Returns an error if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(timeout)
        .build()
}

/// Joins a base URL and a path with exactly one slash between them.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

/// Trims and truncates an error body for display.
#[must_use]
pub fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_with_base_normalizes_slashes() {
        assert_eq!(
            build_url_with_base("https://api.wizcart.dev/", "/account/sync"),
            "https://api.wizcart.dev/account/sync"
        );
        assert_eq!(
            build_url_with_base(" https://api.wizcart.dev ", "account/sync"),
            "https://api.wizcart.dev/account/sync"
        );
        assert_eq!(build_url_with_base("", "/account/sync"), "/account/sync");
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  boom \n"), "boom");
        assert_eq!(sanitize_body(&"x".repeat(500)).chars().count(), 200);
    }
}
