//! Account sync: trades an identity token for the canonical account record.
//! The backend upserts, so calling it on every login is safe.

use crate::session::{
    errors::{AuthError, ErrorKind},
    gateway::IdentityToken,
    http::{build_client, build_url_with_base, sanitize_body, DEFAULT_TIMEOUT},
    profile::{AccountRecord, UserProfile},
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, error, instrument};

pub const SYNC_PATH: &str = "/account/sync";

/// Exchanges an identity token for a profile. No retries: the first failure is final.
#[async_trait]
pub trait AccountSync: Send + Sync {
    async fn sync(&self, token: IdentityToken) -> Result<UserProfile, AuthError>;
}

#[derive(Clone, Debug)]
pub struct TokenExchangeClient {
    client: Client,
    base_url: String,
}

impl TokenExchangeClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> reqwest::Result<Self> {
        Ok(Self::with_client(build_client(DEFAULT_TIMEOUT)?, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AccountSync for TokenExchangeClient {
    #[instrument(skip_all)]
    async fn sync(&self, token: IdentityToken) -> Result<UserProfile, AuthError> {
        let url = build_url_with_base(&self.base_url, SYNC_PATH);

        let response = self
            .client
            .post(&url)
            .bearer_auth(token.expose())
            .json(&json!({}))
            .send()
            .await
            .map_err(|err| {
                error!("account sync request failed: {err}");
                AuthError::from_kind(ErrorKind::Network)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("account sync returned {status}");
            return Err(AuthError::new(
                ErrorKind::Server,
                format!("Request failed ({}): {}", status.as_u16(), sanitize_body(&body)),
            ));
        }

        let record: AccountRecord = response.json().await.map_err(|err| {
            error!("account sync response could not be decoded: {err}");
            AuthError::new(ErrorKind::Server, "Failed to decode account record")
        })?;

        debug!(account_id = %record.id, role = %record.role, "account synced");

        Ok(UserProfile::from_record(record, token.into_secret()))
    }
}
