//! Identity Toolkit REST backend for [`IdentityProvider`].
//!
//! Password sign-in posts to `accounts:signInWithPassword`. The federated
//! popup is a host concern: a [`PopupLauncher`] shows the provider's consent
//! screen and hands back the provider credential, which is then traded for an
//! identity token through `accounts:signInWithIdp`.

use crate::session::{
    gateway::{IdentityProvider, IdentityToken, ProviderFailure, ProviderId},
    http::{build_client, build_url_with_base, sanitize_body, DEFAULT_TIMEOUT},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error, instrument};
use url::form_urlencoded;

pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com";
const PASSWORD_PATH: &str = "/v1/accounts:signInWithPassword";
const IDP_PATH: &str = "/v1/accounts:signInWithIdp";
const DEFAULT_REQUEST_URI: &str = "http://localhost";

/// Provider error codes that mean "wrong email or password".
const REJECTION_CODES: [&str; 5] = [
    "EMAIL_NOT_FOUND",
    "INVALID_PASSWORD",
    "INVALID_LOGIN_CREDENTIALS",
    "INVALID_EMAIL",
    "USER_DISABLED",
];

/// Opens the federated sign-in window for a provider.
#[async_trait]
pub trait PopupLauncher: Send + Sync {
    /// Returns the provider's id token, or `None` when the visitor closed the window.
    async fn launch(&self, provider: &ProviderId) -> Result<Option<SecretString>, ProviderFailure>;
}

#[derive(Deserialize)]
struct SignInResponse {
    #[serde(rename = "idToken")]
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct IdentityToolkitProvider {
    client: Client,
    base_url: String,
    api_key: SecretString,
    request_uri: String,
    popup: Arc<dyn PopupLauncher>,
}

impl IdentityToolkitProvider {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
        popup: Arc<dyn PopupLauncher>,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            base_url: base_url.into(),
            api_key,
            request_uri: DEFAULT_REQUEST_URI.to_string(),
            popup,
        })
    }

    /// URI the provider credential was issued for (the page hosting the popup).
    #[must_use]
    pub fn with_request_uri(mut self, request_uri: impl Into<String>) -> Self {
        self.request_uri = request_uri.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    async fn sign_in(&self, path: &str, body: serde_json::Value) -> Result<IdentityToken, ProviderFailure> {
        let response = self
            .client
            .post(self.endpoint(path))
            .query(&[("key", self.api_key.expose_secret())])
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                error!("identity provider request failed: {err}");
                ProviderFailure::Unavailable("Unable to reach the identity provider".to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            let body: SignInResponse = response.json().await.map_err(|err| {
                error!("identity provider response could not be decoded: {err}");
                ProviderFailure::Unavailable("Invalid identity provider response".to_string())
            })?;
            return Ok(IdentityToken::new(body.id_token));
        }

        let text = response.text().await.unwrap_or_default();
        Err(classify_error(status, &text))
    }
}

/// Splits provider errors into credential rejections and everything else.
fn classify_error(status: StatusCode, body: &str) -> ProviderFailure {
    let code = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .ok();

    match code {
        Some(code)
            if status == StatusCode::BAD_REQUEST
                && REJECTION_CODES
                    .iter()
                    .any(|rejection| code.split(':').next().map(str::trim) == Some(*rejection)) =>
        {
            ProviderFailure::Rejected(code)
        }
        Some(code) => ProviderFailure::Unavailable(code),
        None => ProviderFailure::Unavailable(format!(
            "Request failed ({}): {}",
            status.as_u16(),
            sanitize_body(body)
        )),
    }
}

#[async_trait]
impl IdentityProvider for IdentityToolkitProvider {
    #[instrument(skip_all)]
    async fn password_sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<IdentityToken, ProviderFailure> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
            "returnSecureToken": true,
        });
        self.sign_in(PASSWORD_PATH, body).await
    }

    #[instrument(skip_all, fields(provider = %provider))]
    async fn popup_sign_in(&self, provider: &ProviderId) -> Result<IdentityToken, ProviderFailure> {
        let Some(credential) = self.popup.launch(provider).await? else {
            debug!("popup closed before completion");
            return Err(ProviderFailure::Dismissed);
        };

        let post_body = form_urlencoded::Serializer::new(String::new())
            .append_pair("id_token", credential.expose_secret())
            .append_pair("providerId", provider.as_str())
            .finish();

        let body = json!({
            "postBody": post_body,
            "requestUri": self.request_uri,
            "returnSecureToken": true,
        });
        self.sign_in(IDP_PATH, body).await
    }
}
