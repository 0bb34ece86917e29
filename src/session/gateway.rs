//! Sign-in through the external identity provider. The provider itself is a
//! collaborator behind [`IdentityProvider`]; [`AuthGateway`] maps its failures
//! onto the session taxonomy and enforces the single-popup rule.

use crate::session::{
    credentials::ValidCredentials,
    errors::{AuthError, ErrorKind},
};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use thiserror::Error;
use tracing::{debug, instrument, warn};

/// Federated identity provider identifier, e.g. `google.com`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ProviderId(String);

impl ProviderId {
    pub const GOOGLE: &'static str = "google.com";

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn google() -> Self {
        Self::new(Self::GOOGLE)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Identity token issued by the provider. Consumed once by the account sync.
#[derive(Debug)]
pub struct IdentityToken {
    raw: SecretString,
    claims: Value,
}

impl IdentityToken {
    /// Wraps a raw token; JWT payload claims are decoded when present.
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let claims = decode_claims(&raw).unwrap_or_else(|| Value::Object(Map::new()));
        Self {
            raw: SecretString::from(raw),
            claims,
        }
    }

    #[must_use]
    pub fn claims(&self) -> &Value {
        &self.claims
    }

    #[must_use]
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.raw.expose_secret()
    }

    #[must_use]
    pub fn into_secret(self) -> SecretString {
        self.raw
    }
}

fn decode_claims(raw: &str) -> Option<Value> {
    let mut segments = raw.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    match serde_json::from_slice(&bytes).ok()? {
        Value::Object(map) => Some(Value::Object(map)),
        _ => None,
    }
}

/// Raw outcome reported by a provider before it is mapped to an `AuthError`.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// The provider refused the credentials.
    #[error("credentials rejected: {0}")]
    Rejected(String),
    /// The visitor closed the popup before finishing.
    #[error("popup dismissed")]
    Dismissed,
    #[error("{0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn password_sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<IdentityToken, ProviderFailure>;

    async fn popup_sign_in(&self, provider: &ProviderId) -> Result<IdentityToken, ProviderFailure>;
}

/// Wraps an identity provider for one session.
pub struct AuthGateway {
    provider: Arc<dyn IdentityProvider>,
    popup_in_flight: AtomicBool,
}

impl AuthGateway {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            provider,
            popup_in_flight: AtomicBool::new(false),
        }
    }

    /// Signs in with validated credentials.
    ///
    /// # Errors
    /// `INVALID_CREDENTIALS` when the provider rejects the pair, `PROVIDER_ERROR`
    /// for anything else.
    #[instrument(skip_all)]
    pub async fn sign_in_with_password(
        &self,
        credentials: ValidCredentials,
    ) -> Result<IdentityToken, AuthError> {
        let result = self
            .provider
            .password_sign_in(credentials.email(), credentials.password())
            .await;
        drop(credentials);

        result.map_err(|failure| {
            debug!("password sign-in failed: {failure}");
            match failure {
                ProviderFailure::Rejected(_) => AuthError::from_kind(ErrorKind::InvalidCredentials),
                ProviderFailure::Dismissed => {
                    AuthError::new(ErrorKind::ProviderError, "sign-in was cancelled")
                }
                ProviderFailure::Unavailable(message) => {
                    AuthError::new(ErrorKind::ProviderError, message)
                }
            }
        })
    }

    /// Runs the federated popup flow. Only one popup may be open at a time.
    ///
    /// # Errors
    /// `CONCURRENT_POPUP` while another popup is pending, `POPUP_CLOSED` when the
    /// visitor dismisses it, `PROVIDER_ERROR` otherwise.
    #[instrument(skip_all, fields(provider = %provider))]
    pub async fn sign_in_with_popup(&self, provider: &ProviderId) -> Result<IdentityToken, AuthError> {
        let Some(_guard) = PopupGuard::acquire(&self.popup_in_flight) else {
            warn!("popup sign-in already in flight");
            return Err(AuthError::from_kind(ErrorKind::ConcurrentPopup));
        };

        self.provider
            .popup_sign_in(provider)
            .await
            .map_err(|failure| match failure {
                ProviderFailure::Dismissed => AuthError::from_kind(ErrorKind::PopupClosed),
                ProviderFailure::Rejected(message) | ProviderFailure::Unavailable(message) => {
                    AuthError::new(ErrorKind::ProviderError, message)
                }
            })
    }

    #[must_use]
    pub fn popup_in_flight(&self) -> bool {
        self.popup_in_flight.load(Ordering::Acquire)
    }
}

/// Holds the popup slot; released on drop, including when the future is dropped.
struct PopupGuard<'a>(&'a AtomicBool);

impl<'a> PopupGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PopupGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
