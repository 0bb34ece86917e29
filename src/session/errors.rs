//! Failure taxonomy for the login flow. Every failure, local or remote, ends up
//! as an `AuthError` record stored on the session and shown to the visitor once.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Local, pre-network credential problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email and password is required")]
    EmptyFields,
    #[error("Password must be at least 6 characters long")]
    WeakPassword,
}

/// Which stage of the flow produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    Auth,
    Sync,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyFields,
    WeakPassword,
    InvalidCredentials,
    PopupClosed,
    ProviderError,
    ConcurrentPopup,
    Network,
    Server,
}

impl ErrorKind {
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::EmptyFields | Self::WeakPassword => ErrorCategory::Validation,
            Self::InvalidCredentials
            | Self::PopupClosed
            | Self::ProviderError
            | Self::ConcurrentPopup => ErrorCategory::Auth,
            Self::Network | Self::Server => ErrorCategory::Sync,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptyFields => "EMPTY_FIELDS",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::PopupClosed => "POPUP_CLOSED",
            Self::ProviderError => "PROVIDER_ERROR",
            Self::ConcurrentPopup => "CONCURRENT_POPUP",
            Self::Network => "NETWORK",
            Self::Server => "SERVER",
        }
    }

    /// Translation key of the user-facing message for this kind.
    ///
    /// `ProviderError` has no fixed text: the provider's own message is shown.
    #[must_use]
    pub const fn message_key(self) -> Option<&'static str> {
        match self {
            Self::EmptyFields => Some("Email and password is required"),
            Self::WeakPassword => Some("Password must be at least 6 characters long"),
            Self::InvalidCredentials => Some("User is not registered"),
            Self::PopupClosed => Some("Sign-in popup was closed"),
            Self::ConcurrentPopup => Some("A sign-in popup is already open"),
            Self::Network => Some("Unable to reach the server"),
            Self::Server => Some("Unable to sync your account"),
            Self::ProviderError => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl From<ValidationError> for ErrorKind {
    fn from(error: ValidationError) -> Self {
        match error {
            ValidationError::EmptyFields => Self::EmptyFields,
            ValidationError::WeakPassword => Self::WeakPassword,
        }
    }
}

/// A failed login attempt as recorded on the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AuthError {
    pub kind: ErrorKind,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl AuthError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Builds an error carrying the default English text for `kind`.
    #[must_use]
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self::new(kind, kind.message_key().unwrap_or("Sign-in failed"))
    }

    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        self.kind.category()
    }
}

impl From<ValidationError> for AuthError {
    fn from(error: ValidationError) -> Self {
        Self::new(error.into(), error.to_string())
    }
}
