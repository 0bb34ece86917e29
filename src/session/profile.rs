//! Canonical account record held by an authenticated session.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

pub const ADMIN_ROLE: &str = "admin";

/// Response body of the account sync endpoint.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Authenticated user. Built once from the sync response and never mutated;
/// a new login replaces it wholesale.
#[derive(Clone, Debug)]
pub struct UserProfile {
    id: String,
    name: String,
    email: String,
    role: String,
    picture_url: Option<String>,
    token: SecretString,
}

impl UserProfile {
    /// Merges the caller's bearer token into the account record.
    #[must_use]
    pub fn from_record(record: AccountRecord, token: SecretString) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            role: record.role,
            picture_url: record.picture.filter(|picture| !picture.is_empty()),
            token,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn role(&self) -> &str {
        &self.role
    }

    #[must_use]
    pub fn picture_url(&self) -> Option<&str> {
        self.picture_url.as_deref()
    }

    /// Bearer credential for later backend calls.
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

impl PartialEq for UserProfile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.email == other.email
            && self.role == other.role
            && self.picture_url == other.picture_url
            && self.token.expose_secret() == other.token.expose_secret()
    }
}

impl Eq for UserProfile {}
