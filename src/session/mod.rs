//! Login session core.
//!
//! - [`credentials`]: local validation, no I/O.
//! - [`gateway`] and [`identity_toolkit`]: identity provider sign-in.
//! - [`exchange`]: identity token to account profile.
//! - [`router`]: post-login destinations.
//! - [`presenter`]: notifications and the recovery timer.
//! - [`machine`]: the orchestrator owning [`SessionState`].

pub mod config;
pub mod credentials;
pub mod errors;
pub mod exchange;
pub mod gateway;
pub mod http;
pub mod identity_toolkit;
pub mod machine;
pub mod presenter;
pub mod profile;
pub mod router;
pub mod state;

pub use config::SessionConfig;
pub use credentials::{validate, Credentials, ValidCredentials};
pub use errors::{AuthError, ErrorCategory, ErrorKind, ValidationError};
pub use exchange::{AccountSync, TokenExchangeClient};
pub use gateway::{AuthGateway, IdentityProvider, IdentityToken, ProviderFailure, ProviderId};
pub use identity_toolkit::{IdentityToolkitProvider, PopupLauncher};
pub use machine::{Collaborators, SessionMachine, SubmitOutcome};
pub use presenter::{ErrorPresenter, LogNotifier, Notifier, Severity};
pub use profile::UserProfile;
pub use router::{LogNavigator, Navigator, RoleRouter};
pub use state::{Phase, SessionState};
