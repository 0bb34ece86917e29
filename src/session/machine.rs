//! The session orchestrator.
//!
//! [`SessionMachine`] owns the single [`SessionState`] and drives one sign-in
//! attempt at a time: validate, authenticate, sync, route. The state lock is
//! only held inside `dispatch` and the recovery callback, never across an
//! `.await`, so UI events stay responsive while a sign-in is in flight.

use crate::{
    i18n::Translator,
    session::{
        config::SessionConfig,
        credentials::Credentials,
        errors::AuthError,
        exchange::AccountSync,
        gateway::{AuthGateway, IdentityProvider, ProviderId},
        presenter::{ErrorPresenter, LogNotifier, Notifier},
        profile::UserProfile,
        router::{LogNavigator, Navigator, RoleRouter, FORGOT_PASSWORD_PATH, HOME_PATH},
        state::{Effect, Phase, SessionEvent, SessionState, SignInRequest},
    },
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};
use ulid::Ulid;

/// External surfaces a session talks to.
pub struct Collaborators {
    provider: Arc<dyn IdentityProvider>,
    sync: Arc<dyn AccountSync>,
    translator: Arc<dyn Translator>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl Collaborators {
    /// Notifications and navigation go to the log until replaced.
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        sync: Arc<dyn AccountSync>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            provider,
            sync,
            translator,
            notifier: Arc::new(LogNotifier),
            navigator: Arc::new(LogNavigator),
        }
    }

    #[must_use]
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    #[must_use]
    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }
}

/// Result of a submit as seen by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another attempt is in flight or the session is already authenticated.
    Ignored,
    Authenticated { destination: String },
    Failed(AuthError),
}

struct Inner {
    id: Ulid,
    config: SessionConfig,
    state: Mutex<SessionState>,
    gateway: AuthGateway,
    sync: Arc<dyn AccountSync>,
    router: RoleRouter,
    presenter: ErrorPresenter,
    navigator: Arc<dyn Navigator>,
}

/// Handle to one login session. Clones share the same state.
#[derive(Clone)]
pub struct SessionMachine {
    inner: Arc<Inner>,
}

impl SessionMachine {
    pub fn new(config: SessionConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            provider,
            sync,
            translator,
            notifier,
            navigator,
        } = collaborators;

        let id = Ulid::new();
        debug!(session = %id, locale = translator.locale(), "session created");

        Self {
            inner: Arc::new(Inner {
                id,
                config: config.normalize(),
                state: Mutex::new(SessionState::default()),
                gateway: AuthGateway::new(provider),
                sync,
                router: RoleRouter::new(translator.clone()),
                presenter: ErrorPresenter::new(notifier, translator),
                navigator,
            }),
        }
    }

    #[must_use]
    pub fn session_id(&self) -> Ulid {
        self.inner.id
    }

    /// Read-only copy of the current state for rendering.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.lock_state().clone()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lock_state().phase()
    }

    #[must_use]
    pub fn recovery_pending(&self) -> bool {
        self.inner.presenter.recovery_pending()
    }

    /// Email/password sign-in. Must be called from within a tokio runtime.
    #[instrument(skip_all, fields(session = %self.inner.id))]
    pub async fn submit(&self, credentials: Credentials) -> SubmitOutcome {
        self.run(SessionEvent::Submit(credentials)).await
    }

    /// Federated sign-in through the provider's popup. A second call while a
    /// popup is pending fails with `CONCURRENT_POPUP` and leaves that popup's
    /// attempt alone.
    #[instrument(skip_all, fields(session = %self.inner.id, provider = %provider))]
    pub async fn submit_popup(&self, provider: ProviderId) -> SubmitOutcome {
        self.run(SessionEvent::SubmitPopup(provider)).await
    }

    /// Returns the new visibility.
    pub fn toggle_password_visibility(&self) -> bool {
        self.dispatch(SessionEvent::TogglePasswordVisibility);
        self.lock_state().show_password()
    }

    pub fn focus_password_field(&self) {
        self.dispatch(SessionEvent::FocusPasswordField);
    }

    /// Leaves `Failed` right away instead of waiting for the recovery timer.
    pub fn reset(&self) {
        self.dispatch(SessionEvent::Reset);
    }

    /// Back to the initial state; a pending recovery timer is cancelled.
    pub fn teardown(&self) {
        self.dispatch(SessionEvent::Teardown);
        debug!(session = %self.inner.id, "session torn down");
    }

    /// Signed-in visitors do not belong on the login page. Navigates home and
    /// returns the destination when a profile is present.
    pub fn login_page_redirect(&self) -> Option<&'static str> {
        let signed_in = self.lock_state().profile().is_some();
        signed_in.then(|| {
            self.inner.navigator.navigate(HOME_PATH);
            HOME_PATH
        })
    }

    pub fn forgot_password(&self) -> &'static str {
        self.inner.navigator.navigate(FORGOT_PASSWORD_PATH);
        FORGOT_PASSWORD_PATH
    }

    pub fn register(&self) -> String {
        let destination = self.inner.router.registration_path();
        self.inner.navigator.navigate(&destination);
        destination
    }

    async fn run(&self, event: SessionEvent) -> SubmitOutcome {
        let request = match self.dispatch(event) {
            Effect::SignIn(request) => request,
            Effect::Ignored => {
                debug!("submit ignored while {}", self.phase());
                return SubmitOutcome::Ignored;
            }
            effect => return self.settle(effect),
        };

        let event = match self.authenticate(request).await {
            Ok(profile) => SessionEvent::Success(profile),
            Err(error) => SessionEvent::Failure(error),
        };
        let effect = self.dispatch(event);
        self.settle(effect)
    }

    /// Provider first, then account sync. Neither call is retried.
    async fn authenticate(&self, request: SignInRequest) -> Result<UserProfile, AuthError> {
        let token = match request {
            SignInRequest::Password(credentials) => {
                self.inner.gateway.sign_in_with_password(credentials).await?
            }
            SignInRequest::Popup(provider) => self.inner.gateway.sign_in_with_popup(&provider).await?,
        };
        self.inner.sync.sync(token).await
    }

    /// Applies an event under the state lock. Timer bookkeeping happens under
    /// the same lock so a stale timer can never reset a newer failure.
    fn dispatch(&self, event: SessionEvent) -> Effect {
        let supersedes_timer = matches!(
            event,
            SessionEvent::Submit(_)
                | SessionEvent::SubmitPopup(_)
                | SessionEvent::Reset
                | SessionEvent::Teardown
        );

        let mut state = self.lock_state();
        let effect = state.apply(event);

        if supersedes_timer && !matches!(effect, Effect::Ignored | Effect::Reject(_)) {
            self.inner.presenter.cancel_recovery();
        }
        if matches!(effect, Effect::Present(_)) {
            self.arm_recovery();
        }
        drop(state);

        effect
    }

    fn settle(&self, effect: Effect) -> SubmitOutcome {
        match effect {
            Effect::Present(error) => {
                warn!(kind = %error.kind, "sign-in failed");
                self.inner.presenter.present(&error);
                SubmitOutcome::Failed(error)
            }
            Effect::Reject(error) => {
                warn!(kind = %error.kind, "sign-in refused");
                self.inner.presenter.present(&error);
                SubmitOutcome::Failed(error)
            }
            Effect::Authenticated(profile) => {
                let destination = self.inner.router.route(&profile);
                info!(role = profile.role(), %destination, "signed in");
                self.inner.navigator.navigate(&destination);
                SubmitOutcome::Authenticated { destination }
            }
            Effect::SignIn(_) | Effect::Ignored | Effect::None => SubmitOutcome::Ignored,
        }
    }

    fn arm_recovery(&self) {
        let session = Arc::downgrade(&self.inner);
        self.inner
            .presenter
            .schedule_recovery(self.inner.config.recovery_delay(), move |generation| {
                if let Some(inner) = session.upgrade() {
                    Self { inner }.recover(generation);
                }
            });
    }

    fn recover(&self, generation: u64) {
        let mut state = self.lock_state();
        if !self.inner.presenter.complete_recovery(generation) {
            return;
        }
        state.apply(SessionEvent::Reset);
        debug!(session = %self.inner.id, generation, "session recovered");
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
