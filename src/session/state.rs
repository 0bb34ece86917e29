//! Session state and its transition function.
//!
//! `apply` is the only code that writes a [`SessionState`]. It performs no I/O;
//! the returned [`Effect`] tells the machine what to do next.

use crate::session::{
    credentials::{validate, Credentials, ValidCredentials},
    errors::{AuthError, ErrorKind},
    gateway::ProviderId,
    profile::UserProfile,
};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Authenticated,
    Failed,
}

impl Phase {
    /// Phases in which a new sign-in attempt is accepted.
    #[must_use]
    pub const fn accepts_submit(self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Authenticated => "authenticated",
            Self::Failed => "failed",
        };
        formatter.write_str(name)
    }
}

/// `profile` is present only in `Authenticated`, `last_error` only in `Failed`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    phase: Phase,
    profile: Option<UserProfile>,
    show_password: bool,
    password_field_touched: bool,
    last_error: Option<AuthError>,
    popup_pending: bool,
}

impl SessionState {
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub const fn show_password(&self) -> bool {
        self.show_password
    }

    #[must_use]
    pub const fn password_field_touched(&self) -> bool {
        self.password_field_touched
    }

    #[must_use]
    pub const fn last_error(&self) -> Option<&AuthError> {
        self.last_error.as_ref()
    }

    /// True while the in-flight attempt is a popup sign-in.
    #[must_use]
    pub const fn popup_pending(&self) -> bool {
        self.popup_pending
    }

    /// Applies one event and reports the follow-up work.
    pub(crate) fn apply(&mut self, event: SessionEvent) -> Effect {
        match event {
            SessionEvent::Submit(credentials) => {
                if !self.phase.accepts_submit() {
                    return Effect::Ignored;
                }
                self.last_error = None;
                match validate(credentials) {
                    Ok(valid) => {
                        self.phase = Phase::Submitting;
                        Effect::SignIn(SignInRequest::Password(valid))
                    }
                    Err(error) => self.fail(error.into()),
                }
            }
            SessionEvent::SubmitPopup(provider) => {
                if self.popup_pending {
                    return Effect::Reject(AuthError::from_kind(ErrorKind::ConcurrentPopup));
                }
                if !self.phase.accepts_submit() {
                    return Effect::Ignored;
                }
                self.last_error = None;
                self.phase = Phase::Submitting;
                self.popup_pending = true;
                Effect::SignIn(SignInRequest::Popup(provider))
            }
            SessionEvent::Success(profile) => {
                if self.phase != Phase::Submitting {
                    return Effect::Ignored;
                }
                self.phase = Phase::Authenticated;
                self.popup_pending = false;
                self.last_error = None;
                self.profile = Some(profile.clone());
                Effect::Authenticated(profile)
            }
            SessionEvent::Failure(error) => {
                if self.phase != Phase::Submitting {
                    return Effect::Ignored;
                }
                self.fail(error)
            }
            SessionEvent::Reset => {
                if self.phase != Phase::Failed {
                    return Effect::Ignored;
                }
                self.phase = Phase::Idle;
                self.last_error = None;
                Effect::None
            }
            SessionEvent::TogglePasswordVisibility => {
                self.show_password = !self.show_password;
                Effect::None
            }
            SessionEvent::FocusPasswordField => {
                self.password_field_touched = true;
                Effect::None
            }
            SessionEvent::Teardown => {
                *self = Self::default();
                Effect::None
            }
        }
    }

    fn fail(&mut self, error: AuthError) -> Effect {
        self.phase = Phase::Failed;
        self.popup_pending = false;
        self.last_error = Some(error.clone());
        Effect::Present(error)
    }
}

#[derive(Debug)]
pub enum SessionEvent {
    Submit(Credentials),
    SubmitPopup(ProviderId),
    Success(UserProfile),
    Failure(AuthError),
    Reset,
    TogglePasswordVisibility,
    FocusPasswordField,
    Teardown,
}

#[derive(Debug)]
pub enum SignInRequest {
    Password(ValidCredentials),
    Popup(ProviderId),
}

/// Work the machine performs after a transition.
#[derive(Debug)]
pub enum Effect {
    /// The event is not valid in the current phase; nothing changed.
    Ignored,
    None,
    SignIn(SignInRequest),
    Present(AuthError),
    /// Refused without touching the in-flight attempt; shown but not recovered.
    Reject(AuthError),
    Authenticated(UserProfile),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{
        errors::ErrorKind,
        profile::{AccountRecord, UserProfile},
    };
    use secrecy::SecretString;

    fn profile() -> UserProfile {
        UserProfile::from_record(
            AccountRecord {
                id: "1".to_string(),
                name: "Ada".to_string(),
                email: "ada@wizcart.dev".to_string(),
                role: "customer".to_string(),
                picture: None,
            },
            SecretString::from("token".to_string()),
        )
    }

    fn submitting() -> SessionState {
        let mut state = SessionState::default();
        let effect = state.apply(SessionEvent::Submit(Credentials::new("ada@wizcart.dev", "hunter22")));
        assert!(matches!(effect, Effect::SignIn(SignInRequest::Password(_))));
        state
    }

    fn assert_invariants(state: &SessionState) {
        assert_eq!(state.profile().is_some(), state.phase() == Phase::Authenticated);
        if state.last_error().is_some() {
            assert_eq!(state.phase(), Phase::Failed);
        }
    }

    #[test]
    fn starts_idle_without_profile() {
        let state = SessionState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert!(!state.show_password());
        assert!(!state.password_field_touched());
        assert_invariants(&state);
    }

    #[test]
    fn invalid_submit_fails_without_sign_in() {
        let mut state = SessionState::default();
        let effect = state.apply(SessionEvent::Submit(Credentials::new("", "")));
        let Effect::Present(error) = effect else {
            panic!("expected a presented error, got {effect:?}");
        };
        assert_eq!(error.kind, ErrorKind::EmptyFields);
        assert_eq!(state.phase(), Phase::Failed);
        assert_invariants(&state);
    }

    #[test]
    fn submit_is_ignored_while_busy_or_authenticated() {
        let mut state = submitting();
        let effect = state.apply(SessionEvent::Submit(Credentials::new("bob@wizcart.dev", "hunter22")));
        assert!(matches!(effect, Effect::Ignored));
        assert!(matches!(
            state.apply(SessionEvent::SubmitPopup(ProviderId::google())),
            Effect::Ignored
        ));
        assert_eq!(state.phase(), Phase::Submitting);

        state.apply(SessionEvent::Success(profile()));
        assert!(matches!(
            state.apply(SessionEvent::Submit(Credentials::new("ada@wizcart.dev", "hunter22"))),
            Effect::Ignored
        ));
        assert_eq!(state.phase(), Phase::Authenticated);
        assert_invariants(&state);
    }

    #[test]
    fn second_popup_is_rejected_while_popup_pending() {
        let mut state = SessionState::default();
        state.apply(SessionEvent::SubmitPopup(ProviderId::google()));
        assert!(state.popup_pending());
        let before = state.clone();

        let effect = state.apply(SessionEvent::SubmitPopup(ProviderId::google()));
        let Effect::Reject(error) = effect else {
            panic!("expected a rejection, got {effect:?}");
        };
        assert_eq!(error.kind, ErrorKind::ConcurrentPopup);
        assert_eq!(state, before);

        state.apply(SessionEvent::Failure(AuthError::from_kind(ErrorKind::PopupClosed)));
        assert!(!state.popup_pending());
        assert!(matches!(
            state.apply(SessionEvent::SubmitPopup(ProviderId::google())),
            Effect::SignIn(SignInRequest::Popup(_))
        ));
    }

    #[test]
    fn success_stores_profile() {
        let mut state = submitting();
        let effect = state.apply(SessionEvent::Success(profile()));
        assert!(matches!(effect, Effect::Authenticated(ref stored) if *stored == profile()));
        assert_eq!(state.profile(), Some(&profile()));
        assert_invariants(&state);
    }

    #[test]
    fn failure_then_reset_returns_to_idle() {
        let mut state = submitting();
        state.apply(SessionEvent::Failure(AuthError::from_kind(ErrorKind::Network)));
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.last_error().map(|error| error.kind), Some(ErrorKind::Network));
        assert_invariants(&state);

        state.apply(SessionEvent::Reset);
        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.last_error().is_none());
        assert_invariants(&state);
    }

    #[test]
    fn resubmit_from_failed_clears_error() {
        let mut state = submitting();
        state.apply(SessionEvent::Failure(AuthError::from_kind(ErrorKind::Server)));

        let effect = state.apply(SessionEvent::SubmitPopup(ProviderId::google()));
        assert!(matches!(effect, Effect::SignIn(SignInRequest::Popup(_))));
        assert_eq!(state.phase(), Phase::Submitting);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn outcome_events_outside_submitting_are_ignored() {
        let mut state = SessionState::default();
        assert!(matches!(state.apply(SessionEvent::Success(profile())), Effect::Ignored));
        assert!(matches!(
            state.apply(SessionEvent::Failure(AuthError::from_kind(ErrorKind::Server))),
            Effect::Ignored
        ));
        assert!(matches!(state.apply(SessionEvent::Reset), Effect::Ignored));
        assert_eq!(state, SessionState::default());
    }

    #[test]
    fn toggle_is_an_involution_in_every_phase() {
        let mut state = SessionState::default();
        for _ in 0..2 {
            let before = state.show_password();
            state.apply(SessionEvent::TogglePasswordVisibility);
            state.apply(SessionEvent::TogglePasswordVisibility);
            assert_eq!(state.show_password(), before);
            state.apply(SessionEvent::TogglePasswordVisibility);
        }

        let mut busy = submitting();
        busy.apply(SessionEvent::TogglePasswordVisibility);
        assert!(busy.show_password());
        assert_eq!(busy.phase(), Phase::Submitting);
    }

    #[test]
    fn focus_marks_field_touched() {
        let mut state = submitting();
        state.apply(SessionEvent::FocusPasswordField);
        assert!(state.password_field_touched());
        assert_eq!(state.phase(), Phase::Submitting);
    }

    #[test]
    fn teardown_restores_initial_state() {
        let mut state = submitting();
        state.apply(SessionEvent::FocusPasswordField);
        state.apply(SessionEvent::Success(profile()));
        state.apply(SessionEvent::Teardown);
        assert_eq!(state, SessionState::default());
    }
}
