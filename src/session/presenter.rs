//! Error presentation and the recovery timer.
//!
//! Each failed attempt shows one transient notification and arms a one-shot
//! timer. Arming aborts the previous timer, and every timer carries a
//! generation so a timer that already woke up but lost the race to a newer one
//! cannot fire its callback.

use crate::{i18n::Translator, session::errors::AuthError};
use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Delay before a failed session returns to `Idle`.
pub const DEFAULT_RECOVERY_DELAY: Duration = Duration::from_millis(6000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// Notification surface (toasts, banners). Notifications dismiss themselves.
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Notifier that writes to the log instead of a UI.
#[derive(Clone, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info | Severity::Success => info!(message, "notification"),
            Severity::Warning => warn!(message, "notification"),
            Severity::Error => error!(message, "notification"),
        }
    }
}

#[derive(Debug)]
struct RecoveryTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Debug, Default)]
struct TimerSlot {
    generation: u64,
    armed: Option<RecoveryTimer>,
}

pub struct ErrorPresenter {
    notifier: Arc<dyn Notifier>,
    translator: Arc<dyn Translator>,
    slot: Mutex<TimerSlot>,
}

impl ErrorPresenter {
    pub fn new(notifier: Arc<dyn Notifier>, translator: Arc<dyn Translator>) -> Self {
        Self {
            notifier,
            translator,
            slot: Mutex::new(TimerSlot::default()),
        }
    }

    /// Shows the error once, translated for the current locale.
    pub fn present(&self, error: &AuthError) {
        let message = match error.kind.message_key() {
            Some(key) => self.translator.translate(key),
            None => error.message.clone(),
        };
        debug!(kind = %error.kind, "presenting error");
        self.notifier.notify(Severity::Error, &message);
    }

    /// Arms the recovery timer, cancelling any timer still pending.
    /// `on_fire` receives the generation of the timer that elapsed.
    /// Must be called from within a tokio runtime.
    pub fn schedule_recovery<F>(&self, delay: Duration, on_fire: F) -> u64
    where
        F: FnOnce(u64) + Send + 'static,
    {
        let mut slot = self.lock();
        if let Some(previous) = slot.armed.take() {
            debug!(generation = previous.generation, "superseding recovery timer");
            previous.handle.abort();
        }

        slot.generation += 1;
        let generation = slot.generation;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            on_fire(generation);
        });
        slot.armed = Some(RecoveryTimer { generation, handle });
        generation
    }

    /// Disarms the pending timer. Returns `true` if one was pending.
    pub fn cancel_recovery(&self) -> bool {
        let mut slot = self.lock();
        match slot.armed.take() {
            Some(timer) => {
                debug!(generation = timer.generation, "recovery timer cancelled");
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Consumes the armed timer if `generation` is still the current one.
    /// A stale timer gets `false` and must not emit `RESET`.
    pub fn complete_recovery(&self, generation: u64) -> bool {
        let mut slot = self.lock();
        match &slot.armed {
            Some(timer) if timer.generation == generation => {
                slot.armed = None;
                true
            }
            _ => {
                debug!(generation, "ignoring stale recovery timer");
                false
            }
        }
    }

    #[must_use]
    pub fn recovery_pending(&self) -> bool {
        self.lock().armed.is_some()
    }

    fn lock(&self) -> MutexGuard<'_, TimerSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ErrorPresenter {
    fn drop(&mut self) {
        let slot = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(timer) = slot.armed.take() {
            timer.handle.abort();
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::i18n::Catalog;
    use crate::session::errors::ErrorKind;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Notifier that keeps every notification for assertions.
    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) seen: Mutex<Vec<(Severity, String)>>,
    }

    impl RecordingNotifier {
        pub(crate) fn messages(&self) -> Vec<String> {
            self.seen
                .lock()
                .unwrap()
                .iter()
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, severity: Severity, message: &str) {
            self.seen.lock().unwrap().push((severity, message.to_string()));
        }
    }

    fn presenter(locale: &str) -> (ErrorPresenter, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let presenter = ErrorPresenter::new(notifier.clone(), Arc::new(Catalog::with_defaults(locale)));
        (presenter, notifier)
    }

    #[test]
    fn present_translates_known_kinds() {
        let (presenter, notifier) = presenter("ms");
        presenter.present(&AuthError::from_kind(ErrorKind::InvalidCredentials));
        assert_eq!(notifier.messages(), vec!["Pengguna tidak berdaftar".to_string()]);
        assert_eq!(notifier.seen.lock().unwrap()[0].0, Severity::Error);
    }

    #[test]
    fn present_shows_provider_message_verbatim() {
        let (presenter, notifier) = presenter("zh");
        presenter.present(&AuthError::new(ErrorKind::ProviderError, "account-exists-with-different-credential"));
        assert_eq!(
            notifier.messages(),
            vec!["account-exists-with-different-credential".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn timer_fires_once_after_delay() {
        let (presenter, _) = presenter("en");
        let fired = Arc::new(AtomicU64::new(0));

        let generation = presenter.schedule_recovery(DEFAULT_RECOVERY_DELAY, {
            let fired = fired.clone();
            move |generation| fired.store(generation, Ordering::SeqCst)
        });
        assert!(presenter.recovery_pending());

        tokio::time::sleep(Duration::from_millis(5999)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(fired.load(Ordering::SeqCst), generation);
        assert!(presenter.complete_recovery(generation));
        assert!(!presenter.recovery_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn rearming_cancels_the_previous_timer() {
        let (presenter, _) = presenter("en");
        let fired = Arc::new(Mutex::new(Vec::new()));

        let first = presenter.schedule_recovery(DEFAULT_RECOVERY_DELAY, {
            let fired = fired.clone();
            move |generation| fired.lock().unwrap().push(generation)
        });
        tokio::time::sleep(Duration::from_millis(3000)).await;
        let second = presenter.schedule_recovery(DEFAULT_RECOVERY_DELAY, {
            let fired = fired.clone();
            move |generation| fired.lock().unwrap().push(generation)
        });

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_ne!(first, second);
        assert_eq!(*fired.lock().unwrap(), vec![second]);
        assert!(!presenter.complete_recovery(first));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_recovery_disarms() {
        let (presenter, _) = presenter("en");
        let fired = Arc::new(AtomicU64::new(0));

        presenter.schedule_recovery(DEFAULT_RECOVERY_DELAY, {
            let fired = fired.clone();
            move |generation| fired.store(generation, Ordering::SeqCst)
        });
        assert!(presenter.cancel_recovery());
        assert!(!presenter.cancel_recovery());

        tokio::time::sleep(Duration::from_millis(7000)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
