use crate::session::presenter::DEFAULT_RECOVERY_DELAY;
use std::time::Duration;

/// Tunables for one [`SessionMachine`](crate::session::SessionMachine).
#[derive(Clone, Debug)]
pub struct SessionConfig {
    recovery_delay: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            recovery_delay: DEFAULT_RECOVERY_DELAY,
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How long a failed session stays `Failed` before returning to `Idle`.
    #[must_use]
    pub fn with_recovery_delay(mut self, delay: Duration) -> Self {
        self.recovery_delay = delay;
        self
    }

    /// A zero delay would reset the session before the notification is seen;
    /// it is raised to one millisecond.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.recovery_delay.is_zero() {
            self.recovery_delay = Duration::from_millis(1);
        }
        self
    }

    #[must_use]
    pub const fn recovery_delay(&self) -> Duration {
        self.recovery_delay
    }
}
