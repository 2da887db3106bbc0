use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Latching one-shot flag shared between the code that requests something
/// (cancel, begin) and the worker that observes it. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct Signal {
    inner: Arc<SignalInner>,
}

#[derive(Debug, Default)]
struct SignalInner {
    raised: Mutex<bool>,
    changed: Condvar,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raised() -> Self {
        let signal = Self::new();
        signal.raise();
        signal
    }

    pub fn raise(&self) {
        let mut raised = self.lock();
        if !*raised {
            *raised = true;
            self.inner.changed.notify_all();
        }
    }

    pub fn is_raised(&self) -> bool {
        *self.lock()
    }

    pub fn wait(&self) {
        let mut raised = self.lock();
        while !*raised {
            raised = self
                .inner
                .changed
                .wait(raised)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut raised = self.lock();
        while !*raised {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .inner
                .changed
                .wait_timeout(raised, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            raised = guard;
        }
        true
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner
            .raised
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
