use std::fmt;
use std::sync::{Arc, Mutex};

type Callback = Box<dyn Fn() + Send + Sync>;

struct GateInner {
    active: Mutex<usize>,
    on_suppress: Callback,
    on_restore: Callback,
}

/// Reference-counted suppression of user-facing upload notifications.
///
/// Each in-flight upload holds a [`SuppressionGuard`]. `on_suppress` fires when the first guard
/// is taken and `on_restore` fires once the last outstanding guard is dropped, so overlapping
/// uploads restore notifications exactly once.
#[derive(Clone)]
pub struct NotificationGate {
    inner: Arc<GateInner>,
}

impl NotificationGate {
    /// Create a gate with transition callbacks.
    pub fn new(
        on_suppress: impl Fn() + Send + Sync + 'static,
        on_restore: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(GateInner {
                active: Mutex::new(0),
                on_suppress: Box::new(on_suppress),
                on_restore: Box::new(on_restore),
            }),
        }
    }

    /// Gate with no-op callbacks.
    pub fn silent() -> Self {
        Self::new(|| {}, || {})
    }

    /// Take a suppression guard; released on drop.
    pub fn acquire(&self) -> SuppressionGuard {
        // Callbacks run under the lock so suppress/restore never interleave out of order.
        let mut active = self.inner.active.lock().unwrap_or_else(|e| e.into_inner());
        *active += 1;
        if *active == 1 {
            tracing::trace!("upload notifications suppressed");
            (self.inner.on_suppress)();
        }
        SuppressionGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Number of outstanding guards.
    pub fn active(&self) -> usize {
        *self.inner.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Return `true` while at least one guard is outstanding.
    pub fn is_suppressed(&self) -> bool {
        self.active() > 0
    }
}

impl Default for NotificationGate {
    fn default() -> Self {
        Self::silent()
    }
}

impl fmt::Debug for NotificationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationGate")
            .field("active", &self.active())
            .finish()
    }
}

/// Scoped suppression held for the duration of one upload.
#[must_use = "notifications are restored as soon as the guard is dropped"]
pub struct SuppressionGuard {
    inner: Arc<GateInner>,
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        let mut active = self.inner.active.lock().unwrap_or_else(|e| e.into_inner());
        *active = active.saturating_sub(1);
        if *active == 0 {
            tracing::trace!("upload notifications restored");
            (self.inner.on_restore)();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/notify.rs"]
mod tests;
