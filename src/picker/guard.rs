//! Single-instance guard for picker sessions.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Result of asking for a new session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    /// A session is already running; nothing was changed
    AlreadyActive,
}

/// Hands out at most one live [`SessionGuard`] at a time
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    active: Arc<AtomicBool>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the picker, or `None` if another session holds it
    pub fn try_acquire(&self) -> Option<SessionGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SessionGuard { active: Arc::clone(&self.active) })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Held by the running session; releases the picker when dropped
#[derive(Debug)]
pub struct SessionGuard {
    active: Arc<AtomicBool>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}
