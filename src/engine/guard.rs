use tracing::warn;

use crate::{LockError, LockManager};

/// Holds an acquired lock and releases it when dropped, including during
/// unwinding.
///
/// A release error on drop is logged and otherwise ignored so it cannot
/// replace the guarded call's own result. Use `release` to observe it.
pub struct LockGuard<'a> {
    manager: &'a dyn LockManager,
    key: String,
    released: bool,
}

impl<'a> LockGuard<'a> {
    /// Wrap a key that `manager` has already granted.
    pub fn new(manager: &'a dyn LockManager, key: String) -> Self {
        LockGuard {
            manager,
            key,
            released: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Release now and report the outcome.
    pub fn release(mut self) -> Result<(), LockError> {
        self.released = true;
        self.manager.release(&self.key)
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(err) = self.manager.release(&self.key) {
            warn!(key = %self.key, error = %err, "release lock failed");
        }
    }
}
