use std::sync::Arc;
use std::time::Duration;

use crate::LockError;

/// A distributed mutex keyed by string.
///
/// `LockEngine` resolves one `LockManager` per lock configuration (a named
/// registry entry or the process default). The reference implementation is
/// `StoreLockManager`, which polls a `LockStore`; other implementations might
/// use database advisory locks, etcd leases, etc.
pub trait LockManager: Send + Sync {
    /// Try to take the lock for `key`, blocking for at most `max_wait`.
    ///
    /// Returns `Ok(true)` if granted, `Ok(false)` if the wait budget ran out.
    /// There is no fairness among waiters and no reentrancy: a holder asking
    /// again for the same key waits like anyone else.
    fn acquire(&self, key: &str, max_wait: Duration) -> Result<bool, LockError>;

    /// Release the lock for `key`. Releasing an absent key is a no-op.
    ///
    /// Release is not ownership-checked; only the caller that acquired the
    /// key is expected to call it.
    fn release(&self, key: &str) -> Result<(), LockError>;
}

impl<M: LockManager + ?Sized> LockManager for Arc<M> {
    fn acquire(&self, key: &str, max_wait: Duration) -> Result<bool, LockError> {
        (**self).acquire(key, max_wait)
    }

    fn release(&self, key: &str) -> Result<(), LockError> {
        (**self).release(key)
    }
}
