use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use super::{LockManager, LockStore};
use crate::{LockError, LockSettings};

/// Marker value written at a held key. Only the key's existence matters.
pub const LOCK_MARKER: &str = "1";

/// Lock manager over a shared `LockStore` using optimistic insert, a lease
/// TTL, and bounded polling.
///
/// Each attempt does `set_if_absent` then `expire(lease)`. If the TTL cannot
/// be attached the fresh record is deleted again so no lock outlives its
/// holder without expiry, and the attempt counts as failed. Store errors
/// during an attempt are swallowed and retried until `max_wait` elapses.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use distlock::{InMemoryStore, LockManager, LockSettings, StoreLockManager};
///
/// let manager = StoreLockManager::new(InMemoryStore::new(), LockSettings::default()).unwrap();
/// assert!(manager.acquire("order_42", Duration::from_millis(100)).unwrap());
/// manager.release("order_42").unwrap();
/// ```
pub struct StoreLockManager<S> {
    store: S,
    settings: LockSettings,
}

impl<S: LockStore> StoreLockManager<S> {
    /// Fails with `LockError::Settings` on a zero lease or retry interval.
    pub fn new(store: S, settings: LockSettings) -> Result<Self, LockError> {
        Ok(StoreLockManager {
            store,
            settings: settings.validate()?,
        })
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &LockSettings {
        &self.settings
    }

    /// One insert + TTL attempt. `true` only if both steps succeeded.
    fn try_acquire(&self, key: &str) -> bool {
        match self.store.set_if_absent(key, LOCK_MARKER) {
            Ok(true) => {}
            Ok(false) => return false,
            Err(err) => {
                debug!(key, error = %err, "lock attempt failed");
                return false;
            }
        }

        match self.store.expire(key, self.settings.lease()) {
            Ok(true) => return true,
            Ok(false) => debug!(key, "lock record vanished before its lease was set"),
            Err(err) => debug!(key, error = %err, "set lock lease failed"),
        }

        if let Err(err) = self.store.delete(key) {
            debug!(key, error = %err, "remove lock without lease failed");
        }
        false
    }
}

impl<S: LockStore> LockManager for StoreLockManager<S> {
    fn acquire(&self, key: &str, max_wait: Duration) -> Result<bool, LockError> {
        let started = Instant::now();
        let mut attempts = 0u32;

        while started.elapsed() < max_wait {
            attempts += 1;
            if self.try_acquire(key) {
                return Ok(true);
            }
            thread::sleep(self.settings.retry_interval());
        }

        debug!(key, attempts, ?max_wait, "lock wait budget exhausted");
        Ok(false)
    }

    fn release(&self, key: &str) -> Result<(), LockError> {
        self.store.delete(key)?;
        Ok(())
    }
}
