use std::time::Duration;

use super::StoreError;

/// Trait for the shared key-value store behind a distributed lock.
///
/// A lock record is a key holding an opaque marker with a time-to-live; its
/// existence is the lock. Any backend with an atomic "set if absent" and
/// key expiry can implement this (Redis, an in-process map, etc.).
pub trait LockStore: Send + Sync {
    /// Atomically insert `value` at `key` if and only if the key is absent.
    /// Returns `Ok(true)` if this call created the key.
    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError>;

    /// Attach a time-to-live to an existing key.
    /// Returns `Ok(false)` if the key does not exist.
    fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError>;

    /// Delete the key. Returns `Ok(true)` if it existed.
    fn delete(&self, key: &str) -> Result<bool, StoreError>;
}

impl<S: LockStore + ?Sized> LockStore for std::sync::Arc<S> {
    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        (**self).set_if_absent(key, value)
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        (**self).expire(key, ttl)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        (**self).delete(key)
    }
}
