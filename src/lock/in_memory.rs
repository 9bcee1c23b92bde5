use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::{LockStore, StoreError};

struct Record {
    value: String,
    expires_at: Option<Instant>,
}

impl Record {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// In-process lock store backed by a `HashMap` with real expiry.
///
/// Expired records are dropped lazily: on the next access to their key, and
/// all at once whenever a new record is inserted.
/// Cloning creates another handle to the same storage, so one store can be
/// shared by several `StoreLockManager`s to simulate a fleet in one process.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<Mutex<HashMap<String, Record>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a live (unexpired) record exists for `key`.
    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Poisoned("contains"))?;
        Ok(records
            .get(key)
            .is_some_and(|record| record.is_live(Instant::now())))
    }

    /// Remaining time-to-live for `key`, or `None` if it is absent or has no expiry.
    pub fn ttl(&self, key: &str) -> Result<Option<Duration>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Poisoned("ttl"))?;
        let now = Instant::now();
        Ok(records
            .get(key)
            .filter(|record| record.is_live(now))
            .and_then(|record| record.expires_at)
            .map(|at| at.saturating_duration_since(now)))
    }

    /// The marker value stored at `key`, if live.
    pub fn value(&self, key: &str) -> Result<Option<String>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| StoreError::Poisoned("value"))?;
        Ok(records
            .get(key)
            .filter(|record| record.is_live(Instant::now()))
            .map(|record| record.value.clone()))
    }
}

impl LockStore for InMemoryStore {
    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Poisoned("set_if_absent"))?;
        let now = Instant::now();
        if records.get(key).is_some_and(|record| record.is_live(now)) {
            return Ok(false);
        }
        records.retain(|_, record| record.is_live(now));
        records.insert(
            key.to_string(),
            Record {
                value: value.to_string(),
                expires_at: None,
            },
        );
        Ok(true)
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Poisoned("expire"))?;
        let now = Instant::now();
        let live = records.get(key).map(|record| record.is_live(now));
        match live {
            Some(true) => {
                if let Some(record) = records.get_mut(key) {
                    record.expires_at = Some(now + ttl);
                }
                Ok(true)
            }
            Some(false) => {
                records.remove(key);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| StoreError::Poisoned("delete"))?;
        Ok(records
            .remove(key)
            .is_some_and(|record| record.is_live(Instant::now())))
    }
}
