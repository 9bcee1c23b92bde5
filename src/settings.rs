//! Startup-time settings for store-backed locks.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::LockError;

/// Default lock-hold ceiling: a record expires this long after it was taken.
pub const DEFAULT_LEASE: Duration = Duration::from_secs(60);

/// Default sleep between acquisition attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Settings for `StoreLockManager`.
///
/// ```toml
/// lease_ms = 60000
/// retry_interval_ms = 50
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockSettings {
    /// Lock-hold TTL ceiling in milliseconds, independent of any caller's wait budget.
    pub lease_ms: u64,
    /// Backoff between acquisition attempts in milliseconds.
    pub retry_interval_ms: u64,
}

impl Default for LockSettings {
    fn default() -> Self {
        Self {
            lease_ms: DEFAULT_LEASE.as_millis() as u64,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL.as_millis() as u64,
        }
    }
}

impl LockSettings {
    /// Parse settings from TOML text. Missing fields keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, LockError> {
        let settings: LockSettings = toml::from_str(text)?;
        settings.validate()
    }

    /// Sub-millisecond leases round up to the next whole millisecond.
    pub fn with_lease(mut self, lease: Duration) -> Self {
        self.lease_ms = ceil_millis(lease);
        self
    }

    /// Sub-millisecond intervals round up to the next whole millisecond.
    pub fn with_retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval_ms = ceil_millis(interval);
        self
    }

    pub fn lease(&self) -> Duration {
        Duration::from_millis(self.lease_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Reject values that would make every lock expire instantly or spin the CPU.
    pub fn validate(self) -> Result<Self, LockError> {
        if self.lease_ms == 0 {
            return Err(LockError::Settings("lease_ms must be greater than zero".into()));
        }
        if self.retry_interval_ms == 0 {
            return Err(LockError::Settings(
                "retry_interval_ms must be greater than zero".into(),
            ));
        }
        Ok(self)
    }
}

fn ceil_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX)
}
