//! Redis lock store.
//!
//! Uses `SET NX` for the optimistic insert, `PEXPIRE` for the lease and `DEL`
//! for release. Suitable for multi-instance deployments sharing one Redis.
//!
//! ## Example
//!
//! ```ignore
//! use distlock::{LockSettings, RedisStore, StoreLockManager};
//!
//! let store = RedisStore::new("redis://localhost:6379")?;
//! let manager = StoreLockManager::new(store, LockSettings::default())?;
//! ```

use std::time::Duration;

use redis::{Client, Commands, Connection};

use super::{LockStore, StoreError};

/// Lock store backed by a Redis server.
///
/// A connection is opened per command; the client itself is cheap to clone.
#[derive(Clone)]
pub struct RedisStore {
    client: Client,
}

impl RedisStore {
    /// Create a store from a connection URL (e.g. `redis://localhost:6379`).
    pub fn new(connection_string: &str) -> Result<Self, StoreError> {
        let client = Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Create a store from host and port.
    pub fn with_host_port(host: &str, port: u16) -> Result<Self, StoreError> {
        Self::new(&format!("redis://{}:{}", host, port))
    }

    fn connection(&self) -> Result<Connection, StoreError> {
        Ok(self.client.get_connection()?)
    }
}

impl LockStore for RedisStore {
    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection()?;
        let inserted: bool = conn.set_nx(key, value)?;
        Ok(inserted)
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        let mut conn = self.connection()?;
        let millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let applied: bool = conn.pexpire(key, millis)?;
        Ok(applied)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection()?;
        let removed: i64 = conn.del(key)?;
        Ok(removed > 0)
    }
}
