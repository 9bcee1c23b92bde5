//! Test doubles shared by the locking tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use distlock::{
    Callable, DeclaredConfigSource, InMemoryStore, LockDeclaration, LockEngine, LockError,
    LockManager, LockSettings, LockStore, StaticDeclarations, StoreError, StoreLockManager,
};

/// Lock manager that grants (or refuses) every request and counts calls.
pub struct CountingLockManager {
    grant: bool,
    pub acquires: AtomicUsize,
    pub releases: AtomicUsize,
    pub keys: Mutex<Vec<String>>,
}

impl CountingLockManager {
    pub fn granting() -> Arc<Self> {
        Arc::new(Self::new(true))
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self::new(false))
    }

    fn new(grant: bool) -> Self {
        CountingLockManager {
            grant,
            acquires: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            keys: Mutex::new(Vec::new()),
        }
    }

    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

impl LockManager for CountingLockManager {
    fn acquire(&self, key: &str, _max_wait: Duration) -> Result<bool, LockError> {
        self.acquires.fetch_add(1, Ordering::SeqCst);
        self.keys.lock().unwrap().push(key.to_string());
        Ok(self.grant)
    }

    fn release(&self, _key: &str) -> Result<(), LockError> {
        self.releases.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory store whose operations can be made to fail a set number of times.
#[derive(Clone, Default)]
pub struct FlakyStore {
    pub inner: InMemoryStore,
    insert_failures: Arc<AtomicUsize>,
    expire_failures: Arc<AtomicUsize>,
    always_fail_expire: bool,
    pub inserts: Arc<AtomicUsize>,
    pub deletes: Arc<AtomicUsize>,
}

impl FlakyStore {
    pub fn failing_inserts(times: usize) -> Self {
        let store = FlakyStore::default();
        store.insert_failures.store(times, Ordering::SeqCst);
        store
    }

    pub fn failing_expires(times: usize) -> Self {
        let store = FlakyStore::default();
        store.expire_failures.store(times, Ordering::SeqCst);
        store
    }

    pub fn never_expiring() -> Self {
        FlakyStore {
            always_fail_expire: true,
            ..FlakyStore::default()
        }
    }

    pub fn inserts(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl LockStore for FlakyStore {
    fn set_if_absent(&self, key: &str, value: &str) -> Result<bool, StoreError> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.insert_failures) {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        self.inner.set_if_absent(key, value)
    }

    fn expire(&self, key: &str, ttl: Duration) -> Result<bool, StoreError> {
        if self.always_fail_expire || Self::take_failure(&self.expire_failures) {
            return Err(StoreError::Unavailable("timeout".into()));
        }
        self.inner.expire(key, ttl)
    }

    fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(key)
    }
}

/// Settings with a short backoff so tests do not crawl.
pub fn fast_settings() -> LockSettings {
    LockSettings::default().with_retry_interval(Duration::from_millis(5))
}

pub fn memory_manager(store: InMemoryStore) -> StoreLockManager<InMemoryStore> {
    StoreLockManager::new(store, fast_settings()).unwrap()
}

pub fn charge() -> Callable {
    Callable::new("Payments", "charge")
        .key_param("order_id", "u64")
        .param("note", "String")
}

/// Engine over `declarations` with `manager` as the default lock manager.
pub fn engine_with(
    declarations: StaticDeclarations,
    manager: Arc<dyn LockManager>,
) -> LockEngine<DeclaredConfigSource> {
    LockEngine::builder(DeclaredConfigSource::new(declarations))
        .default_lock_manager(manager)
        .build()
        .unwrap()
}

/// Engine where `charge` is locked with prefix "pay" and the given declaration tweaks.
pub fn charge_engine(
    declaration: LockDeclaration,
    manager: Arc<dyn LockManager>,
) -> LockEngine<DeclaredConfigSource> {
    engine_with(
        StaticDeclarations::new().on_callable(&charge(), declaration),
        manager,
    )
}
