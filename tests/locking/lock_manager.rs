//! Store-backed lock protocol tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::{Duration, Instant};

use distlock::{InMemoryStore, LockManager, LockSettings, StoreLockManager};

use crate::support::{fast_settings, memory_manager, FlakyStore};

// ============================================================================
// Mutual exclusion
// ============================================================================

#[test]
fn exactly_one_of_many_concurrent_acquirers_wins() {
    let store = InMemoryStore::new();
    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let granted = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..threads)
        .map(|_| {
            // One manager per "process", all sharing the store.
            let manager = memory_manager(store.clone());
            let barrier = Arc::clone(&barrier);
            let granted = Arc::clone(&granted);
            thread::spawn(move || {
                barrier.wait();
                if manager.acquire("order_1", Duration::from_millis(100)).unwrap() {
                    granted.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(granted.load(Ordering::SeqCst), 1);
}

#[test]
fn critical_sections_never_overlap() {
    let store = InMemoryStore::new();
    let inside = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let manager = memory_manager(store.clone());
            let inside = Arc::clone(&inside);
            let overlaps = Arc::clone(&overlaps);
            let completed = Arc::clone(&completed);
            thread::spawn(move || {
                for _ in 0..5 {
                    if !manager.acquire("ledger", Duration::from_secs(5)).unwrap() {
                        continue;
                    }
                    if inside.fetch_add(1, Ordering::SeqCst) != 0 {
                        overlaps.fetch_add(1, Ordering::SeqCst);
                    }
                    thread::sleep(Duration::from_millis(2));
                    inside.fetch_sub(1, Ordering::SeqCst);
                    completed.fetch_add(1, Ordering::SeqCst);
                    manager.release("ledger").unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert_eq!(completed.load(Ordering::SeqCst), 20);
}

#[test]
fn different_keys_do_not_contend() {
    let manager = memory_manager(InMemoryStore::new());
    assert!(manager.acquire("a", Duration::from_millis(50)).unwrap());
    assert!(manager.acquire("b", Duration::from_millis(50)).unwrap());
}

// ============================================================================
// Release and lease expiry
// ============================================================================

#[test]
fn release_is_idempotent() {
    let manager = memory_manager(InMemoryStore::new());
    manager.release("missing").unwrap();

    assert!(manager.acquire("k", Duration::from_millis(50)).unwrap());
    manager.release("k").unwrap();
    manager.release("k").unwrap();
    assert!(!manager.store().contains("k").unwrap());
}

#[test]
fn lease_expiry_frees_a_lock_that_is_never_released() {
    let store = InMemoryStore::new();
    let settings = fast_settings().with_lease(Duration::from_millis(100));
    let crashed = StoreLockManager::new(store.clone(), settings).unwrap();
    let survivor = StoreLockManager::new(store.clone(), settings).unwrap();

    assert!(crashed.acquire("job", Duration::from_millis(50)).unwrap());
    drop(crashed); // holder dies without releasing

    assert!(!survivor.acquire("job", Duration::from_millis(20)).unwrap());
    thread::sleep(Duration::from_millis(150));
    assert!(!store.contains("job").unwrap());
    assert!(survivor.acquire("job", Duration::from_millis(50)).unwrap());
}

#[test]
fn waiter_gets_lock_once_lease_runs_out() {
    let store = InMemoryStore::new();
    let settings = fast_settings().with_lease(Duration::from_millis(80));
    let holder = StoreLockManager::new(store.clone(), settings).unwrap();
    let waiter = StoreLockManager::new(store, settings).unwrap();

    assert!(holder.acquire("job", Duration::from_millis(50)).unwrap());
    let started = Instant::now();
    assert!(waiter.acquire("job", Duration::from_secs(2)).unwrap());
    assert!(started.elapsed() >= Duration::from_millis(50));
}

// ============================================================================
// Wait budget
// ============================================================================

#[test]
fn acquire_on_held_key_respects_budget() {
    let store = InMemoryStore::new();
    let retry = Duration::from_millis(50);
    let settings = LockSettings::default().with_retry_interval(retry);
    let holder = StoreLockManager::new(store.clone(), settings).unwrap();
    let waiter = StoreLockManager::new(store, settings).unwrap();
    assert!(holder.acquire("held", Duration::from_millis(50)).unwrap());

    let budget = Duration::from_millis(200);
    let started = Instant::now();
    assert!(!waiter.acquire("held", budget).unwrap());
    let elapsed = started.elapsed();

    assert!(elapsed >= budget, "gave up early after {elapsed:?}");
    // One backoff past the budget, plus scheduling slack.
    assert!(
        elapsed < budget + retry + Duration::from_millis(100),
        "overran budget: {elapsed:?}"
    );
}

// ============================================================================
// Transient store failures
// ============================================================================

#[test]
fn transient_insert_errors_are_retried() {
    let store = FlakyStore::failing_inserts(3);
    let manager = StoreLockManager::new(store.clone(), fast_settings()).unwrap();

    assert!(manager.acquire("k", Duration::from_secs(1)).unwrap());
    assert_eq!(store.inserts(), 4);
}

#[test]
fn failed_lease_rolls_back_the_insert_and_retries() {
    let store = FlakyStore::failing_expires(1);
    let manager = StoreLockManager::new(store.clone(), fast_settings()).unwrap();

    assert!(manager.acquire("k", Duration::from_secs(1)).unwrap());
    assert_eq!(store.deletes(), 1);
    assert_eq!(store.inserts(), 2);
    assert!(store.inner.ttl("k").unwrap().is_some());
}

#[test]
fn persistent_lease_failure_never_leaves_an_unexpiring_record() {
    let store = FlakyStore::never_expiring();
    let manager = StoreLockManager::new(store.clone(), fast_settings()).unwrap();

    assert!(!manager.acquire("k", Duration::from_millis(60)).unwrap());
    assert!(store.inserts() >= 2);
    assert_eq!(store.deletes(), store.inserts());
    assert!(!store.inner.contains("k").unwrap());
}
