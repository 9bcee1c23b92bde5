//! Declarative fleet-wide mutual exclusion.
//!
//! Declare that an operation may only run once at a time across every
//! process, keyed by some of its arguments, and let `LockEngine` wrap each
//! call: resolve the declaration, derive the key, take a store-backed lease
//! lock, run, release.
//!
//! - `source`: declarations, validated configurations, cached fallback resolution
//! - `key`: key derivation from marked arguments
//! - `lock`: the `LockManager` protocol and the polling `StoreLockManager`
//! - `engine`: the per-call orchestration

mod callable;
mod config;
mod engine;
mod error;
mod key;
mod lock;
mod registry;
mod settings;
mod source;

pub use callable::{
    Callable, CallableKind, CallableNormalizer, IdentityNormalizer, OverrideTable, Param,
    TypeName, Visibility,
};
pub use config::{FailureAction, LockConfiguration, LockDeclaration, TypeDefaults, DEFAULT_MAX_WAIT};
pub use engine::{
    InvocationError, LockEngine, LockEngineBuilder, LockGuard, MetadataCache, ResolvedMetadata,
};
pub use error::LockError;
pub use key::{Arg, KeyGenerator, SimpleKeyGenerator};
#[cfg(feature = "redis")]
pub use lock::RedisStore;
pub use lock::{InMemoryStore, LockManager, LockStore, StoreError, StoreLockManager, LOCK_MARKER};
pub use registry::{Capability, Component, ComponentRegistry, DEFAULT_LOCK_MANAGER};
pub use settings::{LockSettings, DEFAULT_LEASE, DEFAULT_RETRY_INTERVAL};
pub use source::{
    ConfigSource, DeclarationProvider, DeclaredConfigSource, FallbackResolver, StaticDeclarations,
};

/// Build an argument list for a key generator from displayable values.
///
/// # Example
/// ```
/// let order_id = 42u64;
/// let args = distlock::args![order_id, "note"];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! args {
    ($($arg:expr),* $(,)?) => {
        [$($crate::Arg::from(&$arg)),*]
    };
}
