//! LockEngine: runs intercepted calls under their declared lock.
//!
//! The interception layer (a proxy, a macro, a hand-written wrapper) hands
//! each call to `LockEngine::execute` as a closure plus the identity of the
//! operation and its arguments. The engine decides whether a lock applies,
//! derives the key, acquires, runs, releases, and applies the configured
//! failure action when the lock is not granted.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use distlock::{
//!     args, Callable, ComponentRegistry, DeclaredConfigSource, InMemoryStore, LockDeclaration,
//!     LockEngine, LockSettings, StaticDeclarations, StoreLockManager, TypeName,
//! };
//!
//! let charge = Callable::new("Payments", "charge").key_param("order_id", "u64");
//! let declarations =
//!     StaticDeclarations::new().on_callable(&charge, LockDeclaration::new().prefix("pay"));
//!
//! let engine = LockEngine::builder(DeclaredConfigSource::new(declarations))
//!     .default_lock_manager(Arc::new(StoreLockManager::new(
//!         InMemoryStore::new(),
//!         LockSettings::default(),
//!     ).unwrap()))
//!     .build()
//!     .unwrap();
//!
//! let order_id = 42u64;
//! let charged = engine
//!     .execute(
//!         || Ok::<_, std::io::Error>("charged"),
//!         &TypeName::new("Payments"),
//!         &charge,
//!         &args![order_id],
//!     )
//!     .unwrap();
//! assert_eq!(charged, Some("charged"));
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use super::{InvocationError, LockGuard, MetadataCache};
use crate::{
    Arg, Callable, CallableNormalizer, ComponentRegistry, ConfigSource, FailureAction,
    FallbackResolver, KeyGenerator, LockError, LockManager, SimpleKeyGenerator, TypeName,
    DEFAULT_LOCK_MANAGER,
};

/// Orchestrates resolution, key generation, acquisition and release.
///
/// Stateless per call; the only state is the resolver and metadata caches,
/// which are safe to share across threads.
pub struct LockEngine<S> {
    resolver: FallbackResolver<S>,
    metadata: MetadataCache,
}

impl<S: ConfigSource> LockEngine<S> {
    pub fn builder(source: S) -> LockEngineBuilder<S> {
        LockEngineBuilder {
            source,
            registry: ComponentRegistry::new(),
            normalizer: None,
            default_key_generator: None,
            default_lock_manager: None,
        }
    }

    pub fn resolver(&self) -> &FallbackResolver<S> {
        &self.resolver
    }

    pub fn metadata(&self) -> &MetadataCache {
        &self.metadata
    }

    /// Whether calls to `callable` on `target` run under a lock.
    pub fn requires_lock(&self, callable: &Callable, target: &TypeName) -> Result<bool, LockError> {
        Ok(self.resolver.resolve(callable, target)?.is_some())
    }

    /// Run `invocation` under the lock declared for `callable`.
    ///
    /// Returns `Ok(Some(value))` when the call ran, `Ok(None)` when the lock
    /// was not acquired and the failure action is `ReturnNone`. Only the
    /// first declared configuration is honored.
    pub fn execute<T, E, F>(
        &self,
        invocation: F,
        target: &TypeName,
        callable: &Callable,
        args: &[Arg<'_>],
    ) -> Result<Option<T>, InvocationError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        let configs = self.resolver.resolve(callable, target)?;
        let Some(config) = configs.as_deref().and_then(<[_]>::first) else {
            trace!(%callable, "no lock required");
            return invoke(invocation);
        };

        let metadata = self.metadata.resolve(config, callable, target)?;
        let key = match config.key() {
            Some(key) => key.to_string(),
            None => metadata
                .key_generator()
                .generate(target, callable, config.prefix(), args)?,
        };

        let manager = metadata.lock_manager();
        if manager.acquire(&key, config.max_wait())? {
            let _guard = LockGuard::new(manager, key);
            return invoke(invocation);
        }

        debug!(%callable, %key, action = ?config.on_failure(), "lock not acquired");
        match config.on_failure() {
            FailureAction::Execute => invoke(invocation),
            FailureAction::ReturnNone => Ok(None),
            FailureAction::Throw => Err(LockError::NotAcquired { key }.into()),
        }
    }
}

fn invoke<T, E, F>(invocation: F) -> Result<Option<T>, InvocationError<E>>
where
    F: FnOnce() -> Result<T, E>,
{
    invocation().map(Some).map_err(InvocationError::Failed)
}

/// Builder for `LockEngine`.
///
/// The default lock manager is the one passed to `default_lock_manager`, or
/// else the registry entry named `DEFAULT_LOCK_MANAGER`. The default key
/// generator is `SimpleKeyGenerator` unless overridden.
pub struct LockEngineBuilder<S> {
    source: S,
    registry: ComponentRegistry,
    normalizer: Option<Arc<dyn CallableNormalizer>>,
    default_key_generator: Option<Arc<dyn KeyGenerator>>,
    default_lock_manager: Option<Arc<dyn LockManager>>,
}

impl<S: ConfigSource> LockEngineBuilder<S> {
    /// Components that declarations may reference by name.
    pub fn registry(mut self, registry: ComponentRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn normalizer(mut self, normalizer: impl CallableNormalizer + 'static) -> Self {
        self.normalizer = Some(Arc::new(normalizer));
        self
    }

    pub fn default_key_generator(mut self, generator: Arc<dyn KeyGenerator>) -> Self {
        self.default_key_generator = Some(generator);
        self
    }

    pub fn default_lock_manager(mut self, manager: Arc<dyn LockManager>) -> Self {
        self.default_lock_manager = Some(manager);
        self
    }

    pub fn build(self) -> Result<LockEngine<S>, LockError> {
        let default_lock_manager = match self.default_lock_manager {
            Some(manager) => manager,
            None => self.registry.lock_manager(DEFAULT_LOCK_MANAGER).map_err(|_| {
                LockError::definition(
                    "LockEngine",
                    format!(
                        "no default lock manager: pass one to the builder or register it as '{}'",
                        DEFAULT_LOCK_MANAGER
                    ),
                )
            })?,
        };
        let default_key_generator = self
            .default_key_generator
            .unwrap_or_else(|| Arc::new(SimpleKeyGenerator::new()));

        let mut resolver = FallbackResolver::new(self.source);
        if let Some(normalizer) = self.normalizer {
            resolver = resolver.with_shared_normalizer(normalizer);
        }

        Ok(LockEngine {
            resolver,
            metadata: MetadataCache::new(
                Arc::new(self.registry),
                default_key_generator,
                default_lock_manager,
            ),
        })
    }
}
