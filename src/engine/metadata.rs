use std::sync::Arc;

use dashmap::DashMap;

use crate::{Callable, ComponentRegistry, KeyGenerator, LockConfiguration, LockError, LockManager, TypeName};

/// Concrete components for one configuration on one callable.
#[derive(Clone)]
pub struct ResolvedMetadata {
    key_generator: Arc<dyn KeyGenerator>,
    lock_manager: Arc<dyn LockManager>,
}

impl ResolvedMetadata {
    pub fn key_generator(&self) -> &dyn KeyGenerator {
        self.key_generator.as_ref()
    }

    pub fn lock_manager(&self) -> &dyn LockManager {
        self.lock_manager.as_ref()
    }
}

/// Cache key, ordered by configuration name first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct MetadataKey {
    config: LockConfiguration,
    callable: Callable,
    target: TypeName,
}

/// Resolves and memoizes the key generator and lock manager of each
/// (configuration, callable, target type).
///
/// Named references are looked up in the registry; unnamed ones fall back to
/// the process defaults. Entries live as long as the cache.
pub struct MetadataCache {
    registry: Arc<ComponentRegistry>,
    default_key_generator: Arc<dyn KeyGenerator>,
    default_lock_manager: Arc<dyn LockManager>,
    entries: DashMap<MetadataKey, ResolvedMetadata>,
}

impl MetadataCache {
    pub fn new(
        registry: Arc<ComponentRegistry>,
        default_key_generator: Arc<dyn KeyGenerator>,
        default_lock_manager: Arc<dyn LockManager>,
    ) -> Self {
        MetadataCache {
            registry,
            default_key_generator,
            default_lock_manager,
            entries: DashMap::with_capacity(1024),
        }
    }

    pub fn resolve(
        &self,
        config: &LockConfiguration,
        callable: &Callable,
        target: &TypeName,
    ) -> Result<ResolvedMetadata, LockError> {
        let cache_key = MetadataKey {
            config: config.clone(),
            callable: callable.clone(),
            target: target.clone(),
        };
        if let Some(metadata) = self.entries.get(&cache_key) {
            return Ok(metadata.clone());
        }

        // A literal key never calls the generator, but one is still resolved
        // so every entry has the same shape.
        let key_generator = match config.key_generator() {
            Some(name) => self.registry.key_generator(name)?,
            None => Arc::clone(&self.default_key_generator),
        };
        let lock_manager = match config.lock_manager() {
            Some(name) => self.registry.lock_manager(name)?,
            None => Arc::clone(&self.default_lock_manager),
        };

        let metadata = ResolvedMetadata {
            key_generator,
            lock_manager,
        };
        self.entries.insert(cache_key, metadata.clone());
        Ok(metadata)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
