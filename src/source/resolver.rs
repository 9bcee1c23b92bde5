use std::sync::Arc;

use dashmap::DashMap;
use tracing::debug;

use super::ConfigSource;
use crate::{Callable, CallableNormalizer, IdentityNormalizer, LockConfiguration, LockError, TypeName};

type CacheKey = (Callable, TypeName);

/// Resolves the effective lock configurations of a callable on a target type.
///
/// Precedence, most specific first:
///
/// 1. declarations on the most specific callable for the target type
///    (after bridge resolution);
/// 2. declarations on that callable's declaring type, for user-level
///    callables only;
/// 3. if the specific callable differs from the invoked one, the same two
///    steps against the invoked callable.
///
/// Results are cached per (callable, target type) for the life of the
/// resolver, including the "nothing declared" outcome. Definition errors
/// are not cached and surface on every call.
pub struct FallbackResolver<S> {
    source: S,
    normalizer: Arc<dyn CallableNormalizer>,
    cache: DashMap<CacheKey, Option<Arc<[LockConfiguration]>>>,
}

impl<S: ConfigSource> FallbackResolver<S> {
    pub fn new(source: S) -> Self {
        FallbackResolver {
            source,
            normalizer: Arc::new(IdentityNormalizer),
            cache: DashMap::with_capacity(1024),
        }
    }

    /// Use `normalizer` to find most specific and bridged callables.
    pub fn with_normalizer(self, normalizer: impl CallableNormalizer + 'static) -> Self {
        self.with_shared_normalizer(Arc::new(normalizer))
    }

    pub fn with_shared_normalizer(mut self, normalizer: Arc<dyn CallableNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// The lock configurations for `callable` invoked on `target`, or `None`
    /// if it needs no lock. A returned list is never empty.
    pub fn resolve(
        &self,
        callable: &Callable,
        target: &TypeName,
    ) -> Result<Option<Arc<[LockConfiguration]>>, LockError> {
        if callable.is_base() {
            return Ok(None);
        }

        let cache_key = (callable.clone(), target.clone());
        if let Some(cached) = self.cache.get(&cache_key) {
            return Ok(cached.clone());
        }

        // An empty list means nothing to lock, same as no list.
        let configs = self
            .compute(callable, target)?
            .filter(|configs| !configs.is_empty())
            .map(Arc::<[LockConfiguration]>::from);
        if let Some(configs) = &configs {
            debug!(%callable, %target, ?configs, "adding lock operation");
        }
        self.cache.insert(cache_key, configs.clone());
        Ok(configs)
    }

    /// Number of (callable, target) pairs resolved so far.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    fn compute(
        &self,
        callable: &Callable,
        target: &TypeName,
    ) -> Result<Option<Vec<LockConfiguration>>, LockError> {
        if self.source.public_only() && !callable.is_public() {
            return Ok(None);
        }

        // The callable may be declared on an interface while the target type
        // carries the declarations.
        let specific = self
            .normalizer
            .bridged(&self.normalizer.most_specific(callable, target));

        if let Some(configs) = self.find(&specific, callable)? {
            return Ok(Some(configs));
        }

        if specific != *callable {
            if let Some(configs) = self.find(callable, callable)? {
                return Ok(Some(configs));
            }
        }

        Ok(None)
    }

    /// Callable-level declarations, else type-level ones when `invoked` is
    /// user-level code.
    fn find(
        &self,
        candidate: &Callable,
        invoked: &Callable,
    ) -> Result<Option<Vec<LockConfiguration>>, LockError> {
        if let Some(configs) = self.source.callable_configs(candidate)? {
            return Ok(Some(configs));
        }
        match self.source.type_configs(candidate.declaring_type())? {
            Some(configs) if invoked.is_user_level() => Ok(Some(configs)),
            _ => Ok(None),
        }
    }
}
