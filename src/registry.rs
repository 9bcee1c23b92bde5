//! Named lookup of key generators and lock managers.
//!
//! Declarations reference components by name (`key_generator = "tenant_keys"`,
//! `lock_manager = "payments"`). The registry is filled once at startup and
//! then shared read-only by the engine.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::{KeyGenerator, LockError, LockManager};

/// Registry name of the process-wide default lock manager.
pub const DEFAULT_LOCK_MANAGER: &str = "distlock.default_lock_manager";

/// What a registered component can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    KeyGenerator,
    LockManager,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::KeyGenerator => f.write_str("key generator"),
            Capability::LockManager => f.write_str("lock manager"),
        }
    }
}

/// A registered component instance.
#[derive(Clone)]
pub enum Component {
    KeyGenerator(Arc<dyn KeyGenerator>),
    LockManager(Arc<dyn LockManager>),
}

impl Component {
    pub fn capability(&self) -> Capability {
        match self {
            Component::KeyGenerator(_) => Capability::KeyGenerator,
            Component::LockManager(_) => Capability::LockManager,
        }
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component({})", self.capability())
    }
}

/// Map-backed component registry.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use distlock::{ComponentRegistry, InMemoryStore, LockSettings, StoreLockManager, DEFAULT_LOCK_MANAGER};
///
/// let registry = ComponentRegistry::new()
///     .with_lock_manager(
///         DEFAULT_LOCK_MANAGER,
///         Arc::new(StoreLockManager::new(InMemoryStore::new(), LockSettings::default()).unwrap()),
///     );
/// assert!(registry.lock_manager(DEFAULT_LOCK_MANAGER).is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    components: HashMap<String, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under `name`, replacing any previous entry.
    ///
    /// Returns `self` for chaining.
    pub fn register(mut self, name: &str, component: Component) -> Self {
        self.components.insert(name.to_string(), component);
        self
    }

    pub fn with_key_generator(self, name: &str, generator: Arc<dyn KeyGenerator>) -> Self {
        self.register(name, Component::KeyGenerator(generator))
    }

    pub fn with_lock_manager(self, name: &str, manager: Arc<dyn LockManager>) -> Self {
        self.register(name, Component::LockManager(manager))
    }

    /// Look up `name`, requiring it to provide `capability`.
    pub fn lookup(&self, name: &str, capability: Capability) -> Result<&Component, LockError> {
        self.components
            .get(name)
            .filter(|component| component.capability() == capability)
            .ok_or_else(|| not_found(name, capability))
    }

    pub fn key_generator(&self, name: &str) -> Result<Arc<dyn KeyGenerator>, LockError> {
        match self.lookup(name, Capability::KeyGenerator)? {
            Component::KeyGenerator(generator) => Ok(Arc::clone(generator)),
            Component::LockManager(_) => Err(not_found(name, Capability::KeyGenerator)),
        }
    }

    pub fn lock_manager(&self, name: &str) -> Result<Arc<dyn LockManager>, LockError> {
        match self.lookup(name, Capability::LockManager)? {
            Component::LockManager(manager) => Ok(Arc::clone(manager)),
            Component::KeyGenerator(_) => Err(not_found(name, Capability::LockManager)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

fn not_found(name: &str, capability: Capability) -> LockError {
    LockError::NoSuchComponent {
        name: name.to_string(),
        capability,
    }
}
