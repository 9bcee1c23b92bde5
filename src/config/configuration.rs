use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{text, LockDeclaration, TypeDefaults};
use crate::LockError;

/// What to do when a lock cannot be acquired within its wait budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureAction {
    /// Run the operation anyway, without exclusivity.
    Execute,
    /// Fail with `LockError::NotAcquired` without running the operation.
    #[default]
    Throw,
    /// Skip the operation and return no value.
    #[serde(alias = "return_null")]
    ReturnNone,
}

/// One resolved, validated lock intent.
///
/// Built from a `LockDeclaration` the first time a callable is resolved,
/// then cached for the life of the process and never mutated. Field order
/// matters: `name` sorts first, so cache keys order by configuration name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LockConfiguration {
    name: String,
    key: Option<String>,
    key_generator: Option<String>,
    prefix: String,
    lock_manager: Option<String>,
    max_wait_ms: u64,
    on_failure: FailureAction,
}

impl LockConfiguration {
    /// Resolve a declaration against its type-level defaults and validate it.
    ///
    /// `name` identifies where the declaration was found (a callable
    /// signature or a type name).
    pub fn from_declaration(
        name: impl Into<String>,
        declaration: &LockDeclaration,
        defaults: Option<&TypeDefaults>,
    ) -> Result<Self, LockError> {
        let name = name.into();
        let key = text(&declaration.key);
        let mut key_generator = text(&declaration.key_generator);
        let mut lock_manager = text(&declaration.lock_manager);

        if let Some(defaults) = defaults {
            if key.is_none() && key_generator.is_none() {
                key_generator = text(&defaults.key_generator);
            }
            if lock_manager.is_none() {
                lock_manager = text(&defaults.lock_manager);
            }
        }

        if key.is_some() && key_generator.is_some() {
            return Err(LockError::definition(
                &name,
                "both 'key' and 'key_generator' are set; these are mutually exclusive: \
                 either give a literal key or name the key generator to use",
            ));
        }

        Ok(LockConfiguration {
            name,
            key,
            key_generator,
            prefix: declaration.prefix.clone().unwrap_or_default(),
            lock_manager,
            max_wait_ms: declaration.resolved_max_wait_ms(),
            on_failure: declaration.on_failure.unwrap_or_default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Literal key, if one was declared.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Registry name of the key generator, if one was declared.
    pub fn key_generator(&self) -> Option<&str> {
        self.key_generator.as_deref()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registry name of the lock manager, if one was declared.
    pub fn lock_manager(&self) -> Option<&str> {
        self.lock_manager.as_deref()
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }

    pub fn on_failure(&self) -> FailureAction {
        self.on_failure
    }
}
