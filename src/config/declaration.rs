use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::FailureAction;

/// Wait budget used when a declaration does not give one.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(5000);

/// A lock intent as declared on a callable or a type, before defaults and
/// validation. Produced by a `DeclarationProvider`.
///
/// ```
/// use std::time::Duration;
/// use distlock::{FailureAction, LockDeclaration};
///
/// let declaration = LockDeclaration::new()
///     .prefix("pay")
///     .max_wait(Duration::from_millis(200))
///     .on_failure(FailureAction::ReturnNone);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LockDeclaration {
    pub(crate) key: Option<String>,
    pub(crate) prefix: Option<String>,
    pub(crate) key_generator: Option<String>,
    pub(crate) lock_manager: Option<String>,
    pub(crate) max_wait_ms: Option<u64>,
    pub(crate) on_failure: Option<FailureAction>,
}

impl LockDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a fixed key instead of generating one from arguments.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Registry name of the key generator to use.
    pub fn key_generator(mut self, name: impl Into<String>) -> Self {
        self.key_generator = Some(name.into());
        self
    }

    /// Registry name of the lock manager to use.
    pub fn lock_manager(mut self, name: impl Into<String>) -> Self {
        self.lock_manager = Some(name.into());
        self
    }

    pub fn max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait_ms = Some(max_wait.as_millis() as u64);
        self
    }

    pub fn on_failure(mut self, action: FailureAction) -> Self {
        self.on_failure = Some(action);
        self
    }

    pub(crate) fn resolved_max_wait_ms(&self) -> u64 {
        self.max_wait_ms
            .unwrap_or(DEFAULT_MAX_WAIT.as_millis() as u64)
    }
}

/// Type-level defaults for the component references of every declaration
/// found on (or under) a type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeDefaults {
    pub(crate) key_generator: Option<String>,
    pub(crate) lock_manager: Option<String>,
}

impl TypeDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_generator(mut self, name: impl Into<String>) -> Self {
        self.key_generator = Some(name.into());
        self
    }

    pub fn lock_manager(mut self, name: impl Into<String>) -> Self {
        self.lock_manager = Some(name.into());
        self
    }
}
