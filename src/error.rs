use thiserror::Error;

use crate::lock::StoreError;
use crate::registry::Capability;

/// Error type for lock resolution, key generation and acquisition.
#[derive(Debug, Error)]
pub enum LockError {
    /// A lock declaration is malformed (e.g. both a literal key and a key generator).
    #[error("invalid lock definition on '{target}': {reason}")]
    Definition { target: String, reason: String },
    /// A key generator was required but no parameter contributes to the key.
    #[error(
        "'{callable}' must mark at least one parameter as a key part, or specify a literal key instead"
    )]
    MissingKeyParameter { callable: String },
    /// A key-contributing argument was absent or out of range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A named component could not be found in the registry.
    #[error("no {capability} registered under '{name}'")]
    NoSuchComponent { name: String, capability: Capability },
    /// Lock acquisition did not succeed within the wait budget.
    #[error("lock not acquired for key '{key}'")]
    NotAcquired { key: String },
    /// Settings could not be parsed or contain an invalid value.
    #[error("invalid lock settings: {0}")]
    Settings(String),
    /// A declaration manifest could not be parsed.
    #[error("invalid declaration manifest: {0}")]
    Manifest(String),
    /// The backing store failed outside of the retry loop (e.g. on release).
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LockError {
    pub(crate) fn definition(target: impl Into<String>, reason: impl Into<String>) -> Self {
        LockError::Definition {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error reports a lock that was not acquired, as opposed to
    /// a misconfiguration or a backend fault.
    pub fn is_not_acquired(&self) -> bool {
        matches!(self, LockError::NotAcquired { .. })
    }
}

impl From<toml::de::Error> for LockError {
    fn from(err: toml::de::Error) -> Self {
        LockError::Settings(err.to_string())
    }
}

impl From<serde_json::Error> for LockError {
    fn from(err: serde_json::Error) -> Self {
        LockError::Manifest(err.to_string())
    }
}
