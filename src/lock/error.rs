use thiserror::Error;

/// Error type for lock store operations.
///
/// Store errors raised while acquiring are treated as a failed attempt and
/// retried within the wait budget; they only surface from `release`.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or rejected the command.
    #[error("lock store unavailable: {0}")]
    Unavailable(String),
    /// An in-process store primitive was poisoned (a thread panicked while holding it).
    #[error("lock store poisoned during {0}")]
    Poisoned(&'static str),
    #[cfg(feature = "redis")]
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
