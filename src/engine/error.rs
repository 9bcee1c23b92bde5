use thiserror::Error;

use crate::LockError;

/// Outcome of a guarded call that did not produce a value.
///
/// `Failed` carries the wrapped call's own error untouched, after the lock
/// (if any) has been released. `Lock` is everything the locking layer itself
/// raised: definition errors, invalid key arguments, and `NotAcquired` for
/// the THROW failure action.
#[derive(Debug, Error)]
pub enum InvocationError<E> {
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("{0}")]
    Failed(E),
}

impl<E> InvocationError<E> {
    /// The wrapped call's error, if that is what failed.
    pub fn into_failed(self) -> Option<E> {
        match self {
            InvocationError::Failed(err) => Some(err),
            InvocationError::Lock(_) => None,
        }
    }

    pub fn as_lock(&self) -> Option<&LockError> {
        match self {
            InvocationError::Lock(err) => Some(err),
            InvocationError::Failed(_) => None,
        }
    }

    pub fn is_not_acquired(&self) -> bool {
        self.as_lock().is_some_and(LockError::is_not_acquired)
    }
}
