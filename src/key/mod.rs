//! Lock key derivation from call arguments.

mod simple;

pub use simple::SimpleKeyGenerator;

use std::fmt;

use crate::{Callable, LockError, TypeName};

/// One call argument as seen by a key generator: a displayable value, or
/// nothing (the argument was absent).
#[derive(Clone, Copy)]
pub struct Arg<'a>(Option<&'a dyn fmt::Display>);

impl<'a> Arg<'a> {
    /// An absent argument.
    pub fn null() -> Self {
        Arg(None)
    }

    pub fn value(&self) -> Option<&'a dyn fmt::Display> {
        self.0
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }
}

impl<'a, T: fmt::Display + 'a> From<&'a T> for Arg<'a> {
    fn from(value: &'a T) -> Self {
        Arg(Some(value))
    }
}

impl<'a, T: fmt::Display + 'a> From<Option<&'a T>> for Arg<'a> {
    fn from(value: Option<&'a T>) -> Self {
        Arg(value.map(|v| v as &dyn fmt::Display))
    }
}

impl fmt::Debug for Arg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "Arg({})", value),
            None => f.write_str("Arg(null)"),
        }
    }
}

/// Builds a lock key from the target type, the callable, a prefix and the
/// call's arguments.
///
/// Implementations are registered by name in a `ComponentRegistry` and
/// selected per declaration; `SimpleKeyGenerator` is the process default.
pub trait KeyGenerator: Send + Sync {
    fn generate(
        &self,
        target: &TypeName,
        callable: &Callable,
        prefix: &str,
        args: &[Arg<'_>],
    ) -> Result<String, LockError>;
}
