mod configuration;
mod declaration;

pub use configuration::{FailureAction, LockConfiguration};
pub use declaration::{LockDeclaration, TypeDefaults, DEFAULT_MAX_WAIT};

/// Blank strings count as "not set", matching how declarations are written.
pub(crate) fn text(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|s| !s.trim().is_empty()).cloned()
}
