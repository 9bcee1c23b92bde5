use crate::{Callable, LockDeclaration, LockError, TypeDefaults, TypeName};

/// Surfaces declared lock intents.
///
/// This is the seam to whatever discovers declarations: attribute macros,
/// a manifest file, a builder in `main`. Errors are structural (a malformed
/// declaration) and abort resolution; an operation without declarations
/// simply yields an empty list.
pub trait DeclarationProvider: Send + Sync {
    /// Declarations attached to the type itself, applying to all its operations.
    fn type_declarations(&self, ty: &TypeName) -> Result<Vec<LockDeclaration>, LockError>;

    /// Declarations attached directly to one callable.
    fn callable_declarations(&self, callable: &Callable)
        -> Result<Vec<LockDeclaration>, LockError>;

    /// Type-level defaults for component references, if the type declares any.
    fn type_defaults(&self, ty: &TypeName) -> Result<Option<TypeDefaults>, LockError> {
        let _ = ty;
        Ok(None)
    }
}
