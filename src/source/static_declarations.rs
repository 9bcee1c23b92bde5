use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;

use super::DeclarationProvider;
use crate::{Callable, LockDeclaration, LockError, TypeDefaults, TypeName};

/// Map-backed `DeclarationProvider`, filled with a builder or from a JSON
/// manifest.
///
/// Callables are matched by signature (`Type::name(T1, T2)`), so the
/// manifest does not need to repeat key-part markings; those travel with
/// the `Callable` itself.
///
/// ## Manifest
///
/// ```json
/// {
///   "types": {
///     "Payments": {
///       "defaults": { "lock_manager": "payments" },
///       "locks": [{ "prefix": "payments" }]
///     }
///   },
///   "callables": {
///     "Payments::charge(u64, String)": [{ "prefix": "pay", "max_wait_ms": 200 }]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDeclarations {
    types: HashMap<TypeName, Vec<LockDeclaration>>,
    defaults: HashMap<TypeName, TypeDefaults>,
    callables: HashMap<String, Vec<LockDeclaration>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Manifest {
    types: BTreeMap<String, TypeEntry>,
    callables: BTreeMap<String, Vec<LockDeclaration>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct TypeEntry {
    defaults: Option<TypeDefaults>,
    locks: Vec<LockDeclaration>,
}

impl StaticDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load declarations from a JSON manifest.
    pub fn from_json(text: &str) -> Result<Self, LockError> {
        let manifest: Manifest = serde_json::from_str(text)?;
        let mut declarations = StaticDeclarations::new();

        for (ty, entry) in manifest.types {
            let ty = TypeName::from(ty);
            if let Some(defaults) = entry.defaults {
                declarations.defaults.insert(ty.clone(), defaults);
            }
            if !entry.locks.is_empty() {
                declarations.types.insert(ty, entry.locks);
            }
        }
        for (signature, locks) in manifest.callables {
            if !signature.contains("::") || !signature.ends_with(')') {
                return Err(LockError::Manifest(format!(
                    "'{}' is not a callable signature (expected Type::name(T1, T2))",
                    signature
                )));
            }
            declarations.callables.insert(signature, locks);
        }

        Ok(declarations)
    }

    /// Declare a lock on every operation of `ty`.
    pub fn on_type(mut self, ty: impl Into<TypeName>, declaration: LockDeclaration) -> Self {
        self.types.entry(ty.into()).or_default().push(declaration);
        self
    }

    /// Declare a lock on one callable.
    pub fn on_callable(mut self, callable: &Callable, declaration: LockDeclaration) -> Self {
        self.callables
            .entry(callable.signature())
            .or_default()
            .push(declaration);
        self
    }

    /// Set the type-level component defaults for `ty`.
    pub fn defaults(mut self, ty: impl Into<TypeName>, defaults: TypeDefaults) -> Self {
        self.defaults.insert(ty.into(), defaults);
        self
    }
}

impl DeclarationProvider for StaticDeclarations {
    fn type_declarations(&self, ty: &TypeName) -> Result<Vec<LockDeclaration>, LockError> {
        Ok(self.types.get(ty).cloned().unwrap_or_default())
    }

    fn callable_declarations(
        &self,
        callable: &Callable,
    ) -> Result<Vec<LockDeclaration>, LockError> {
        Ok(self
            .callables
            .get(&callable.signature())
            .cloned()
            .unwrap_or_default())
    }

    fn type_defaults(&self, ty: &TypeName) -> Result<Option<TypeDefaults>, LockError> {
        Ok(self.defaults.get(ty).cloned())
    }
}
