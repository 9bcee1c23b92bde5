use std::collections::HashMap;

use super::{Callable, TypeName};

/// Maps a possibly indirect callable handle to the callable that carries
/// declarations.
///
/// `most_specific` answers "which implementation runs for this target type"
/// (an operation invoked through an interface may be configured on the
/// implementing type). `bridged` maps a bridge artifact back to the callable
/// it forwards to.
pub trait CallableNormalizer: Send + Sync {
    fn most_specific(&self, callable: &Callable, target: &TypeName) -> Callable;

    fn bridged(&self, callable: &Callable) -> Callable;
}

/// Normalizer for code without interface/implementation splits or bridges:
/// every callable is already canonical.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl CallableNormalizer for IdentityNormalizer {
    fn most_specific(&self, callable: &Callable, _target: &TypeName) -> Callable {
        callable.clone()
    }

    fn bridged(&self, callable: &Callable) -> Callable {
        callable.clone()
    }
}

/// Explicit table of implementation overrides and bridge mappings.
///
/// ```
/// use distlock::{Callable, CallableNormalizer, OverrideTable, TypeName};
///
/// let charge = Callable::new("Billing", "charge").key_param("id", "u64");
/// let table = OverrideTable::new().implementation(charge.declared_on("StripeBilling"));
///
/// let specific = table.most_specific(&charge, &TypeName::new("StripeBilling"));
/// assert_eq!(specific.declaring_type().as_str(), "StripeBilling");
/// ```
#[derive(Debug, Clone, Default)]
pub struct OverrideTable {
    implementations: HashMap<TypeName, Vec<Callable>>,
    bridges: HashMap<Callable, Callable>,
}

impl OverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register that `callable.declaring_type()` provides its own version of
    /// `callable`'s signature.
    pub fn implementation(mut self, callable: Callable) -> Self {
        self.implementations
            .entry(callable.declaring_type().clone())
            .or_default()
            .push(callable);
        self
    }

    /// Register `bridge` as a forwarding artifact for `original`.
    pub fn bridge(mut self, bridge: Callable, original: Callable) -> Self {
        self.bridges.insert(bridge, original);
        self
    }
}

impl CallableNormalizer for OverrideTable {
    fn most_specific(&self, callable: &Callable, target: &TypeName) -> Callable {
        if callable.declaring_type() == target {
            return callable.clone();
        }
        self.implementations
            .get(target)
            .and_then(|candidates| {
                candidates
                    .iter()
                    .find(|candidate| candidate.same_signature(callable))
            })
            .cloned()
            .unwrap_or_else(|| callable.clone())
    }

    fn bridged(&self, callable: &Callable) -> Callable {
        self.bridges
            .get(callable)
            .cloned()
            .unwrap_or_else(|| callable.clone())
    }
}
