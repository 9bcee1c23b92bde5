//! Identity of interceptable operations.
//!
//! A `Callable` is the pair (declaring type, signature) that lock
//! declarations attach to. The discovery layer that builds these values is
//! outside this crate; it only needs to hand over the same `Callable` for the
//! same logical operation so the resolver caches stay effective.

mod normalizer;

pub use normalizer::{CallableNormalizer, IdentityNormalizer, OverrideTable};

use std::fmt;
use std::sync::Arc;

/// Reserved name of the universal base type. Operations declared on it are
/// never user behavior and never locked.
const BASE_TYPE: &str = "<base>";

/// A type identity. Cheap to clone, totally ordered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(Arc<str>);

impl TypeName {
    pub fn new(name: impl AsRef<str>) -> Self {
        TypeName(Arc::from(name.as_ref()))
    }

    /// The universal base type every type inherits from.
    pub fn base() -> Self {
        TypeName::new(BASE_TYPE)
    }

    pub fn is_base(&self) -> bool {
        &*self.0 == BASE_TYPE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        TypeName::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        TypeName(Arc::from(name))
    }
}

/// One declared parameter of a callable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Param {
    name: Arc<str>,
    type_name: Arc<str>,
    key_part: bool,
}

impl Param {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Whether the argument at this position contributes to the lock key.
    pub fn is_key_part(&self) -> bool {
        self.key_part
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// How a callable came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum CallableKind {
    /// Written by the user.
    #[default]
    Declared,
    /// A forwarding artifact that stands in for a declared callable with a
    /// different (e.g. erased) signature.
    Bridge,
    /// Generated by tooling; not user behavior.
    Synthetic,
}

/// An interceptable operation: declaring type plus signature.
///
/// ```
/// use distlock::Callable;
///
/// let charge = Callable::new("Payments", "charge")
///     .key_param("order_id", "u64")
///     .param("note", "String");
/// assert_eq!(charge.signature(), "Payments::charge(u64, String)");
/// assert_eq!(charge.key_positions(), vec![0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Callable {
    declaring_type: TypeName,
    name: Arc<str>,
    params: Arc<[Param]>,
    visibility: Visibility,
    kind: CallableKind,
}

impl Callable {
    pub fn new(declaring_type: impl Into<TypeName>, name: impl AsRef<str>) -> Self {
        Callable {
            declaring_type: declaring_type.into(),
            name: Arc::from(name.as_ref()),
            params: Arc::from(Vec::new()),
            visibility: Visibility::Public,
            kind: CallableKind::Declared,
        }
    }

    /// Append a parameter that does not contribute to the lock key.
    pub fn param(self, name: &str, type_name: &str) -> Self {
        self.push_param(name, type_name, false)
    }

    /// Append a parameter whose argument contributes to the lock key.
    pub fn key_param(self, name: &str, type_name: &str) -> Self {
        self.push_param(name, type_name, true)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_kind(mut self, kind: CallableKind) -> Self {
        self.kind = kind;
        self
    }

    /// The same signature re-declared on another type (e.g. an implementation
    /// of an interface operation).
    pub fn declared_on(&self, declaring_type: impl Into<TypeName>) -> Self {
        Callable {
            declaring_type: declaring_type.into(),
            ..self.clone()
        }
    }

    fn push_param(self, name: &str, type_name: &str, key_part: bool) -> Self {
        let mut params = self.params.to_vec();
        params.push(Param {
            name: Arc::from(name),
            type_name: Arc::from(type_name),
            key_part,
        });
        Callable {
            params: Arc::from(params),
            ..self
        }
    }

    pub fn declaring_type(&self) -> &TypeName {
        &self.declaring_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn kind(&self) -> CallableKind {
        self.kind
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }

    /// True for callables written by the user, false for bridges and
    /// synthetic artifacts.
    pub fn is_user_level(&self) -> bool {
        self.kind == CallableKind::Declared
    }

    /// Whether this callable is inherited from the universal base type.
    pub fn is_base(&self) -> bool {
        self.declaring_type.is_base()
    }

    /// Positions of key-contributing parameters, in declaration order.
    pub fn key_positions(&self) -> Vec<usize> {
        self.params
            .iter()
            .enumerate()
            .filter(|(_, param)| param.key_part)
            .map(|(index, _)| index)
            .collect()
    }

    /// Name and parameter types match, ignoring the declaring type.
    pub fn same_signature(&self, other: &Callable) -> bool {
        self.name == other.name
            && self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(other.params.iter())
                .all(|(a, b)| a.type_name == b.type_name)
    }

    /// `Type::name(T1, T2)`.
    pub fn signature(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}(", self.declaring_type, self.name)?;
        for (index, param) in self.params.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(&param.type_name)?;
        }
        f.write_str(")")
    }
}
