use std::sync::Arc;

use dashmap::DashMap;

use super::{Arg, KeyGenerator};
use crate::{Callable, LockError, TypeName};

/// Default key generator: joins the key-part arguments with `_`, in
/// parameter order, behind an optional `prefix_`.
///
/// `(prefix "pay", args [42, "x"], key part {0})` yields `pay_42`. Key-part
/// positions are computed once per (callable, target type) and cached.
#[derive(Debug, Default)]
pub struct SimpleKeyGenerator {
    positions: DashMap<(Callable, TypeName), Arc<[usize]>>,
}

impl SimpleKeyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    fn key_positions(&self, target: &TypeName, callable: &Callable) -> Arc<[usize]> {
        let cache_key = (callable.clone(), target.clone());
        if let Some(positions) = self.positions.get(&cache_key) {
            return Arc::clone(&positions);
        }
        let positions: Arc<[usize]> = Arc::from(callable.key_positions());
        self.positions.insert(cache_key, Arc::clone(&positions));
        positions
    }
}

impl KeyGenerator for SimpleKeyGenerator {
    fn generate(
        &self,
        target: &TypeName,
        callable: &Callable,
        prefix: &str,
        args: &[Arg<'_>],
    ) -> Result<String, LockError> {
        let positions = self.key_positions(target, callable);
        if positions.is_empty() {
            return Err(LockError::MissingKeyParameter {
                callable: callable.signature(),
            });
        }

        let mut parts = Vec::with_capacity(positions.len());
        for &index in positions.iter() {
            let param = callable.params()[index].name();
            let value = args
                .get(index)
                .ok_or_else(|| {
                    LockError::InvalidArgument(format!(
                        "missing argument '{}' at position {} of {}",
                        param,
                        index,
                        callable.signature()
                    ))
                })?
                .value()
                .ok_or_else(|| {
                    LockError::InvalidArgument(format!(
                        "key argument '{}' of {} must not be null",
                        param,
                        callable.signature()
                    ))
                })?;
            parts.push(value.to_string());
        }

        let joined = parts.join("_");
        if prefix.trim().is_empty() {
            Ok(joined)
        } else {
            Ok(format!("{}_{}", prefix, joined))
        }
    }
}
