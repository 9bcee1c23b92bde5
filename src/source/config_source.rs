use std::sync::Arc;

use tracing::trace;

use super::DeclarationProvider;
use crate::{Callable, LockConfiguration, LockDeclaration, LockError, TypeName};

/// Source of validated lock configurations for callables and types.
///
/// `None` means "nothing declared here", which is distinct from a
/// definition error.
pub trait ConfigSource: Send + Sync {
    fn callable_configs(
        &self,
        callable: &Callable,
    ) -> Result<Option<Vec<LockConfiguration>>, LockError>;

    fn type_configs(&self, ty: &TypeName) -> Result<Option<Vec<LockConfiguration>>, LockError>;

    /// Whether only public callables may be locked.
    fn public_only(&self) -> bool {
        true
    }
}

/// `ConfigSource` over any number of `DeclarationProvider`s.
///
/// Results from all providers are concatenated in registration order. Each
/// provider's declarations are completed with that provider's type defaults
/// for the declaring type, then validated.
#[derive(Clone)]
pub struct DeclaredConfigSource {
    providers: Vec<Arc<dyn DeclarationProvider>>,
    public_only: bool,
}

impl DeclaredConfigSource {
    pub fn new(provider: impl DeclarationProvider + 'static) -> Self {
        DeclaredConfigSource {
            providers: vec![Arc::new(provider)],
            public_only: true,
        }
    }

    /// Add another provider. Returns `self` for chaining.
    pub fn with_provider(mut self, provider: impl DeclarationProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Allow private callables to be locked too.
    pub fn allow_private(mut self) -> Self {
        self.public_only = false;
        self
    }

    fn collect<F>(
        &self,
        owner: &TypeName,
        name: &str,
        declarations: F,
    ) -> Result<Option<Vec<LockConfiguration>>, LockError>
    where
        F: Fn(&dyn DeclarationProvider) -> Result<Vec<LockDeclaration>, LockError>,
    {
        let mut configs = Vec::new();
        for provider in &self.providers {
            let declared = declarations(provider.as_ref())?;
            if declared.is_empty() {
                continue;
            }
            let defaults = provider.type_defaults(owner)?;
            for declaration in &declared {
                configs.push(LockConfiguration::from_declaration(
                    name,
                    declaration,
                    defaults.as_ref(),
                )?);
            }
        }

        if configs.is_empty() {
            trace!(target_name = name, "no lock declared");
            Ok(None)
        } else {
            Ok(Some(configs))
        }
    }
}

impl ConfigSource for DeclaredConfigSource {
    fn callable_configs(
        &self,
        callable: &Callable,
    ) -> Result<Option<Vec<LockConfiguration>>, LockError> {
        self.collect(
            callable.declaring_type(),
            &callable.signature(),
            |provider| provider.callable_declarations(callable),
        )
    }

    fn type_configs(&self, ty: &TypeName) -> Result<Option<Vec<LockConfiguration>>, LockError> {
        self.collect(ty, ty.as_str(), |provider| provider.type_declarations(ty))
    }

    fn public_only(&self) -> bool {
        self.public_only
    }
}
