//! Where lock configurations come from.
//!
//! Declarations are surfaced by `DeclarationProvider`s (the discovery layer),
//! turned into validated `LockConfiguration`s by a `ConfigSource`, and
//! resolved per call with precedence and caching by `FallbackResolver`.

mod config_source;
mod provider;
mod resolver;
mod static_declarations;

pub use config_source::{ConfigSource, DeclaredConfigSource};
pub use provider::DeclarationProvider;
pub use resolver::FallbackResolver;
pub use static_declarations::StaticDeclarations;
