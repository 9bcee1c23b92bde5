mod engine;
mod error;
mod guard;
mod metadata;

pub use engine::{LockEngine, LockEngineBuilder};
pub use error::InvocationError;
pub use guard::LockGuard;
pub use metadata::{MetadataCache, ResolvedMetadata};
