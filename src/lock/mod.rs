mod error;
mod in_memory;
mod lock_manager;
#[cfg(feature = "redis")]
mod redis_store;
mod store;
mod store_manager;

pub use error::StoreError;
pub use in_memory::InMemoryStore;
pub use lock_manager::LockManager;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use store::LockStore;
pub use store_manager::{StoreLockManager, LOCK_MARKER};
