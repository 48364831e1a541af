pub mod memory;
pub mod models;
pub mod redis_store;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryStore;
pub use redis_store::RedisStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Durable key-value namespace holding one serialized link record per code.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Overwrites any existing value.
    async fn put(&self, key: &str, value: String) -> StoreResult<()>;

    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Every key currently stored. Backends that page internally are drained
    /// before returning.
    async fn list(&self) -> StoreResult<Vec<String>>;
}
