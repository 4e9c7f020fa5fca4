use async_trait::async_trait;
use thiserror::Error;

pub mod memory;
pub mod redis;

pub use self::memory::MemoryRateLimitStore;
pub use self::redis::RedisRateLimitStore;

#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),
}

/// Counts failed redemption attempts per (client, code) key over a
/// trailing window. Injected so the API can run against a process-local
/// store in tests and a shared cache in production; both backends evict
/// stale entries instead of growing without bound.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// True once the key has accumulated the configured number of
    /// failures inside the window.
    async fn is_limited(&self, key: &str) -> Result<bool, RateLimitError>;

    /// Records one failed attempt and restarts the key's window.
    async fn record_failure(&self, key: &str) -> Result<(), RateLimitError>;

    /// Drops the key's counter, e.g. after a successful redemption.
    async fn clear(&self, key: &str) -> Result<(), RateLimitError>;
}
