use async_trait::async_trait;
use redis::{AsyncCommands, aio::ConnectionManager};
use std::time::Duration;
use tracing::info;

use super::{RateLimitError, RateLimitStore};

/// Redis-backed attempt counter shared across API instances. The
/// window is enforced with a key TTL, so eviction is Redis's problem.
pub struct RedisRateLimitStore {
    conn: ConnectionManager,
    max_attempts: u32,
    window: Duration,
}

impl RedisRateLimitStore {
    pub async fn connect(
        url: &str,
        max_attempts: u32,
        window: Duration,
    ) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_connection_manager().await?;
        info!("Connected to Redis rate-limit store");
        Ok(Self {
            conn,
            max_attempts,
            window,
        })
    }

    fn redis_key(key: &str) -> String {
        format!("ratelimit:{key}")
    }
}

#[async_trait]
impl RateLimitStore for RedisRateLimitStore {
    async fn is_limited(&self, key: &str) -> Result<bool, RateLimitError> {
        let mut conn = self.conn.clone();
        let attempts: Option<u32> = conn.get(Self::redis_key(key)).await?;
        Ok(attempts.unwrap_or(0) >= self.max_attempts)
    }

    async fn record_failure(&self, key: &str) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();
        let key = Self::redis_key(key);
        let _: i64 = conn.incr(&key, 1i64).await?;
        // Trailing window: every failure restarts the TTL.
        let _: bool = conn.expire(&key, self.window.as_secs() as i64).await?;
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), RateLimitError> {
        let mut conn = self.conn.clone();
        let _: i64 = conn.del(Self::redis_key(key)).await?;
        Ok(())
    }
}
