use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{RateLimitError, RateLimitStore};

/// Process-local attempt counter. Entries older than the window are
/// treated as absent and swept once the map grows past a threshold, so
/// a burst of unique keys cannot pin memory forever.
pub struct MemoryRateLimitStore {
    entries: DashMap<String, Entry>,
    max_attempts: u32,
    window: Duration,
}

struct Entry {
    attempts: u32,
    last_attempt: Instant,
}

const SWEEP_THRESHOLD: usize = 1024;

impl MemoryRateLimitStore {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            max_attempts,
            window,
        }
    }

    fn sweep(&self) {
        let before = self.entries.len();
        let window = self.window;
        self.entries
            .retain(|_, entry| entry.last_attempt.elapsed() < window);
        debug!(evicted = before - self.entries.len(), "Swept rate-limit entries");
    }
}

#[async_trait]
impl RateLimitStore for MemoryRateLimitStore {
    async fn is_limited(&self, key: &str) -> Result<bool, RateLimitError> {
        let limited = self.entries.get(key).is_some_and(|entry| {
            entry.last_attempt.elapsed() < self.window && entry.attempts >= self.max_attempts
        });
        Ok(limited)
    }

    async fn record_failure(&self, key: &str) -> Result<(), RateLimitError> {
        if self.entries.len() >= SWEEP_THRESHOLD {
            self.sweep();
        }

        let now = Instant::now();
        self.entries
            .entry(key.to_string())
            .and_modify(|entry| {
                if entry.last_attempt.elapsed() >= self.window {
                    entry.attempts = 1;
                } else {
                    entry.attempts += 1;
                }
                entry.last_attempt = now;
            })
            .or_insert(Entry {
                attempts: 1,
                last_attempt: now,
            });
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), RateLimitError> {
        self.entries.remove(key);
        Ok(())
    }
}
