pub mod auth;
pub mod dao;
pub mod fingerprint;
pub mod ratelimit;

pub use auth::AuthService;
pub use dao::*;
pub use fingerprint::TamperHint;
pub use ratelimit::{MemoryRateLimitStore, RateLimitStore, RedisRateLimitStore};
