mod settings;

pub use settings::{
    AppSettings, DatabaseSettings, RateLimitSettings, RedisSettings, SessionSettings, Settings,
};
