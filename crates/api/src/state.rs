use mongodb::Database;
use sitedesk_config::Settings;
use sitedesk_services::{
    AuthService,
    dao::{InvitationDao, SessionDao},
    ratelimit::{MemoryRateLimitStore, RateLimitStore, RedisRateLimitStore},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub invitations: Arc<InvitationDao>,
    pub sessions: Arc<SessionDao>,
}

impl AppState {
    pub async fn new(db: Database, settings: Settings) -> anyhow::Result<Self> {
        let invitations = Arc::new(InvitationDao::new(&db));
        let sessions = Arc::new(SessionDao::new(&db));

        let window = Duration::from_secs(settings.rate_limit.window_secs);
        let rate_limiter: Arc<dyn RateLimitStore> = match settings.rate_limit.backend.as_str() {
            "redis" => Arc::new(
                RedisRateLimitStore::connect(
                    &settings.redis.url,
                    settings.rate_limit.max_attempts,
                    window,
                )
                .await?,
            ),
            _ => {
                info!("Using in-process rate-limit store");
                Arc::new(MemoryRateLimitStore::new(
                    settings.rate_limit.max_attempts,
                    window,
                ))
            }
        };

        let auth = Arc::new(AuthService::new(
            invitations.clone(),
            sessions.clone(),
            rate_limiter,
            settings.session.ttl_secs,
        ));

        Ok(Self {
            db,
            settings,
            auth,
            invitations,
            sessions,
        })
    }
}
