use sitedesk_api::{build_router, state::AppState};
use sitedesk_config::Settings;
use sitedesk_db::{connect, indexes::ensure_indexes};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "sitedesk_api=debug,sitedesk_services=debug,sitedesk_db=debug,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let settings = Settings::load()?;
    info!(
        "Starting Sitedesk auth API on {}:{}",
        settings.app.host, settings.app.port
    );
    info!(
        backend = %settings.rate_limit.backend,
        max_attempts = settings.rate_limit.max_attempts,
        window_secs = settings.rate_limit.window_secs,
        "Rate-limit config"
    );

    // Connect to MongoDB
    let db = connect(&settings).await?;

    // Ensure indexes
    ensure_indexes(&db).await?;

    // Build app state (async: may connect the Redis rate-limit store)
    let app_state = AppState::new(db, settings.clone()).await?;

    // Build router
    let app = build_router(app_state);

    // Start server; ConnectInfo feeds the rate limiter's client key
    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
