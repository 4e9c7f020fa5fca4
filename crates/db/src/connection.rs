use mongodb::{Client, Database, options::ClientOptions};
use sitedesk_config::Settings;
use tracing::info;

/// Connects, pings and returns the configured database handle.
/// Pool bounds are only applied when the config sets them.
pub async fn connect(settings: &Settings) -> Result<Database, mongodb::error::Error> {
    let db_settings = &settings.database;

    let mut options = ClientOptions::parse(&db_settings.url).await?;
    options.max_pool_size = db_settings.max_pool_size.or(options.max_pool_size);
    options.min_pool_size = db_settings.min_pool_size.or(options.min_pool_size);

    let client = Client::with_options(options)?;

    // Fail at startup rather than on the first request.
    client
        .database("admin")
        .run_command(bson::doc! { "ping": 1 })
        .await?;

    info!(
        db = %db_settings.name,
        max_pool = ?db_settings.max_pool_size,
        min_pool = ?db_settings.min_pool_size,
        "Connected to MongoDB"
    );

    Ok(client.database(&db_settings.name))
}
