use mongodb::{Database, IndexModel, options::IndexOptions};
use std::time::Duration;
use tracing::info;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Invitation codes: uniqueness is the storage-layer guarantee that
    // redemption can assume first-match lookup.
    create_indexes(
        db,
        "invitation_codes",
        vec![
            index_unique(bson::doc! { "code": 1 }),
            index(bson::doc! { "expires_at": 1 }),
        ],
    )
    .await?;

    // Sessions: looked up by token on every request; Mongo's TTL
    // monitor reaps expired documents so the collection cannot grow
    // unboundedly.
    create_indexes(
        db,
        "sessions",
        vec![
            index_unique(bson::doc! { "session_id": 1 }),
            index_ttl(bson::doc! { "expires_at": 1 }),
        ],
    )
    .await?;

    info!("Indexes ensured");
    Ok(())
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn index_ttl(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(
            IndexOptions::builder()
                .expire_after(Duration::from_secs(0))
                .build(),
        )
        .build()
}
