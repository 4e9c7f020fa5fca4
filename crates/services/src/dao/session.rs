use bson::{DateTime, doc};
use mongodb::Database;
use sitedesk_db::models::Session;

use super::base::{BaseDao, DaoResult};

pub struct SessionDao {
    pub base: BaseDao<Session>,
}

impl SessionDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Session::COLLECTION),
        }
    }

    /// Looks a session up by its opaque token, filtering out expired
    /// ones at the query so the TTL monitor's reaping lag never
    /// resurrects a dead session.
    pub async fn find_valid(&self, session_id: &str) -> DaoResult<Option<Session>> {
        self.base
            .find_one(doc! {
                "session_id": session_id,
                "expires_at": { "$gt": DateTime::now() },
            })
            .await
    }

    pub async fn delete(&self, session_id: &str) -> DaoResult<u64> {
        self.base.hard_delete(doc! { "session_id": session_id }).await
    }
}
