use bson::{DateTime, doc};
use mongodb::Database;
use sitedesk_db::models::{InvitationCode, Role};

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct InvitationDao {
    pub base: BaseDao<InvitationCode>,
}

impl InvitationDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, InvitationCode::COLLECTION),
        }
    }

    /// Codes are compared normalized: whitespace-trimmed and uppercase.
    pub fn normalize(code: &str) -> String {
        code.trim().to_uppercase()
    }

    pub async fn create(
        &self,
        code: &str,
        role: Role,
        max_uses: i64,
        expires_at: DateTime,
    ) -> DaoResult<InvitationCode> {
        let now = DateTime::now();
        let invite = InvitationCode {
            id: None,
            code: Self::normalize(code),
            role,
            max_uses,
            current_uses: 0,
            expires_at,
            used_at: None,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&invite).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_by_code(&self, code: &str) -> DaoResult<Option<InvitationCode>> {
        self.base.find_one(doc! { "code": code }).await
    }

    /// Compare-and-increment redemption. The usage check and the
    /// increment are a single conditional update, so two racing
    /// redemptions of a near-exhausted code cannot both pass.
    ///
    /// Returns None when the code is unknown, expired or fully used;
    /// the caller distinguishes those with a follow-up read.
    pub async fn redeem(&self, code: &str) -> DaoResult<Option<InvitationCode>> {
        let now = DateTime::now();
        let filter = doc! {
            "code": code,
            "expires_at": { "$gt": now },
            "$or": [
                { "max_uses": 0 },
                { "$expr": { "$lt": ["$current_uses", "$max_uses"] } },
            ],
        };
        let update = doc! {
            "$inc": { "current_uses": 1 },
            "$set": { "used_at": now, "updated_at": now },
        };

        self.base.find_one_and_update(filter, update).await
    }

    pub async fn list(
        &self,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<InvitationCode>> {
        self.base
            .find_paginated(doc! {}, Some(doc! { "created_at": -1 }), params)
            .await
    }

    pub async fn delete_by_code(&self, code: &str) -> DaoResult<u64> {
        self.base
            .hard_delete(doc! { "code": Self::normalize(code) })
            .await
    }
}
