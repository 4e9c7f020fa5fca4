use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// A shared access token that grants `role` to whoever redeems it,
/// bounded by a usage count and an expiry.
///
/// Codes are stored normalized (trimmed, uppercase) and are unique per
/// deployment; the unique index on `code` rejects duplicates at insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationCode {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub code: String,
    pub role: Role,
    /// 0 means unlimited.
    pub max_uses: i64,
    #[serde(default)]
    pub current_uses: i64,
    pub expires_at: DateTime,
    /// Last successful redemption.
    pub used_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl InvitationCode {
    pub const COLLECTION: &'static str = "invitation_codes";

    pub fn is_expired(&self, now: DateTime) -> bool {
        self.expires_at <= now
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_uses > 0 && self.current_uses >= self.max_uses
    }
}
