use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::role::Role;

/// A short-lived, role-bearing credential issued when an invitation
/// code is redeemed. Valid while `expires_at` is in the future and the
/// presented fingerprint matches the stored one; never renewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Opaque token handed to the client.
    pub session_id: String,
    pub role: Role,
    /// Heuristic device binding, not a credential.
    pub fingerprint: String,
    pub expires_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Session {
    pub const COLLECTION: &'static str = "sessions";
}
