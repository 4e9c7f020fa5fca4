use sitedesk_db::models::{Role, Session};

use crate::error::ApiError;

/// Route guard: pure decision on (session role, allowed roles).
/// Handlers call this after the session extractor has run, so an
/// unauthenticated request never reaches it.
pub fn require_role(session: &Session, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&session.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!(
            "Role {} is not allowed here",
            session.role
        )))
    }
}
