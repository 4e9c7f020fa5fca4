use axum::{Json, http::{HeaderMap, header}};
use serde::Serialize;
use sitedesk_db::models::{Role, Session};

use crate::{error::ApiError, extractors::CurrentSession};

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub role: Role,
    pub expires_at: String,
    pub fingerprint: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.session_id.clone(),
            role: session.role,
            expires_at: session.expires_at.to_chrono().to_rfc3339(),
            fingerprint: session.fingerprint.clone(),
        }
    }
}

pub async fn me(current: CurrentSession) -> Result<Json<SessionResponse>, ApiError> {
    Ok(Json(SessionResponse::from(&current.session)))
}

/// Clears the session cookie. The invitation-code flow keeps no
/// server-side revocation list; the session document lapses on its own
/// when `expires_at` passes.
pub async fn logout() -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    let cookie = "session_id=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0";
    headers.insert(header::SET_COOKIE, cookie.parse().unwrap());
    Ok(headers)
}
