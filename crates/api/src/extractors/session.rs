use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use sitedesk_db::models::Session;
use sitedesk_services::fingerprint::TamperHint;

use crate::{error::ApiError, state::AppState};

/// Extracts the caller's session from the `X-Session-Id` header or the
/// `session_id` cookie, enforcing expiry and fingerprint binding.
#[derive(Debug, Clone)]
pub struct CurrentSession {
    pub session: Session,
}

impl<S> FromRequestParts<S> for CurrentSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // Try the dedicated header first
        let token = parts
            .headers
            .get("x-session-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            // Then try cookie
            .or_else(|| {
                parts
                    .headers
                    .get(header::COOKIE)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|cookies| {
                        cookies.split(';').find_map(|cookie| {
                            let cookie = cookie.trim();
                            cookie
                                .strip_prefix("session_id=")
                                .map(|s| s.to_string())
                        })
                    })
            })
            .ok_or_else(|| ApiError::Unauthorized("No session provided".to_string()))?;

        let hint = request_hint(&parts.headers);
        let session = app_state.auth.current_session(&token, &hint).await?;

        Ok(CurrentSession { session })
    }
}

/// The fingerprint a request presents: the explicit `X-Fingerprint`
/// header when the client sent one, otherwise a server-derived hint
/// condensed from the user agent and language headers. The derived
/// fallback is deterministic, so a client that redeemed without a
/// fingerprint keeps matching on later requests.
pub fn request_hint(headers: &HeaderMap) -> TamperHint {
    if let Some(fp) = headers
        .get("x-fingerprint")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        return TamperHint::new(fp);
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    TamperHint::derive([user_agent, language])
}

/// Helper trait for extracting AppState from composite state types
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AppState> for AppState {
    fn from_ref(input: &AppState) -> Self {
        input.clone()
    }
}
