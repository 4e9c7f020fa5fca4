use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, header},
};
use serde::{Deserialize, Serialize};
use sitedesk_services::fingerprint::TamperHint;
use std::net::SocketAddr;

use crate::{
    error::ApiError,
    extractors::request_hint,
    routes::session::SessionResponse,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub code: String,
    pub fingerprint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub session: SessionResponse,
}

pub async fn validate(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(body): Json<ValidateRequest>,
) -> Result<(HeaderMap, Json<ValidateResponse>), ApiError> {
    if body.code.trim().is_empty() {
        return Err(ApiError::BadRequest("Code is required".to_string()));
    }

    let client_key = client_ip(&headers, addr);
    let hint = match body.fingerprint {
        Some(fp) if !fp.trim().is_empty() => TamperHint::new(fp),
        _ => request_hint(&headers),
    };

    let session = state
        .auth
        .validate_invitation(&client_key, &body.code, hint)
        .await?;

    let mut response_headers = HeaderMap::new();
    let cookie = format!(
        "session_id={}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        session.session_id, state.settings.session.ttl_secs
    );
    response_headers.insert(header::SET_COOKIE, cookie.parse().unwrap());

    Ok((
        response_headers,
        Json(ValidateResponse {
            success: true,
            session: SessionResponse::from(&session),
        }),
    ))
}

/// Rate limiting keys on the client address: the first entry of
/// `X-Forwarded-For` when a proxy set one, the socket address otherwise.
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| addr.ip().to_string())
}
