use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitedesk_db::models::{InvitationCode, Role};
use sitedesk_services::dao::base::{PaginatedResult, PaginationParams};

use crate::{
    error::ApiError,
    extractors::CurrentSession,
    guard,
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateInviteRequest {
    pub code: String,
    pub role: Role,
    /// 0 = unlimited.
    #[serde(default)]
    pub max_uses: i64,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct InviteResponse {
    pub code: String,
    pub role: Role,
    pub max_uses: i64,
    pub current_uses: i64,
    pub expires_at: String,
    pub used_at: Option<String>,
    pub created_at: String,
}

impl From<&InvitationCode> for InviteResponse {
    fn from(invite: &InvitationCode) -> Self {
        Self {
            code: invite.code.clone(),
            role: invite.role,
            max_uses: invite.max_uses,
            current_uses: invite.current_uses,
            expires_at: invite.expires_at.to_chrono().to_rfc3339(),
            used_at: invite.used_at.map(|d| d.to_chrono().to_rfc3339()),
            created_at: invite.created_at.to_chrono().to_rfc3339(),
        }
    }
}

pub async fn create_invite(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(body): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<InviteResponse>), ApiError> {
    guard::require_role(&current.session, &[Role::Engineer])?;

    if body.code.trim().is_empty() {
        return Err(ApiError::BadRequest("Code is required".to_string()));
    }
    if body.max_uses < 0 {
        return Err(ApiError::BadRequest(
            "max_uses must be zero or positive".to_string(),
        ));
    }

    let invite = state
        .invitations
        .create(
            &body.code,
            body.role,
            body.max_uses,
            bson::DateTime::from_chrono(body.expires_at),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(InviteResponse::from(&invite))))
}

pub async fn list_invites(
    State(state): State<AppState>,
    current: CurrentSession,
    Query(params): Query<PaginationParams>,
) -> Result<Json<PaginatedResult<InviteResponse>>, ApiError> {
    guard::require_role(&current.session, &[Role::Engineer])?;

    let page = state.invitations.list(&params).await?;
    Ok(Json(PaginatedResult {
        items: page.items.iter().map(InviteResponse::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }))
}

pub async fn delete_invite(
    State(state): State<AppState>,
    current: CurrentSession,
    Path(code): Path<String>,
) -> Result<StatusCode, ApiError> {
    guard::require_role(&current.session, &[Role::Engineer])?;

    let deleted = state.invitations.delete_by_code(&code).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound("Invitation code not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
