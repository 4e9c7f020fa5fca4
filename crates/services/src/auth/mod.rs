use bson::DateTime;
use nanoid::nanoid;
use sitedesk_db::models::{Role, Session};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::dao::base::DaoError;
use crate::dao::{InvitationDao, SessionDao};
use crate::fingerprint::TamperHint;
use crate::ratelimit::{RateLimitError, RateLimitStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Too many attempts, please try again later")]
    RateLimited,
    #[error("Invalid invitation code")]
    InvalidCode,
    #[error("Invitation code has expired")]
    Expired,
    #[error("Invitation code fully used")]
    Exhausted,
    #[error("Invalid or expired session")]
    InvalidSession,
    #[error(transparent)]
    Dao(#[from] DaoError),
    #[error(transparent)]
    RateLimit(#[from] RateLimitError),
}

/// Orchestrates invitation redemption and session issuance.
///
/// The redemption order is fixed: rate-limit check before any database
/// access, then a single conditional redeem, then session issuance.
pub struct AuthService {
    invitations: Arc<InvitationDao>,
    sessions: Arc<SessionDao>,
    rate_limiter: Arc<dyn RateLimitStore>,
    session_ttl_secs: u64,
}

impl AuthService {
    pub fn new(
        invitations: Arc<InvitationDao>,
        sessions: Arc<SessionDao>,
        rate_limiter: Arc<dyn RateLimitStore>,
        session_ttl_secs: u64,
    ) -> Self {
        Self {
            invitations,
            sessions,
            rate_limiter,
            session_ttl_secs,
        }
    }

    /// Redeems `raw_code` for a new session. `client_key` identifies
    /// the caller for rate limiting (normally the client IP).
    pub async fn validate_invitation(
        &self,
        client_key: &str,
        raw_code: &str,
        fingerprint: TamperHint,
    ) -> Result<Session, AuthError> {
        let code = InvitationDao::normalize(raw_code);
        let rl_key = format!("{client_key}:{code}");

        if self.rate_limiter.is_limited(&rl_key).await? {
            warn!(client = %client_key, "Redemption rate limited");
            return Err(AuthError::RateLimited);
        }

        match self.invitations.redeem(&code).await? {
            Some(invite) => {
                let session = self.issue_session(invite.role, fingerprint).await?;
                self.rate_limiter.clear(&rl_key).await?;
                info!(code = %code, role = %invite.role, "Invitation redeemed");
                Ok(session)
            }
            None => {
                self.rate_limiter.record_failure(&rl_key).await?;
                // The conditional redeem rejects unknown, expired and
                // exhausted codes alike; a follow-up read picks the
                // user-facing reason.
                let err = match self.invitations.find_by_code(&code).await? {
                    None => AuthError::InvalidCode,
                    Some(c) if c.is_expired(DateTime::now()) => AuthError::Expired,
                    Some(_) => AuthError::Exhausted,
                };
                debug!(code = %code, reason = %err, "Invitation rejected");
                Err(err)
            }
        }
    }

    async fn issue_session(
        &self,
        role: Role,
        fingerprint: TamperHint,
    ) -> Result<Session, AuthError> {
        let now = DateTime::now();
        let expires_at = DateTime::from_millis(
            now.timestamp_millis() + (self.session_ttl_secs as i64) * 1000,
        );

        let mut session = Session {
            id: None,
            session_id: nanoid!(32),
            role,
            fingerprint: fingerprint.as_str().to_string(),
            expires_at,
            created_at: now,
            updated_at: now,
        };

        let id = self.sessions.base.insert_one(&session).await?;
        session.id = Some(id);
        Ok(session)
    }

    /// Resolves an opaque token to its session, enforcing expiry and
    /// fingerprint binding. A mismatched fingerprint is indistinguishable
    /// from a missing session on purpose.
    pub async fn current_session(
        &self,
        session_id: &str,
        fingerprint: &TamperHint,
    ) -> Result<Session, AuthError> {
        let session = self
            .sessions
            .find_valid(session_id)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        if !fingerprint.matches(&session.fingerprint) {
            debug!(session = %session_id, "Fingerprint mismatch");
            return Err(AuthError::InvalidSession);
        }

        Ok(session)
    }
}
