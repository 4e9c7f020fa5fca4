use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sitedesk_db::models::Role;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::fingerprint;
use crate::store::{SessionStore, StoredSession};

const NETWORK_ERROR: &str = "Network error, please try again";

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(StoredSession),
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    code: &'a str,
    fingerprint: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateReply {
    success: bool,
    session: Option<WireSession>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireSession {
    session_id: String,
    role: Role,
    expires_at: chrono::DateTime<chrono::Utc>,
    fingerprint: String,
}

/// Process-wide auth state: restores a stored session on startup,
/// redeems invitation codes against the API, and periodically re-reads
/// the store so an expiry or fingerprint drift flips the state back to
/// Unauthenticated.
///
/// All transitions replace the session value wholesale; there is no
/// partial mutation, so an interleaving of the revalidation tick and an
/// in-flight redemption resolves to whichever wrote last.
pub struct AuthContext {
    store: SessionStore,
    http: reqwest::Client,
    base_url: String,
    state: RwLock<AuthState>,
}

impl AuthContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_store(base_url, SessionStore::new())
    }

    pub fn with_store(base_url: impl Into<String>, store: SessionStore) -> Self {
        let state = match store.load(&fingerprint::generate()) {
            Some(session) => {
                info!(role = %session.role, "Restored stored session");
                AuthState::Authenticated(session)
            }
            None => AuthState::Unauthenticated,
        };

        Self {
            store,
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            state: RwLock::new(state),
        }
    }

    pub fn current(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(*self.state.read(), AuthState::Authenticated(_))
    }

    /// Redeems an invitation code. On rejection the server's error
    /// string is surfaced verbatim; transport failures collapse to a
    /// generic message and the caller decides whether to resubmit.
    pub async fn validate_invitation(&self, code: &str) -> Result<StoredSession, String> {
        let fingerprint = fingerprint::generate();

        let response = self
            .http
            .post(format!("{}/api/invite/validate", self.base_url))
            .json(&ValidateRequest {
                code,
                fingerprint: &fingerprint,
            })
            .send()
            .await
            .map_err(|e| {
                debug!(error = %e, "Validation request failed");
                NETWORK_ERROR.to_string()
            })?;

        let reply: ValidateReply = response.json().await.map_err(|e| {
            debug!(error = %e, "Validation response unreadable");
            NETWORK_ERROR.to_string()
        })?;

        let wire = match (reply.success, reply.session) {
            (true, Some(session)) => session,
            _ => {
                return Err(reply
                    .error
                    .unwrap_or_else(|| "Invalid invitation code".to_string()));
            }
        };

        let session = StoredSession {
            session_id: wire.session_id,
            role: wire.role,
            expires_at: wire.expires_at,
            fingerprint: wire.fingerprint,
        };

        if let Err(e) = self.store.save(&session) {
            // In-memory auth still works for this run.
            warn!(error = %e, "Could not persist session");
        }
        *self.state.write() = AuthState::Authenticated(session.clone());
        info!(role = %session.role, "Signed in");

        Ok(session)
    }

    /// Re-reads the store and replaces the in-memory state with
    /// whatever it holds now. Called by the background timer; also
    /// useful directly in tests.
    pub fn refresh(&self) {
        let fresh = self.store.load(&fingerprint::generate());
        let mut state = self.state.write();
        match fresh {
            Some(session) => *state = AuthState::Authenticated(session),
            None => {
                if !matches!(*state, AuthState::Unauthenticated) {
                    info!("Session no longer valid, signing out");
                }
                *state = AuthState::Unauthenticated;
            }
        }
    }

    /// Local sign-out: clears the store and the in-memory state. The
    /// invitation-code flow has no server-side revocation to call.
    pub fn sign_out(&self) {
        self.store.clear();
        *self.state.write() = AuthState::Unauthenticated;
    }

    /// Spawns the periodic revalidation task (the flow's default
    /// interval is 5 minutes).
    pub fn spawn_revalidation(self: &Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        let ctx = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; startup already restored.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                ctx.refresh();
            }
        })
    }
}
