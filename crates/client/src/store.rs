use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sitedesk_db::models::Role;
use std::fs;
use std::io;
use std::path::PathBuf;
use tracing::debug;

const SESSION_FILE: &str = "session.json";
const FINGERPRINT_FILE: &str = "fingerprint";

/// The session as the client persists it between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub session_id: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
    pub fingerprint: String,
}

impl StoredSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Persists the session and the fingerprint it was issued against as
/// two plain files in the platform data directory. A load that fails
/// any check wipes both files: corrupted or mismatched state degrades
/// to "no session", never to an error the caller must handle.
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new() -> Self {
        let dir = directories::ProjectDirs::from("com", "Sitedesk", "sitedesk")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("sitedesk"));
        Self { dir }
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn fingerprint_path(&self) -> PathBuf {
        self.dir.join(FINGERPRINT_FILE)
    }

    /// Returns the stored session only if it parses, is not expired and
    /// was stored against `current_fingerprint`. Any other outcome
    /// clears the storage and returns None.
    pub fn load(&self, current_fingerprint: &str) -> Option<StoredSession> {
        let session = self.try_load(current_fingerprint);
        if session.is_none() {
            self.clear();
        }
        session
    }

    fn try_load(&self, current_fingerprint: &str) -> Option<StoredSession> {
        let stored_fingerprint = fs::read_to_string(self.fingerprint_path()).ok()?;
        if stored_fingerprint.trim() != current_fingerprint {
            debug!("Stored fingerprint does not match this environment");
            return None;
        }

        let raw = fs::read_to_string(self.session_path()).ok()?;
        let session: StoredSession = serde_json::from_str(&raw)
            .map_err(|e| debug!(error = %e, "Stored session is malformed"))
            .ok()?;

        if session.is_expired(Utc::now()) {
            debug!("Stored session has expired");
            return None;
        }

        Some(session)
    }

    /// Overwrites any prior session.
    pub fn save(&self, session: &StoredSession) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(session).map_err(io::Error::other)?;
        fs::write(self.session_path(), json)?;
        fs::write(self.fingerprint_path(), &session.fingerprint)?;
        Ok(())
    }

    /// Removes both files. Idempotent.
    pub fn clear(&self) {
        let _ = fs::remove_file(self.session_path());
        let _ = fs::remove_file(self.fingerprint_path());
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
