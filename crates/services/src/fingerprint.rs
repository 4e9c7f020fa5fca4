use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A heuristic device identifier condensed from ambient environment
/// signals. It binds a session to the device that redeemed the code
/// and nothing more: not cryptographically secure, not unique, and
/// never an authentication factor. The distinct type keeps it from
/// being passed where a real credential is expected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TamperHint(String);

impl TamperHint {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Condenses an ordered list of environment signals into a short
    /// `fp_`-prefixed hex digest. Stable for the same signals.
    pub fn derive<'a>(signals: impl IntoIterator<Item = &'a str>) -> Self {
        let mut hasher = Sha256::new();
        for signal in signals {
            hasher.update(signal.as_bytes());
            hasher.update([0x1f]);
        }
        let digest = hex::encode(hasher.finalize());
        Self(format!("fp_{}", &digest[..24]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, stored: &str) -> bool {
        self.0 == stored
    }
}

impl fmt::Display for TamperHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
