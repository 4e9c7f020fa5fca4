use sha2::{Digest, Sha256};

/// Derives a best-effort device identifier from ambient environment
/// signals: user and host names, OS, locale, timezone offset and
/// terminal geometry. Stable across runs on the same machine, different
/// across machines. A tamper-evidence heuristic only — never treat it
/// as proof of identity.
///
/// Always succeeds; signals that cannot be read contribute a fixed
/// placeholder.
pub fn generate() -> String {
    let hostname = whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string());
    let locale = std::env::var("LANG").unwrap_or_default();
    let timezone = chrono::Local::now().offset().to_string();
    let geometry = terminal_size::terminal_size()
        .map(|(w, h)| format!("{}x{}", w.0, h.0))
        .unwrap_or_else(|| "0x0".to_string());

    let signals = [
        whoami::username(),
        hostname,
        whoami::distro(),
        std::env::consts::OS.to_string(),
        std::env::consts::ARCH.to_string(),
        locale,
        timezone,
        geometry,
    ];

    let mut hasher = Sha256::new();
    for signal in &signals {
        hasher.update(signal.as_bytes());
        hasher.update([0x1f]);
    }
    let digest = hex::encode(hasher.finalize());

    format!("fp_{}", &digest[..24])
}
