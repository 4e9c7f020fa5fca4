pub mod context;
pub mod fingerprint;
pub mod guard;
pub mod store;

pub use context::{AuthContext, AuthState};
pub use guard::RouteDecision;
pub use store::{SessionStore, StoredSession};
