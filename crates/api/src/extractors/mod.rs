pub mod session;

pub use session::{CurrentSession, request_hint};
