pub mod invitation;
pub mod role;
pub mod session;

pub use invitation::InvitationCode;
pub use role::Role;
pub use session::Session;
