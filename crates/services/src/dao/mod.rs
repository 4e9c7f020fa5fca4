pub mod base;
pub mod invitation;
pub mod session;

pub use base::BaseDao;
pub use invitation::InvitationDao;
pub use session::SessionDao;
