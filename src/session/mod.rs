//! Authentication state and the route guard.

mod guard;
mod state;
mod store;

pub use guard::{Navigation, guard};
pub use state::{Session, SessionEvent, SessionStatus, User, UserRole};
pub use store::{MISSING_CHALLENGE, SessionStore};
