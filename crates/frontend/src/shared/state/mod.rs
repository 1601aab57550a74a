pub mod cell;
pub mod session_store;

pub use cell::{apply, StateCell};
pub use session_store::{AudioState, JockeySession, JockeyStatus, SessionStore};
