//! In-memory state storage modules.
//!
//! Stores manage runtime state that is never persisted:
//! - `Session` - one live client connection
//! - `SessionManager` - active session tracking

pub mod session;

pub use session::{SendError, Session, SessionManager, SESSION_QUEUE_CAPACITY};
