//! Session management module
//!
//! The session is the single process-wide authentication state read by
//! every outgoing request.

pub mod state;
pub mod store;

pub use state::Session;
pub use store::SessionStore;
