//! CLI command implementations

pub mod auth;
pub mod cache;
pub mod completions;
pub mod config;
pub mod status;
pub mod tasks;

pub use auth::{login, logout, reset_password, signup};
pub use cache::execute as cache;
pub use completions::execute as completions;
pub use config::execute as config;
pub use status::execute as status;
pub use tasks::execute as tasks;
