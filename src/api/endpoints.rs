//! Endpoint paths, relative to the configured base URL

pub const SIGNUP: &str = "/signup";
pub const LOGIN: &str = "/login";
pub const RESET_PASSWORD: &str = "/reset-password";
pub const TASKS: &str = "/tasks";

/// `/tasks/{id}`, with the id percent-encoded as one path segment
pub fn task(id: &str) -> String {
    format!("{}/{}", TASKS, urlencoding::encode(id))
}
