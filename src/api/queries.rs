//! Cacheable queries and the tags they provide

use crate::api::endpoints;
use crate::cache::{Query, Tag};
use crate::http::ApiRequest;

/// Tag kind shared by every task query and mutation
pub const TASK: &str = "Task";

/// `GET /tasks`, provides `Task`
pub fn tasks() -> Query {
    Query::new(ApiRequest::get(endpoints::TASKS), [Tag::kind(TASK)])
}

/// `GET /tasks/{id}`, provides `Task:{id}`
pub fn task(id: &str) -> Query {
    Query::new(ApiRequest::get(endpoints::task(id)), [Tag::item(TASK, id)])
}
