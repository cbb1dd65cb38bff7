//! Task API surface: models, endpoints, cacheable queries and mutations
//!
//! Reads go through the [`ResourceCache`](crate::cache::ResourceCache) using
//! the queries in [`queries`]. Writes go through the [`MutationCoordinator`],
//! which validates input, dispatches the request and then applies the
//! session and cache effects declared by each [`Mutation`].

pub mod endpoints;
pub mod models;
pub mod mutation;
pub mod queries;
pub mod validate;

pub use models::{
    LoginPayload, LoginResponse, MessageResponse, ResetPasswordPayload, SignupPayload, Task,
    TaskPayload,
};
pub use mutation::{Mutation, MutationCoordinator};
pub use validate::Validate;
