//! Taskdeck - client for a personal task list REST API
//!
//! Keeps a bearer-token session across runs, caches task queries with
//! tag-based invalidation and deduplicated fetches, and routes every
//! write through a coordinator that invalidates what it touched.

pub mod api;
pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod persist;
pub mod session;
pub mod ui;

pub use client::TaskClient;
pub use error::{TaskdeckError, TaskdeckResult};
