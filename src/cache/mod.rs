//! Tag-invalidated cache of API query results
//!
//! Queries are keyed by a [`Fingerprint`] of the request and declare the
//! [`Tag`]s their results provide. Mutations invalidate by tag; matching
//! entries turn stale and are refetched either right away (when something
//! is subscribed) or on their next read.
//!
//! # Entry States
//!
//! | Status | Stale | Read behavior |
//! |--------|-------|---------------|
//! | Uninitialized | - | fetch |
//! | Pending | - | join the in-flight fetch |
//! | Fulfilled | no | served from cache |
//! | Fulfilled | yes | fetch, old data kept until it lands |
//! | Rejected | - | fetch, old data and error kept |

pub mod entry;
pub mod fingerprint;
pub mod resource;
pub mod tags;

pub use entry::{CacheEntry, CacheSnapshot, EntryStatus, Query, SnapshotEntry};
pub use fingerprint::Fingerprint;
pub use resource::{FetchResult, ResourceCache, Subscription};
pub use tags::{Tag, TagIndex};
