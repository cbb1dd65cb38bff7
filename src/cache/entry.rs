//! Cache entries and their persisted form

use crate::cache::fingerprint::Fingerprint;
use crate::cache::tags::Tag;
use crate::error::ApiError;
use crate::http::ApiRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Lifecycle of a cache entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Uninitialized,
    Pending,
    Fulfilled,
    Rejected,
}

/// A cacheable request and the tags its result provides
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub request: ApiRequest,
    #[serde(default)]
    pub provides: BTreeSet<Tag>,
}

impl Query {
    pub fn new(request: ApiRequest, provides: impl IntoIterator<Item = Tag>) -> Self {
        Self {
            request,
            provides: provides.into_iter().collect(),
        }
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.request)
    }
}

/// Point-in-time view of one cached query
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    /// Last successfully fetched or written value, kept across failures
    pub data: Option<Value>,
    pub tags: BTreeSet<Tag>,
    pub status: EntryStatus,
    /// Error of the last failed fetch
    pub error: Option<ApiError>,
    /// Data may be outdated and must be refetched before it is trusted
    pub stale: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    pub fn new(fingerprint: Fingerprint, tags: BTreeSet<Tag>) -> Self {
        Self {
            fingerprint,
            data: None,
            tags,
            status: EntryStatus::Uninitialized,
            error: None,
            stale: false,
            updated_at: None,
        }
    }

    /// Fulfilled and not invalidated since
    pub fn is_fresh(&self) -> bool {
        self.status == EntryStatus::Fulfilled && !self.stale
    }

    /// Data that can be served without a fetch
    pub fn fresh_data(&self) -> Option<&Value> {
        if self.is_fresh() {
            self.data.as_ref()
        } else {
            None
        }
    }

    /// No fetch outcome is expected for this entry right now
    pub fn is_settled(&self) -> bool {
        self.is_fresh() || self.status == EntryStatus::Rejected
    }
}

/// Fulfilled entries written to durable storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    pub entries: Vec<SnapshotEntry>,
}

impl CacheSnapshot {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub query: Query,
    pub data: Value,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
