//! Resource cache: query results keyed by fingerprint, invalidated by tag
//!
//! Every fetch and every direct write draws a ticket from one monotonic
//! sequence. A fetch result lands only if its ticket is not older than the
//! value already held, and it lands stale if an invalidation with a newer
//! ticket hit the entry while the fetch was in flight.

use crate::cache::entry::{CacheEntry, CacheSnapshot, EntryStatus, Query, SnapshotEntry};
use crate::cache::fingerprint::Fingerprint;
use crate::cache::tags::{Tag, TagIndex};
use crate::error::ApiError;
use crate::http::Dispatcher;
use chrono::Utc;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info};

/// Outcome of a query fetch
pub type FetchResult = Result<Value, ApiError>;

type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct Slot {
    entry: CacheEntry,
    query: Query,
    written_seq: u64,
    invalidated_seq: u64,
    subscribers: usize,
    notify: watch::Sender<CacheEntry>,
}

impl Slot {
    /// `floor` is the last ticket issued before the slot existed; results of
    /// fetches started earlier never land in it.
    fn new(fingerprint: Fingerprint, query: Query, floor: u64) -> Self {
        let entry = CacheEntry::new(fingerprint, query.provides.clone());
        let (notify, _) = watch::channel(entry.clone());
        Self {
            entry,
            query,
            written_seq: floor,
            invalidated_seq: 0,
            subscribers: 0,
            notify,
        }
    }

    fn publish(&self) {
        self.notify.send_replace(self.entry.clone());
    }
}

struct InFlight {
    seq: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct CacheState {
    slots: HashMap<Fingerprint, Slot>,
    index: TagIndex,
    in_flight: HashMap<Fingerprint, InFlight>,
    next_seq: u64,
}

impl CacheState {
    fn ticket(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    /// Slot for `query`, created and indexed on first use
    fn slot_for(&mut self, fingerprint: &Fingerprint, query: &Query) -> &mut Slot {
        let CacheState {
            slots,
            index,
            next_seq,
            ..
        } = self;
        match slots.entry(fingerprint.clone()) {
            Entry::Occupied(occupied) => {
                let slot = occupied.into_mut();
                if slot.entry.tags != query.provides {
                    index.reindex(fingerprint, &slot.entry.tags, &query.provides);
                    slot.entry.tags = query.provides.clone();
                }
                slot.query = query.clone();
                slot
            }
            Entry::Vacant(vacant) => {
                index.reindex(fingerprint, &BTreeSet::new(), &query.provides);
                vacant.insert(Slot::new(fingerprint.clone(), query.clone(), *next_seq))
            }
        }
    }
}

struct Inner {
    state: Mutex<CacheState>,
    dispatcher: Dispatcher,
}

/// Normalized cache of query results
///
/// Cheap to clone; clones share the same entries. Fetches run as spawned
/// tasks, so a caller that stops waiting does not cancel the request and
/// its result is still applied.
#[derive(Clone)]
pub struct ResourceCache {
    inner: Arc<Inner>,
}

impl ResourceCache {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CacheState::default()),
                dispatcher,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serve `query` from cache if fresh, otherwise fetch it
    ///
    /// Concurrent reads of the same fingerprint share one network call.
    pub async fn read(&self, query: &Query) -> FetchResult {
        let fingerprint = query.fingerprint();
        let pending = {
            let mut state = self.lock();
            if let Some(data) = state
                .slots
                .get(&fingerprint)
                .and_then(|slot| slot.entry.fresh_data())
            {
                debug!("Cache hit for {}", fingerprint);
                return Ok(data.clone());
            }
            self.fetch_locked(&mut state, &fingerprint, query)
        };
        pending.await
    }

    /// Fetch `query` even if the cached value is fresh
    ///
    /// Joins a fetch that is already in flight.
    pub async fn refetch(&self, query: &Query) -> FetchResult {
        let fingerprint = query.fingerprint();
        let pending = {
            let mut state = self.lock();
            self.fetch_locked(&mut state, &fingerprint, query)
        };
        pending.await
    }

    /// Replace the entry for `query` and notify subscribers
    pub fn write(&self, query: &Query, data: Value) {
        let fingerprint = query.fingerprint();
        let mut state = self.lock();
        let seq = state.ticket();
        let slot = state.slot_for(&fingerprint, query);

        slot.entry.data = Some(data);
        slot.entry.status = EntryStatus::Fulfilled;
        slot.entry.error = None;
        slot.entry.stale = false;
        slot.entry.updated_at = Some(Utc::now());
        slot.written_seq = seq;
        slot.publish();
        debug!("Wrote {} (ticket {})", fingerprint, seq);
    }

    /// Mark every entry providing any of `tags` stale
    ///
    /// Entries with live subscribers are refetched right away; the rest
    /// wait for their next read. Returns the number of entries hit.
    pub fn invalidate<'a>(&self, tags: impl IntoIterator<Item = &'a Tag>) -> usize {
        let tags: Vec<&Tag> = tags.into_iter().collect();
        let mut state = self.lock();
        let matched = state.index.lookup(tags.iter().copied());
        let mut eager = Vec::new();

        for fingerprint in &matched {
            let seq = state.ticket();
            let in_flight = state.in_flight.contains_key(fingerprint);
            let Some(slot) = state.slots.get_mut(fingerprint) else {
                continue;
            };

            slot.invalidated_seq = seq;
            slot.entry.stale = true;
            slot.publish();

            if slot.subscribers > 0 && !in_flight {
                eager.push((fingerprint.clone(), slot.query.clone()));
            }
        }

        for (fingerprint, query) in eager {
            debug!("Refetching subscribed entry {}", fingerprint);
            self.start_fetch(&mut state, fingerprint, query);
        }

        if !tags.is_empty() {
            let names: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
            debug!("Invalidated {} entries for [{}]", matched.len(), names.join(", "));
        }
        matched.len()
    }

    /// Watch the entry for `query`, fetching it if it is not fresh
    pub fn subscribe(&self, query: &Query) -> Subscription {
        let fingerprint = query.fingerprint();
        let mut state = self.lock();

        let (receiver, needs_fetch) = {
            let slot = state.slot_for(&fingerprint, query);
            slot.subscribers += 1;
            (slot.notify.subscribe(), !slot.entry.is_fresh())
        };

        if needs_fetch && !state.in_flight.contains_key(&fingerprint) {
            self.start_fetch(&mut state, fingerprint.clone(), query.clone());
        }

        Subscription {
            cache: self.clone(),
            fingerprint,
            receiver,
        }
    }

    /// Current entry for `fingerprint`, without fetching
    pub fn peek(&self, fingerprint: &Fingerprint) -> Option<CacheEntry> {
        self.lock()
            .slots
            .get(fingerprint)
            .map(|slot| slot.entry.clone())
    }

    /// All entries, ordered by fingerprint
    pub fn entries(&self) -> Vec<CacheEntry> {
        let mut entries: Vec<CacheEntry> = self
            .lock()
            .slots
            .values()
            .map(|slot| slot.entry.clone())
            .collect();
        entries.sort_by(|a, b| a.fingerprint.cmp(&b.fingerprint));
        entries
    }

    /// Whether a fetch for `fingerprint` is outstanding
    #[cfg(test)]
    pub(crate) fn is_in_flight(&self, fingerprint: &Fingerprint) -> bool {
        self.lock().in_flight.contains_key(fingerprint)
    }

    /// Fulfilled entries in persistable form
    pub fn snapshot(&self) -> CacheSnapshot {
        let state = self.lock();
        let mut entries: Vec<SnapshotEntry> = state
            .slots
            .values()
            .filter(|slot| slot.entry.status == EntryStatus::Fulfilled)
            .filter_map(|slot| {
                slot.entry.data.as_ref().map(|data| SnapshotEntry {
                    query: slot.query.clone(),
                    data: data.clone(),
                    updated_at: slot.entry.updated_at,
                })
            })
            .collect();
        entries.sort_by_key(|e| e.query.fingerprint());
        CacheSnapshot { entries }
    }

    /// Load persisted entries; they come back stale so reads refetch them
    pub fn restore(&self, snapshot: CacheSnapshot) {
        let mut state = self.lock();
        let count = snapshot.entries.len();

        for restored in snapshot.entries {
            let fingerprint = restored.query.fingerprint();
            let seq = state.ticket();
            let slot = state.slot_for(&fingerprint, &restored.query);

            slot.entry.data = Some(restored.data);
            slot.entry.status = EntryStatus::Fulfilled;
            slot.entry.error = None;
            slot.entry.stale = true;
            slot.entry.updated_at = restored.updated_at;
            slot.written_seq = seq;
            slot.invalidated_seq = seq;
            slot.publish();
        }

        if count > 0 {
            info!("Restored {} cached queries", count);
        }
    }

    /// Drop every entry; outstanding fetches finish but their results are discarded
    pub fn reset(&self) {
        let mut state = self.lock();
        state.slots.clear();
        state.index.clear();
        state.in_flight.clear();
        debug!("Cache reset");
    }

    fn fetch_locked(
        &self,
        state: &mut CacheState,
        fingerprint: &Fingerprint,
        query: &Query,
    ) -> SharedFetch {
        if let Some(in_flight) = state.in_flight.get(fingerprint) {
            debug!("Joining in-flight fetch for {}", fingerprint);
            return in_flight.future.clone();
        }
        self.start_fetch(state, fingerprint.clone(), query.clone())
    }

    fn start_fetch(&self, state: &mut CacheState, fingerprint: Fingerprint, query: Query) -> SharedFetch {
        let seq = state.ticket();
        let slot = state.slot_for(&fingerprint, &query);
        slot.entry.status = EntryStatus::Pending;
        slot.publish();
        debug!("Fetching {} (ticket {})", fingerprint, seq);

        let cache = self.clone();
        let key = fingerprint.clone();
        let task = tokio::spawn(async move {
            let result = cache
                .inner
                .dispatcher
                .execute(&query.request)
                .await
                .map(|response| response.data);
            cache.complete(&key, seq, &result);
            result
        });

        let future = async move {
            task.await
                .unwrap_or_else(|e| Err(ApiError::Network(format!("Fetch task failed: {}", e))))
        }
        .boxed()
        .shared();

        state.in_flight.insert(
            fingerprint,
            InFlight {
                seq,
                future: future.clone(),
            },
        );
        future
    }

    fn complete(&self, fingerprint: &Fingerprint, seq: u64, result: &FetchResult) {
        let mut state = self.lock();

        let in_flight_seq = state.in_flight.get(fingerprint).map(|in_flight| in_flight.seq);
        if in_flight_seq == Some(seq) {
            state.in_flight.remove(fingerprint);
        }

        let Some(slot) = state.slots.get_mut(fingerprint) else {
            debug!("Dropping result for removed entry {}", fingerprint);
            return;
        };

        let superseded = in_flight_seq.is_some_and(|current| current > seq);
        if seq < slot.written_seq || superseded {
            debug!(
                "Discarding completion for {} (ticket {} superseded)",
                fingerprint, seq
            );
            return;
        }

        match result {
            Ok(data) => {
                slot.entry.data = Some(data.clone());
                slot.entry.status = EntryStatus::Fulfilled;
                slot.entry.error = None;
                slot.entry.stale = slot.invalidated_seq > seq;
                slot.entry.updated_at = Some(Utc::now());
                slot.written_seq = seq;
            }
            Err(err) => {
                slot.entry.status = EntryStatus::Rejected;
                slot.entry.error = Some(err.clone());
            }
        }
        slot.publish();

        if result.is_ok() && slot.entry.stale && slot.subscribers > 0 && in_flight_seq == Some(seq) {
            let query = slot.query.clone();
            debug!("{} went stale while in flight; refetching", fingerprint);
            self.start_fetch(&mut state, fingerprint.clone(), query);
        }
    }

    fn unsubscribe(&self, fingerprint: &Fingerprint) {
        if let Some(slot) = self.lock().slots.get_mut(fingerprint) {
            slot.subscribers = slot.subscribers.saturating_sub(1);
        }
    }
}

/// Live view of one cache entry; dropping it unsubscribes
pub struct Subscription {
    cache: ResourceCache,
    fingerprint: Fingerprint,
    receiver: watch::Receiver<CacheEntry>,
}

impl Subscription {
    /// Latest published state of the entry
    pub fn current(&self) -> CacheEntry {
        self.receiver.borrow().clone()
    }

    /// Wait until the entry is fresh or its last fetch failed
    pub async fn settled(&mut self) -> CacheEntry {
        let settled = self
            .receiver
            .wait_for(CacheEntry::is_settled)
            .await
            .map(|entry| entry.clone());
        settled.unwrap_or_else(|_| self.current())
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cache.unsubscribe(&self.fingerprint);
    }
}
