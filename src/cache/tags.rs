//! Invalidation tags and the tag → fingerprint index

use crate::cache::fingerprint::Fingerprint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Invalidation label, either a whole kind (`Task`) or one item (`Task:42`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag {
    kind: String,
    id: Option<String>,
}

impl Tag {
    /// Tag covering a whole collection
    pub fn kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: None,
        }
    }

    /// Tag for a single item of a collection
    pub fn item(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: Some(id.into()),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{}", self.kind, id),
            None => f.write_str(&self.kind),
        }
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = match s.split_once(':') {
            Some((kind, id)) => (kind, Some(id)),
            None => (s, None),
        };
        if kind.is_empty() {
            return Err(format!("invalid tag '{}': empty kind", s));
        }
        Ok(match id {
            Some(id) => Self::item(kind, id),
            None => Self::kind(kind),
        })
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Many-to-many index from tag to the entries that provide it
///
/// Matching is exact: `Task` finds entries providing `Task`, not entries
/// that only provide `Task:42`.
#[derive(Debug, Default)]
pub struct TagIndex {
    by_tag: HashMap<Tag, HashSet<Fingerprint>>,
}

impl TagIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the tags recorded for `fingerprint`
    pub fn reindex(&mut self, fingerprint: &Fingerprint, old: &BTreeSet<Tag>, new: &BTreeSet<Tag>) {
        for tag in old.difference(new) {
            if let Some(set) = self.by_tag.get_mut(tag) {
                set.remove(fingerprint);
                if set.is_empty() {
                    self.by_tag.remove(tag);
                }
            }
        }
        for tag in new.difference(old) {
            self.by_tag
                .entry(tag.clone())
                .or_default()
                .insert(fingerprint.clone());
        }
    }

    /// Drop every tag recorded for `fingerprint`
    pub fn remove(&mut self, fingerprint: &Fingerprint, tags: &BTreeSet<Tag>) {
        self.reindex(fingerprint, tags, &BTreeSet::new());
    }

    /// Entries providing any of `tags`
    pub fn lookup<'a>(&self, tags: impl IntoIterator<Item = &'a Tag>) -> BTreeSet<Fingerprint> {
        tags.into_iter()
            .filter_map(|tag| self.by_tag.get(tag))
            .flatten()
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.by_tag.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}
