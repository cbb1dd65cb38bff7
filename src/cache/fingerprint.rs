//! Request fingerprints used as cache keys

use crate::http::{ApiRequest, Method};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;

/// Deterministic identity of a cacheable request
///
/// Built from method, path and the canonical form of the body, so two
/// requests that differ only in JSON key order share one entry. The
/// body contributes a short SHA256 digest to keep keys readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(method: Method, path: &str, body: Option<&Value>) -> Self {
        let mut key = format!("{} {}", method, path);
        if let Some(body) = body {
            let digest = Sha256::digest(canonical_json(body).as_bytes());
            key.push('#');
            key.push_str(&hex::encode(&digest[..8]));
        }
        Self(key)
    }

    pub fn of(request: &ApiRequest) -> Self {
        Self::new(request.method, &request.path, request.body.as_ref())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// JSON text with object keys sorted at every level
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| format!("{}:{}", Value::String(k.clone()), canonical_json(&map[k])))
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", items.join(","))
        }
        other => other.to_string(),
    }
}
