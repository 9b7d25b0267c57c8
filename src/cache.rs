//! Caller-owned memoization for repeated analytics over unchanged cohorts.
//! Keys are content fingerprints, so two requests over the same scores hit
//! the same entry no matter where the slice came from.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

/// SHA-256 over a canonical encoding of the input. Displays as lowercase
/// hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Little-endian bit pattern of each value, in order. Order is part of
    /// the identity: `[1, 2]` and `[2, 1]` are different inputs.
    pub fn of_values(values: &[f64]) -> Fingerprint {
        let mut hasher = Sha256::new();
        for value in values {
            hasher.update(value.to_le_bytes());
        }
        Fingerprint(hasher.finalize().into())
    }

    /// Compact JSON text. Object keys serialize sorted, so two objects with
    /// the same fields fingerprint identically regardless of construction
    /// order.
    pub fn of_json(value: &Value) -> Fingerprint {
        let mut hasher = Sha256::new();
        hasher.update(value.to_string().as_bytes());
        Fingerprint(hasher.finalize().into())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Fingerprint-keyed cache with hit/miss accounting. Owned and passed by
/// the caller; the crate holds no process-global state.
#[derive(Debug, Default)]
pub struct AnalyticsCache<V> {
    entries: HashMap<Fingerprint, V>,
    hits: u64,
    misses: u64,
}

impl<V> AnalyticsCache<V> {
    pub fn new() -> AnalyticsCache<V> {
        AnalyticsCache {
            entries: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &Fingerprint) -> Option<&V> {
        let found = self.entries.get(key);
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Returns the value previously stored under the key, if any.
    pub fn insert(&mut self, key: Fingerprint, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn get_or_insert_with<F: FnOnce() -> V>(&mut self, key: Fingerprint, compute: F) -> &V {
        match self.entries.entry(key) {
            Entry::Occupied(slot) => {
                self.hits += 1;
                slot.into_mut()
            }
            Entry::Vacant(slot) => {
                self.misses += 1;
                slot.insert(compute())
            }
        }
    }

    /// Drops every entry and resets the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
