//! Bounded in-memory tier with least-frequently-used eviction.
//!
//! Every entry carries a hit counter and the sequence number of its first
//! insertion. When a new key would exceed the limit, the entry with the fewest
//! hits is evicted; among equal counts the oldest insertion goes first.
//! Replacing an existing key keeps its sequence number and resets its hits.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::Digest;

struct Entry<V> {
    digest: Digest,
    value: V,
    hits: u64,
    seq: u64,
}

struct State<V> {
    entries: HashMap<String, Entry<V>>,
    next_seq: u64,
}

/// In-memory cache tier keyed by name and validated by digest.
///
/// A limit of zero disables the tier: inserts are dropped and lookups miss.
///
/// # Panics
///
/// Methods panic if the internal `Mutex` is poisoned.
pub struct HotTier<V> {
    limit: usize,
    state: Mutex<State<V>>,
}

impl<V: Clone> HotTier<V> {
    /// Create an empty tier holding at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            state: Mutex::new(State {
                entries: HashMap::new(),
                next_seq: 0,
            }),
        }
    }

    /// Maximum number of entries.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Return the value for `key` if it was stored with `digest`.
    ///
    /// A hit increments only this entry's hit counter. A digest mismatch is a
    /// miss and leaves the counter untouched.
    pub fn get(&self, key: &str, digest: &Digest) -> Option<V> {
        let mut state = self.state.lock().unwrap();
        let entry = state.entries.get_mut(key)?;
        if entry.digest != *digest {
            return None;
        }
        entry.hits += 1;
        Some(entry.value.clone())
    }

    /// Insert or replace the entry for `key`.
    ///
    /// Returns the key evicted to make room, if any.
    pub fn insert(&self, key: &str, digest: Digest, value: V) -> Option<String> {
        if self.limit == 0 {
            return None;
        }

        let mut state = self.state.lock().unwrap();

        if let Some(entry) = state.entries.get_mut(key) {
            entry.digest = digest;
            entry.value = value;
            entry.hits = 0;
            return None;
        }

        let evicted = if state.entries.len() >= self.limit {
            let victim = state
                .entries
                .iter()
                .min_by_key(|(_, entry)| (entry.hits, entry.seq))
                .map(|(name, _)| name.clone());
            if let Some(victim) = &victim {
                state.entries.remove(victim);
                tracing::debug!(key = %victim, "Evicted from hot tier");
            }
            victim
        } else {
            None
        };

        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.insert(
            key.to_owned(),
            Entry {
                digest,
                value,
                hits: 0,
                seq,
            },
        );

        evicted
    }

    /// Hit counter of `key`, if present.
    pub fn hits(&self, key: &str) -> Option<u64> {
        self.state.lock().unwrap().entries.get(key).map(|e| e.hits)
    }

    /// Whether `key` is present, regardless of digest.
    pub fn contains(&self, key: &str) -> bool {
        self.state.lock().unwrap().entries.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entries.len()
    }

    /// Whether the tier holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
