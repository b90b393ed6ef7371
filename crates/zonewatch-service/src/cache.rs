//! TTL-keyed in-memory cache with pattern invalidation.
//!
//! Entries expire lazily on read. There is no eviction policy beyond TTL and
//! the explicit `prune` sweep; recomputation is cheap, so growth between
//! sweeps is tolerated.

use dashmap::DashMap;
use regex::Regex;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

struct Slot<V> {
    value: V,
    stored_at: Instant,
    ttl: Duration,
}

impl<V> Slot<V> {
    fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) > self.ttl
    }
}

pub struct TtlCache<V> {
    slots: DashMap<String, Slot<V>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            default_ttl,
        }
    }

    /// Fetch a value if present and still within its TTL. Expired entries are
    /// evicted on the way out.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let expired = match self.slots.get(key) {
            Some(slot) if slot.expired(now) => true,
            Some(slot) => return Some(slot.value.clone()),
            None => return None,
        };
        if expired {
            self.slots.remove(key);
        }
        None
    }

    /// Store a value, overriding the default TTL per call if requested.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        self.slots.insert(
            key.into(),
            Slot {
                value,
                stored_at: Instant::now(),
                ttl: ttl.unwrap_or(self.default_ttl),
            },
        );
    }

    pub fn delete(&self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    /// Remove every key matching the pattern. Returns how many were dropped.
    pub fn invalidate_pattern(&self, pattern: &Regex) -> usize {
        let keys: Vec<String> = self
            .slots
            .iter()
            .filter(|entry| pattern.is_match(entry.key()))
            .map(|entry| entry.key().clone())
            .collect();

        let mut removed = 0;
        for key in keys {
            if self.slots.remove(&key).is_some() {
                removed += 1;
            }
        }
        removed
    }

    /// Sweep out expired entries, then the oldest entries beyond `max_entries`.
    pub fn prune(&self, max_entries: usize) {
        let now = Instant::now();
        let mut entries: Vec<(String, Instant)> = self
            .slots
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().stored_at))
            .collect();

        for entry in self
            .slots
            .iter()
            .filter(|entry| entry.value().expired(now))
            .map(|entry| entry.key().clone())
            .collect::<Vec<_>>()
        {
            self.slots.remove(&entry);
        }

        if self.slots.len() <= max_entries {
            return;
        }

        entries.sort_by_key(|(_, stored_at)| *stored_at);
        for (key, _) in entries {
            if self.slots.len() <= max_entries {
                break;
            }
            self.slots.remove(&key);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&self) {
        self.slots.clear();
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
