//! Key-Value Store with Write Stamps
//!
//! The store is the single source of truth for whether a key currently has a
//! live value. Every `put` records a fresh [`Stamp`], which the sweeper later
//! compares against the stamp carried by a scheduled expiry.
//!
//! The store itself is not synchronized; it lives inside the map's lock
//! together with the [`TimeIndex`](super::TimeIndex) so that a write and its
//! scheduling happen as one step.
//!
//! Entries iterate in insertion order. Overwriting a key keeps its position;
//! removing a key keeps the order of the others.

use std::borrow::Borrow;
use indexmap::IndexMap;
use std::hash::Hash;
use tokio::time::Instant;

/// Logical write timestamp.
///
/// Stamps come from a per-store counter, so they are strictly increasing and
/// unique even when several writes land on the same clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Stamp(u64);

impl Stamp {
    /// Upper bound used for range queries in the time index.
    pub(crate) const MAX: Stamp = Stamp(u64::MAX);

    /// Returns the raw counter value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A stored value with its write stamp and optional deadline.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The actual value stored
    pub value: V,
    /// Stamp of the write that produced this entry
    pub stamp: Stamp,
    /// When this entry is due to expire (None = never expires)
    pub expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    /// Returns the remaining time before the deadline, or None if no expiry.
    ///
    /// An entry past its deadline but not yet swept reports zero.
    pub fn remaining(&self, now: Instant) -> Option<std::time::Duration> {
        self.expires_at.map(|exp| exp.saturating_duration_since(now))
    }
}

/// The key-to-entry mapping.
#[derive(Debug)]
pub struct Store<K, V> {
    entries: IndexMap<K, Entry<V>>,
    next_stamp: u64,
}

impl<K, V> Default for Store<K, V> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
            next_stamp: 0,
        }
    }
}

impl<K: Eq + Hash, V> Store<K, V> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a value, stamping it as the newest write.
    ///
    /// # Returns
    ///
    /// The stamp of this write and the previous value, if any.
    pub fn put(&mut self, key: K, value: V, expires_at: Option<Instant>) -> (Stamp, Option<V>) {
        self.next_stamp += 1;
        let stamp = Stamp(self.next_stamp);

        let previous = self.entries.insert(
            key,
            Entry {
                value,
                stamp,
                expires_at,
            },
        );

        (stamp, previous.map(|e| e.value))
    }

    /// Gets the value for a key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|e| &e.value)
    }

    /// Gets the full entry for a key (including metadata).
    pub fn entry<Q>(&self, key: &Q) -> Option<&Entry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key)
    }

    /// Removes a key unconditionally.
    ///
    /// Later entries shift down one slot. Returns the removed value, or
    /// `None` if the key was absent.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.shift_remove(key).map(|e| e.value)
    }

    /// Returns the stamp recorded by the most recent `put` of `key`.
    pub fn last_set_stamp<Q>(&self, key: &Q) -> Option<Stamp>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(key).map(|e| e.stamp)
    }

    /// Checks if a key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(key)
    }

    /// Returns the number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, e)| (k, &e.value))
    }

    /// Removes every entry. The stamp counter keeps counting.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
