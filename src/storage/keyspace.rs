//! Store and Time Index, Mutated Together
//!
//! A [`Keyspace`] pairs the [`Store`] with its [`TimeIndex`]. Every write that
//! carries a TTL records the value and schedules its expiry in one call, and
//! every flush drains and reconciles in one call. The owner wraps the whole
//! keyspace in a single lock, so neither step can interleave with the other.
//!
//! ## Reconciliation
//!
//! A scheduled expiry only removes its key when the store still holds the
//! exact write it was scheduled for:
//!
//! ```text
//!   put(k, v1, 10ms)  -> stamp 1, schedule (t+10, 1, k)
//!   put(k, v2, 10ms)  -> stamp 2, schedule (t+15, 2, k)
//!   flush at t+10     -> record stamp 1, store stamp 2: skip
//!   flush at t+15     -> record stamp 2, store stamp 2: remove
//! ```

use super::index::TimeIndex;
use super::store::Store;
use std::borrow::Borrow;
use std::hash::Hash;
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

/// Outcome of a single flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Records drained from the index
    pub drained: usize,
    /// Entries actually removed from the store
    pub removed: usize,
}

impl FlushReport {
    /// Records that were discarded because a newer write or a delete
    /// superseded them.
    pub fn stale(&self) -> usize {
        self.drained - self.removed
    }
}

/// The key-value store together with its pending expirations.
#[derive(Debug)]
pub struct Keyspace<K, V> {
    store: Store<K, V>,
    index: TimeIndex<K>,
}

impl<K, V> Default for Keyspace<K, V> {
    fn default() -> Self {
        Self {
            store: Store::default(),
            index: TimeIndex::default(),
        }
    }
}

impl<K: Eq + Hash + Clone, V> Keyspace<K, V> {
    /// Creates an empty keyspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a value and, if `ttl` is given, schedules its expiry.
    ///
    /// A TTL too large to represent as a deadline leaves the entry
    /// persistent.
    ///
    /// # Returns
    ///
    /// The previous value, if any.
    pub fn put(&mut self, key: K, value: V, ttl: Option<Duration>, now: Instant) -> Option<V> {
        match ttl.and_then(|ttl| now.checked_add(ttl)) {
            Some(expires_at) => {
                let (stamp, previous) = self.store.put(key.clone(), value, Some(expires_at));
                self.index.schedule(expires_at, stamp, key);
                previous
            }
            None => self.store.put(key, value, None).1,
        }
    }

    /// Removes a key unconditionally.
    ///
    /// Any expiry already scheduled for it stays in the index and is
    /// discarded when it drains.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.store.remove(key)
    }

    /// Drains every expiry due at `now` and removes the entries that have
    /// not been rewritten since their expiry was scheduled.
    ///
    /// Keys that are already gone are skipped silently. Flushing a keyspace
    /// with nothing due is a no-op.
    pub fn flush(&mut self, now: Instant) -> FlushReport {
        let due = self.index.drain_expired(now);
        let mut report = FlushReport {
            drained: due.len(),
            removed: 0,
        };

        for record in due {
            if self.store.last_set_stamp(&record.key) == Some(record.set_at) {
                self.store.remove(&record.key);
                report.removed += 1;
            } else {
                trace!(
                    stamp = record.set_at.get(),
                    "Skipping stale expiry record"
                );
            }
        }

        report
    }

    /// Removes every entry and every pending expiry.
    pub fn clear(&mut self) {
        self.store.clear();
        self.index.clear();
    }

    /// Read access to the store.
    pub fn store(&self) -> &Store<K, V> {
        &self.store
    }

    /// Read access to the pending expirations.
    pub fn index(&self) -> &TimeIndex<K> {
        &self.index
    }
}
