//! Time-Ordered Expiry Index
//!
//! Pending expirations are kept in a `BTreeMap` keyed by
//! `(expires_at, set_at)`. Because stamps are unique, every record has a
//! distinct key, and records sharing a deadline come out in write order.
//!
//! Draining splits the map at `now`, so the sweeper only touches the expired
//! prefix and never scans records that are still pending.

use super::store::Stamp;
use std::collections::BTreeMap;
use std::mem;
use tokio::time::Instant;

/// A pending expiration for one write of `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledExpiry<K> {
    /// When the write becomes eligible for removal
    pub expires_at: Instant,
    /// Stamp of the write this record belongs to
    pub set_at: Stamp,
    /// The key to remove
    pub key: K,
}

/// Ordered collection of scheduled expirations.
#[derive(Debug)]
pub struct TimeIndex<K> {
    records: BTreeMap<(Instant, Stamp), K>,
}

impl<K> Default for TimeIndex<K> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }
}

impl<K> TimeIndex<K> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `key` to expire at `expires_at`.
    ///
    /// Existing records for the same key are left alone.
    pub fn schedule(&mut self, expires_at: Instant, set_at: Stamp, key: K) {
        self.records.insert((expires_at, set_at), key);
    }

    /// Removes and returns every record with `expires_at <= now`, in deadline order.
    pub fn drain_expired(&mut self, now: Instant) -> Vec<ScheduledExpiry<K>> {
        let pending = self.records.split_off(&(now, Stamp::MAX));
        let due = mem::replace(&mut self.records, pending);

        due.into_iter()
            .map(|((expires_at, set_at), key)| ScheduledExpiry {
                expires_at,
                set_at,
                key,
            })
            .collect()
    }

    /// Returns the earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.records.keys().next().map(|(at, _)| *at)
    }

    /// Returns the number of pending records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing is scheduled.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drops every pending record.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
