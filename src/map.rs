//! The Expiring Map
//!
//! [`ExpiringMap`] is the public face of the crate: a concurrent key-value map
//! whose entries disappear after a time-to-live. It owns the shared
//! [`Keyspace`] and the [`ExpirySweeper`] that reclaims expired entries.
//!
//! ## Concurrency Model
//!
//! The store and the time index live behind one `RwLock`:
//!
//! - Reads (`get`, `contains_key`, `len`, iteration) take the read lock.
//! - Writes take the write lock for both the store update and the scheduling,
//!   so a write lands entirely before or entirely after any flush.
//! - A flush holds the write lock across drain and reconciliation.
//!
//! ## Staleness
//!
//! Reads do not check deadlines. An entry stays visible until the sweeper
//! reclaims it, which happens within one sweep interval of its deadline.
//!
//! ## Iteration
//!
//! `keys`, `values` and `items` return iterators over a snapshot taken when
//! they are called, in insertion order. Mutating the map while iterating is allowed and does not
//! affect an iterator already handed out; call the method again to see the
//! current contents.

use crate::config::MapConfig;
use crate::error::{Error, Result};
use crate::storage::{ExpirySweeper, Flush, Keyspace};
use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::Instant;

/// State shared between the map and its sweeper.
struct Shared<K, V> {
    keyspace: RwLock<Keyspace<K, V>>,

    /// Statistics: total set operations
    set_count: AtomicU64,

    /// Statistics: successful deletes
    del_count: AtomicU64,

    /// Statistics: entries removed by expiry
    expired_count: AtomicU64,

    /// Statistics: expiry records discarded by reconciliation
    stale_count: AtomicU64,

    /// Statistics: completed flushes
    sweep_count: AtomicU64,
}

impl<K, V> Shared<K, V> {
    fn new() -> Self {
        Self {
            keyspace: RwLock::new(Keyspace::default()),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            expired_count: AtomicU64::new(0),
            stale_count: AtomicU64::new(0),
            sweep_count: AtomicU64::new(0),
        }
    }

    // Every keyspace mutation leaves it structurally valid, so a poisoned
    // lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Keyspace<K, V>> {
        self.keyspace.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Keyspace<K, V>> {
        self.keyspace.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Flush for Shared<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    fn flush(&self) -> usize {
        let report = self.write().flush(Instant::now());

        self.sweep_count.fetch_add(1, Ordering::Relaxed);
        if report.drained > 0 {
            self.expired_count
                .fetch_add(report.removed as u64, Ordering::Relaxed);
            self.stale_count
                .fetch_add(report.stale() as u64, Ordering::Relaxed);
        }

        report.removed
    }
}

/// A concurrent map whose entries expire after a time-to-live.
///
/// # Thread Safety
///
/// All operations take `&self`; wrap the map in an `Arc` to share it between
/// threads or tasks.
///
/// # Example
///
/// ```
/// use expiring_map::ExpiringMap;
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> expiring_map::Result<()> {
///     let cache = ExpiringMap::new()?;
///
///     cache.set("abc", "persistent");
///     cache.set_with_ttl("123", "expires", Duration::from_millis(50));
///     assert!(cache.contains_key("abc"));
///     assert!(cache.contains_key("123"));
///
///     tokio::time::sleep(Duration::from_millis(300)).await;
///     assert!(cache.contains_key("abc"));
///     assert!(!cache.contains_key("123"));
///     Ok(())
/// }
/// ```
pub struct ExpiringMap<K, V> {
    shared: Arc<Shared<K, V>>,
    config: MapConfig,
    /// Stops the sweeper when the map is dropped
    _sweeper: ExpirySweeper,
}

impl<K, V> std::fmt::Debug for ExpiringMap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringMap")
            .field("config", &self.config)
            .field("set_count", &self.shared.set_count.load(Ordering::Relaxed))
            .field(
                "expired_count",
                &self.shared.expired_count.load(Ordering::Relaxed),
            )
            .finish()
    }
}

impl<K, V> ExpiringMap<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a map whose entries persist until deleted, unless written
    /// with [`set_with_ttl`](Self::set_with_ttl).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoRuntime`] when called outside a Tokio runtime.
    pub fn new() -> Result<Self> {
        Self::with_config(MapConfig::default())
    }

    /// Creates a map where every `set` expires after `ttl`.
    pub fn with_ttl(ttl: Duration) -> Result<Self> {
        Self::with_config(MapConfig::default().with_ttl(ttl))
    }

    /// Creates a map with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroSweepInterval`] for an invalid configuration and
    /// [`Error::NoRuntime`] when called outside a Tokio runtime.
    pub fn with_config(config: MapConfig) -> Result<Self> {
        config.validate()?;

        // The sweeper is a Tokio task
        Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let shared = Arc::new(Shared::new());
        let sweeper = ExpirySweeper::start(Arc::clone(&shared), config.sweep_interval);

        Ok(Self {
            shared,
            config,
            _sweeper: sweeper,
        })
    }

    /// Sets a key-value pair, applying the map's default TTL if it has one.
    ///
    /// # Returns
    ///
    /// The previous value, if the key was present.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.insert(key, value, self.config.effective_ttl())
    }

    /// Sets a key-value pair that expires after `ttl`, whatever the map's
    /// default.
    ///
    /// Writing a key again schedules a fresh expiry; the earlier one no
    /// longer applies.
    pub fn set_with_ttl(&self, key: K, value: V, ttl: Duration) -> Option<V> {
        self.insert(key, value, Some(ttl))
    }

    fn insert(&self, key: K, value: V, ttl: Option<Duration>) -> Option<V> {
        self.shared.set_count.fetch_add(1, Ordering::Relaxed);
        self.shared.write().put(key, value, ttl, Instant::now())
    }

    /// Gets the value for a key.
    ///
    /// An entry past its deadline is returned until the sweeper removes it.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.read().store().get(key).cloned()
    }

    /// Deletes a key from the map.
    ///
    /// # Errors
    ///
    /// Returns [`Error::KeyNotFound`] if the key is absent.
    pub fn delete<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.shared.write().remove(key).ok_or(Error::KeyNotFound)?;
        self.shared.del_count.fetch_add(1, Ordering::Relaxed);
        Ok(value)
    }

    /// Checks if a key is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared.read().store().contains_key(key)
    }

    /// Gets the time left before a key is due to expire.
    ///
    /// # Returns
    ///
    /// - `Some(Some(remaining))` if the key exists and has a deadline
    /// - `Some(None)` if the key exists but never expires
    /// - `None` if the key doesn't exist
    pub fn ttl<Q>(&self, key: &Q) -> Option<Option<Duration>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.shared
            .read()
            .store()
            .entry(key)
            .map(|entry| entry.remaining(Instant::now()))
    }

    /// Returns the number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.shared.read().store().len()
    }

    /// Returns true if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over a snapshot of the keys.
    pub fn keys(&self) -> std::vec::IntoIter<K> {
        let keyspace = self.shared.read();
        let keys: Vec<K> = keyspace.store().iter().map(|(k, _)| k.clone()).collect();
        keys.into_iter()
    }

    /// Returns an iterator over a snapshot of the values.
    pub fn values(&self) -> std::vec::IntoIter<V> {
        let keyspace = self.shared.read();
        let values: Vec<V> = keyspace.store().iter().map(|(_, v)| v.clone()).collect();
        values.into_iter()
    }

    /// Returns an iterator over a snapshot of the key-value pairs.
    pub fn items(&self) -> std::vec::IntoIter<(K, V)> {
        let keyspace = self.shared.read();
        let items: Vec<(K, V)> = keyspace
            .store()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        items.into_iter()
    }

    /// Removes every entry and every pending expiry.
    pub fn clear(&self) {
        self.shared.write().clear();
    }

    /// Runs one sweep immediately, outside the background cadence.
    ///
    /// # Returns
    ///
    /// The number of entries removed. Flushing with nothing due is a no-op.
    pub fn flush(&self) -> usize {
        self.shared.flush()
    }

    /// Returns the number of expiry records waiting in the index.
    ///
    /// Superseded records are counted until they drain.
    pub fn pending_expirations(&self) -> usize {
        self.shared.read().index().len()
    }

    /// Returns map statistics.
    pub fn stats(&self) -> MapStats {
        let (keys, pending_expirations) = {
            let keyspace = self.shared.read();
            (keyspace.store().len(), keyspace.index().len())
        };

        MapStats {
            keys,
            pending_expirations,
            sets: self.shared.set_count.load(Ordering::Relaxed),
            deletes: self.shared.del_count.load(Ordering::Relaxed),
            expired: self.shared.expired_count.load(Ordering::Relaxed),
            stale_skipped: self.shared.stale_count.load(Ordering::Relaxed),
            sweeps: self.shared.sweep_count.load(Ordering::Relaxed),
        }
    }

    /// Returns the configuration the map was built with.
    pub fn config(&self) -> &MapConfig {
        &self.config
    }
}

/// Map statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapStats {
    /// Number of entries currently stored
    pub keys: usize,
    /// Expiry records waiting in the index
    pub pending_expirations: usize,
    /// Total set operations
    pub sets: u64,
    /// Total successful deletes
    pub deletes: u64,
    /// Total entries removed by expiry
    pub expired: u64,
    /// Total expiry records discarded because the entry was rewritten or deleted
    pub stale_skipped: u64,
    /// Total completed sweeps
    pub sweeps: u64,
}
