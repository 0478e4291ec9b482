//! # expiring-map - A Concurrent Map with Time-To-Live Expiry
//!
//! `expiring-map` behaves like an ordinary key-value map, except that entries
//! can be given a time-to-live (TTL). Once the TTL passes, the entry is
//! reclaimed in the background without the caller ever deleting it.
//!
//! ## Features
//!
//! - **Default or per-call TTL**: a map-wide TTL for `set`, overridable per write
//! - **Single sweeper**: one background Tokio task, however many entries expire
//! - **Sorted expiry index**: each sweep reads only the expired prefix
//! - **Safe refresh**: rewriting a key cancels the effect of its old expiry
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                             ExpiringMap                                 │
//! │                                                                         │
//! │   set / set_with_ttl / delete           get / contains_key / keys       │
//! │              │ (write lock)                     │ (read lock)           │
//! │              ▼                                  ▼                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │                          Keyspace                                │   │
//! │  │   ┌───────────────────────┐     ┌─────────────────────────────┐  │   │
//! │  │   │ Store                 │     │ TimeIndex                   │  │   │
//! │  │   │ key -> value, stamp   │     │ sorted by expiry deadline   │  │   │
//! │  │   └───────────────────────┘     └─────────────────────────────┘  │   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! │                                   ▲                                     │
//! │                                   │ flush (write lock)                  │
//! │                     ┌─────────────┴───────────────────────────────────┐ │
//! │                     │           ExpirySweeper                         │ │
//! │                     │      (Background Tokio Task)                    │ │
//! │                     └─────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use expiring_map::{ExpiringMap, MapConfig};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> expiring_map::Result<()> {
//!     // Every `set` on this map expires after 30 seconds
//!     let sessions = ExpiringMap::with_config(
//!         MapConfig::default()
//!             .with_ttl(Duration::from_secs(30))
//!             .with_sweep_interval(Duration::from_millis(50)),
//!     )?;
//!
//!     sessions.set("alice".to_string(), 42u64);
//!     sessions.set_with_ttl("bob".to_string(), 7, Duration::from_secs(5));
//!
//!     assert_eq!(sessions.get("alice"), Some(42));
//!     assert_eq!(sessions.len(), 2);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`map`]: The [`ExpiringMap`] facade
//! - [`storage`]: Store, time index, and background sweeper
//! - [`config`]: Construction parameters
//! - [`error`]: Error types
//!
//! ## Design Highlights
//!
//! ### Reconciled Expiry
//!
//! Every write gets a unique stamp, and every scheduled expiry carries the
//! stamp of the write that created it. The sweeper only removes a key when
//! the stamps still match, so a key rewritten after its expiry was scheduled
//! is never removed by that stale expiry.
//!
//! ### Bounded Staleness
//!
//! Reads never check deadlines. An expired entry stays visible until the next
//! sweep, so expiry is accurate to within one sweep interval.

pub mod config;
pub mod error;
pub mod map;
pub mod storage;

// Re-export commonly used types for convenience
pub use config::{MapConfig, DEFAULT_SWEEP_INTERVAL};
pub use error::{Error, Result};
pub use map::{ExpiringMap, MapStats};
pub use storage::{ExpirySweeper, Flush, FlushReport};

/// Version of expiring-map
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
