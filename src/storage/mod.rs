//! Storage Module
//!
//! This module provides the expiration engine behind the map: the store, the
//! time-ordered index of pending expirations, and the background sweeper.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 RwLock<Keyspace>                            │
//! │  ┌───────────────────────┐   ┌───────────────────────────┐  │
//! │  │ Store                 │   │ TimeIndex                 │  │
//! │  │ key -> (value, stamp) │   │ (expires_at, stamp) -> key│  │
//! │  └───────────────────────┘   └───────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                            │ flush()
//!              ┌─────────────┴─────────────┐
//!              │     ExpirySweeper         │
//!              │  (Background Tokio Task)  │
//!              └───────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use expiring_map::storage::Keyspace;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let mut keyspace = Keyspace::new();
//! let now = Instant::now();
//!
//! keyspace.put("session", "token123", Some(Duration::from_secs(60)), now);
//! keyspace.put("name", "Ariz", None, now);
//!
//! let report = keyspace.flush(now + Duration::from_secs(60));
//! assert_eq!(report.removed, 1);
//! assert_eq!(keyspace.store().get("name"), Some(&"Ariz"));
//! ```

pub mod expiry;
pub mod index;
pub mod keyspace;
pub mod store;

// Re-export commonly used types
pub use expiry::{ExpirySweeper, Flush};
pub use index::{ScheduledExpiry, TimeIndex};
pub use keyspace::{FlushReport, Keyspace};
pub use store::{Entry, Stamp, Store};
