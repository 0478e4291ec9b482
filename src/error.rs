//! Error Types
//!
//! Lookups that miss are not errors: `get` returns `None`. Only the strict
//! operations (`delete`) and construction can fail.

use thiserror::Error;

/// Errors returned by [`ExpiringMap`](crate::ExpiringMap) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The key is not present in the map
    #[error("key not found")]
    KeyNotFound,

    /// A sweep interval of zero would spin the sweeper
    #[error("sweep interval must be greater than zero")]
    ZeroSweepInterval,

    /// The map was constructed outside of a Tokio runtime
    #[error("expiring map requires a running Tokio runtime to spawn its sweeper")]
    NoRuntime,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
