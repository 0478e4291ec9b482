//! Map Configuration
//!
//! The two construction parameters of an [`ExpiringMap`](crate::ExpiringMap):
//! the default time-to-live applied by `set`, and the cadence of the
//! background sweeper.
//!
//! ```
//! use expiring_map::MapConfig;
//! use std::time::Duration;
//!
//! let config = MapConfig::default()
//!     .with_ttl(Duration::from_secs(30))
//!     .with_sweep_interval(Duration::from_millis(50));
//! assert_eq!(config.ttl, Some(Duration::from_secs(30)));
//! ```

use crate::error::{Error, Result};
use std::time::Duration;

/// Default interval between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for an expiring map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapConfig {
    /// TTL applied by `set` (None = entries persist until deleted)
    pub ttl: Option<Duration>,

    /// Interval between sweeps (default: 100ms)
    pub sweep_interval: Duration,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            ttl: None,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl MapConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default TTL.
    ///
    /// A zero duration disables the default, the same as never calling this.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets the sweep interval.
    ///
    /// Smaller intervals shrink the window in which an expired entry is
    /// still visible, at the cost of more frequent background work.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// The default TTL that `set` actually applies.
    pub(crate) fn effective_ttl(&self) -> Option<Duration> {
        self.ttl.filter(|ttl| !ttl.is_zero())
    }

    /// Checks that the configuration can drive a sweeper.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(Error::ZeroSweepInterval);
        }
        Ok(())
    }
}
