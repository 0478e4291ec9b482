//! Background Expiry Sweeper
//!
//! This module implements the background task that reclaims expired entries.
//! Reads never check deadlines, so without the sweeper an expired entry would
//! stay visible forever.
//!
//! ## Design
//!
//! The sweeper runs as a single Tokio task regardless of how many entries
//! carry a TTL, and:
//! 1. Waits for the next tick of a fixed interval (default: 100ms)
//! 2. Flushes the target: drains the due prefix of the time index and
//!    reconciles each record against the store
//! 3. Logs how many entries were reclaimed
//!
//! One task with a sorted index instead of a timer per key bounds the
//! background work, at the price of precision: an entry may remain visible
//! for up to one interval after its deadline.
//!
//! A panic inside a flush is caught and logged; the next tick sweeps again.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Something the sweeper can flush.
pub trait Flush: Send + Sync + 'static {
    /// Runs one sweep and returns the number of entries removed.
    fn flush(&self) -> usize;
}

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper as a background task.
    ///
    /// # Arguments
    ///
    /// * `target` - The keyspace to sweep
    /// * `interval` - Time between sweeps; must be non-zero
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime. [`ExpiringMap`] checks
    /// for a runtime before starting its sweeper.
    ///
    /// [`ExpiringMap`]: crate::ExpiringMap
    pub fn start<F: Flush>(target: Arc<F>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(sweeper_loop(target, interval, shutdown_rx));

        info!(
            interval_ms = interval.as_millis(),
            "Background expiry sweeper started"
        );

        Self { shutdown_tx }
    }

    /// Stops the expiry sweeper.
    ///
    /// No flush starts after this returns. A flush already in progress
    /// runs to completion.
    pub fn stop(&self) {
        if !*self.shutdown_tx.borrow() {
            let _ = self.shutdown_tx.send(true);
            info!("Background expiry sweeper stopped");
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop<F: Flush>(
    target: Arc<F>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // The first tick completes immediately
    ticker.tick().await;

    loop {
        // Wait for the interval or shutdown signal
        tokio::select! {
            _ = ticker.tick() => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        // A stop that raced with the tick wins
        if *shutdown_rx.borrow() {
            debug!("Expiry sweeper received shutdown signal");
            return;
        }

        match panic::catch_unwind(AssertUnwindSafe(|| target.flush())) {
            Ok(0) => {}
            Ok(removed) => debug!(removed = removed, "Expired keys cleaned up"),
            Err(payload) => {
                let reason = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("unknown panic");
                error!(reason = reason, "Expiry sweep failed, retrying next tick");
            }
        }
    }
}
