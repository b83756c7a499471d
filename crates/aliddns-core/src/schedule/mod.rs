//! Fixed-interval scheduler for the reconciliation loop
//!
//! Runs one cycle immediately at startup (so misconfiguration is surfaced
//! right away), then fires one cycle per interval until the process is
//! stopped. Every error reaching the cycle boundary is logged and
//! swallowed: the scheduler itself never fails, and the interval is the
//! only retry mechanism.
//!
//! Cycles run to completion inline, so firings never overlap; a tick that
//! lands while a cycle is still running is skipped.

use crate::error::Result;
use crate::reconcile::Reconciler;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

/// Default firing interval between reconciliation cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(600);

/// Drives the reconciler on a fixed interval, forever
pub struct Scheduler {
    reconciler: Reconciler,
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler with the default 10-minute interval
    pub fn new(reconciler: Reconciler) -> Self {
        Self::with_interval(reconciler, DEFAULT_INTERVAL)
    }

    /// Create a scheduler with a custom interval
    pub fn with_interval(reconciler: Reconciler, interval: Duration) -> Self {
        Self {
            reconciler,
            interval,
        }
    }

    /// Run the loop until a Ctrl-C / SIGINT is received
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Internal run implementation that accepts an optional shutdown signal
    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        info!(interval = ?self.interval, "scheduler started");

        // First cycle fires synchronously at startup.
        self.fire().await;

        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        if let Some(mut rx) = shutdown_rx {
            // Test mode: wait for the provided shutdown signal
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.fire().await,

                    _ = &mut rx => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }
        } else {
            // Production mode: wait for SIGINT
            loop {
                tokio::select! {
                    _ = ticker.tick() => self.fire().await,

                    _ = tokio::signal::ctrl_c() => {
                        info!("shutdown signal received");
                        break;
                    }
                }
            }
        }

        info!("scheduler stopped");
        Ok(())
    }

    /// Fire one cycle, absorbing any error at the cycle boundary
    async fn fire(&self) {
        if let Err(e) = self.reconciler.run_cycle().await {
            // Logged only; the next scheduled firing is the retry.
            error!("reconciliation cycle failed: {}", e);
        }
    }

    /// Test-only helper to run the loop with a controlled shutdown signal
    ///
    /// Contract tests need to stop the loop deterministically without
    /// waiting on wall-clock time or OS signals. Production code should use
    /// [`run`](Scheduler::run) instead.
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }
}
