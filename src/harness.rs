// SPDX-License-Identifier: Apache-2.0

//! The trial harness.
//!
//! Runs the per-run state machine, strictly sequentially:
//!
//! `INIT -> (PROVISION -> SETTLE -> RESERVE×N -> CLEAR -> SETTLE)×trials -> EXPORT`
//!
//! Settle delays are blocking sleeps giving the target's asynchronous
//! backup/consistency machinery time to quiesce between phases. Reservations
//! within a trial are issued in increasing ticket-id order and their samples
//! recorded in that order; that ordering is what makes the exported columns
//! comparable across trials and across harness variants.

use std::time::Duration;

use crate::config::BenchConfig;
use crate::driver::ReservationDriver;
use crate::error::{BenchError, BenchResult};
use crate::matrix::{TrialMatrix, TrialRow};
use crate::store::Provisioner;

/// Orchestrates trials against one target through one driver.
pub struct TrialHarness<P> {
    driver: ReservationDriver,
    store: P,
    tickets: u64,
    trials: u32,
    settle_delay: Duration,
}

impl<P: Provisioner> TrialHarness<P> {
    pub fn new(driver: ReservationDriver, store: P, config: &BenchConfig) -> Self {
        Self {
            driver,
            store,
            tickets: config.tickets,
            trials: config.trials,
            settle_delay: config.settle_delay(),
        }
    }

    /// Run every trial and return the accumulated matrix.
    ///
    /// A fatal error before any sample of the first trial aborts with no
    /// matrix at all. A fatal error later converts the in-progress trial to
    /// a failed row and stops the run; rows completed so far survive for
    /// export.
    pub async fn run(&self) -> BenchResult<TrialMatrix> {
        let mut matrix = TrialMatrix::new(self.tickets as usize);

        for trial in 0..self.trials {
            tracing::info!(trial, "starting trial");
            match self.run_trial().await {
                Ok(samples) => matrix.push_row(TrialRow::Completed(samples)),
                Err((samples, error)) => {
                    if trial == 0 && samples.is_empty() {
                        return Err(error);
                    }
                    tracing::error!(trial, error = %error, "trial aborted; stopping run");
                    matrix.push_row(TrialRow::Failed {
                        samples,
                        reason: error.to_string(),
                    });
                    break;
                }
            }
        }

        Ok(matrix)
    }

    /// One provision/reserve-all/clear cycle. On failure, returns whatever
    /// samples were collected alongside the error.
    async fn run_trial(&self) -> Result<Vec<f64>, (Vec<f64>, BenchError)> {
        // PROVISION: durable store first, then the target's own cache when
        // the target manages one.
        self.store
            .reset(self.tickets)
            .await
            .map_err(|e| (Vec::new(), BenchError::from(e)))?;
        if self.driver.is_orchestrated() {
            self.driver
                .client()
                .populate_tickets(self.tickets)
                .await
                .map_err(|e| (Vec::new(), e))?;
        }

        self.settle().await;

        // RESERVE×N: id order, one sample per call, failures included.
        let mut samples = Vec::with_capacity(self.tickets as usize);
        for i in 0..self.tickets {
            let outcome = self.driver.reserve_ticket(i).await;
            samples.push(outcome.latency_ms);
        }

        // CLEAR: only a cache-managed target has anything to evict.
        if self.driver.is_orchestrated() {
            match self.driver.client().clear_cache().await {
                Ok(body) => tracing::debug!(body = %body, "cleared cache"),
                Err(e) => return Err((samples, e)),
            }
        }

        self.settle().await;
        Ok(samples)
    }

    async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
    }
}
