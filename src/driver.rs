// SPDX-License-Identifier: Apache-2.0

//! The reservation protocol driver.
//!
//! Issues a reservation that mutates the target, routes the
//! consistency-check and backup collaborator addresses through the request,
//! and times the whole round trip. The measured window includes any
//! target-side time spent invoking the callback and writing the backup;
//! the benchmark measures the combined cross-system protocol, not just the
//! local write.
//!
//! One driver serves both deployment shapes; the edge benchmark and the
//! lambda baseline differ only in [`ReserveMode`].

use std::time::Instant;

use serde::Serialize;

use crate::client::BenchClient;
use crate::ticket::{ReserveArgs, ReserveRequest};

/// Payload shape and routing for reserve calls.
#[derive(Debug, Clone)]
pub enum ReserveMode {
    /// Full envelope POSTed to `{base}/reserve`, collaborator URLs embedded.
    Orchestrated {
        callback_url: String,
        backup_url: String,
    },
    /// Bare ticket fields POSTed to the base URL itself (baseline comparator).
    Direct,
}

/// Outcome of a single reserve call. Produced for every call, success or
/// failure - degraded paths are timed too.
#[derive(Debug, Clone)]
pub struct ReserveOutcome {
    /// Ticket index the call targeted.
    pub ticket: u64,
    /// Round-trip time in milliseconds, always recorded.
    pub latency_ms: f64,
    /// HTTP status, or `None` if the transport failed before a response.
    pub status: Option<u16>,
    /// Response body (or transport error text) for inspection.
    pub body: String,
}

impl ReserveOutcome {
    /// Whether the target acknowledged the reservation.
    pub fn is_success(&self) -> bool {
        self.status == Some(200)
    }
}

/// Drives the reservation protocol against one target.
#[derive(Debug, Clone)]
pub struct ReservationDriver {
    client: BenchClient,
    mode: ReserveMode,
}

impl ReservationDriver {
    pub fn new(client: BenchClient, mode: ReserveMode) -> Self {
        Self { client, mode }
    }

    /// The underlying client, shared with the trial harness for the
    /// populate/clear operations around each burst.
    pub fn client(&self) -> &BenchClient {
        &self.client
    }

    /// Whether this driver targets the orchestrated (cache-managed) service.
    pub fn is_orchestrated(&self) -> bool {
        matches!(self.mode, ReserveMode::Orchestrated { .. })
    }

    /// Reserve ticket `i` and measure the round trip.
    ///
    /// No bounds validation happens here: any index requested is submitted,
    /// and rejecting out-of-range ids is the target's contract.
    pub async fn reserve_ticket(&self, i: u64) -> ReserveOutcome {
        match &self.mode {
            ReserveMode::Orchestrated {
                callback_url,
                backup_url,
            } => {
                let url = format!("{}/reserve", self.client.base_url());
                let payload = ReserveRequest::new(i, callback_url, backup_url);
                self.timed_reserve(i, &url, &payload).await
            }
            ReserveMode::Direct => {
                let payload = ReserveArgs::for_ticket(i);
                let url = self.client.base_url().to_string();
                self.timed_reserve(i, &url, &payload).await
            }
        }
    }

    async fn timed_reserve<T: Serialize>(&self, i: u64, url: &str, payload: &T) -> ReserveOutcome {
        let start = Instant::now();
        let result = self.client.post_reserve(url, payload).await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let outcome = match result {
            Ok((status, body)) => ReserveOutcome {
                ticket: i,
                latency_ms,
                status: Some(status),
                body,
            },
            Err(e) => ReserveOutcome {
                ticket: i,
                latency_ms,
                status: None,
                body: e.to_string(),
            },
        };

        if outcome.is_success() {
            tracing::debug!(
                ticket = i,
                latency_ms = outcome.latency_ms,
                body = %outcome.body,
                "reserved"
            );
        } else {
            tracing::warn!(
                ticket = i,
                latency_ms = outcome.latency_ms,
                status = ?outcome.status,
                detail = %outcome.body,
                "reserve_ticket failed"
            );
        }
        outcome
    }

    /// Time one `PUT /direct_invoke` round trip. Status is never validated.
    pub async fn time_direct_invoke(&self) -> f64 {
        let start = Instant::now();
        let result = self.client.put_direct_invoke().await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(status) => tracing::debug!(status, latency_ms, "direct_invoke"),
            Err(e) => tracing::warn!(error = %e, latency_ms, "direct_invoke transport error"),
        }
        latency_ms
    }
}
