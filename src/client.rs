// SPDX-License-Identifier: Apache-2.0

//! Thin HTTP client for the target service under test.
//!
//! One pooled [`reqwest::Client`] is built at construction and reused for
//! every call, so connection setup never pollutes a latency sample. Status
//! handling follows the harness taxonomy: populate/clear/get are fatal on
//! non-200, listing is observational only, and reserve/direct-invoke hand
//! raw results to the protocol driver, which owns their semantics.

use serde::Serialize;

use crate::error::{BenchError, BenchResult};

/// Persistent-connection client for one target base URL.
#[derive(Debug, Clone)]
pub struct BenchClient {
    http: reqwest::Client,
    base: String,
}

impl BenchClient {
    /// Build a client for the given target base URL (no trailing slash).
    pub fn new(base: impl Into<String>) -> BenchResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|source| BenchError::Transport {
                op: "build_client",
                source,
            })?;
        Ok(Self {
            http,
            base: base.into(),
        })
    }

    /// Target base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Tell the target to seed its cache with `n` tickets. Fatal on non-200.
    pub async fn populate_tickets(&self, n: u64) -> BenchResult<()> {
        let url = format!("{}/populate_tickets", self.base);
        let resp = self
            .http
            .post(&url)
            .body(n.to_string())
            .send()
            .await
            .map_err(|source| BenchError::Transport {
                op: "populate_tickets",
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(BenchError::Protocol {
                op: "populate_tickets",
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Tell the target to evict its cache layer. Fatal on non-200; the
    /// response body is returned for logging.
    pub async fn clear_cache(&self) -> BenchResult<String> {
        let url = format!("{}/clear_cache", self.base);
        let resp = self
            .http
            .post(&url)
            .send()
            .await
            .map_err(|source| BenchError::Transport {
                op: "clear_cache",
                source,
            })?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(BenchError::Protocol {
                op: "clear_cache",
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// List available tickets. Observational only: failures are logged and
    /// swallowed, never propagated.
    pub async fn avail_tickets(&self) {
        match self.http.get(&self.base).send().await {
            Ok(resp) if resp.status().is_success() => {
                let body = resp.text().await.unwrap_or_default();
                tracing::info!(listing = %body, "available tickets");
            }
            Ok(resp) => {
                tracing::warn!(status = resp.status().as_u16(), "avail_tickets error");
            }
            Err(e) => {
                tracing::warn!(error = %e, "avail_tickets transport error");
            }
        }
    }

    /// Fetch ticket `i`. Fatal on non-200.
    pub async fn get_ticket(&self, i: u64) -> BenchResult<String> {
        let url = format!("{}/get_ticket/{}", self.base, i);
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| BenchError::Transport {
                op: "get_ticket",
                source,
            })?;

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(BenchError::Protocol {
                op: "get_ticket",
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    /// POST a reservation payload to `url`, returning status and body.
    /// Status semantics belong to the driver; transport errors bubble raw.
    pub(crate) async fn post_reserve<T: Serialize>(
        &self,
        url: &str,
        payload: &T,
    ) -> Result<(u16, String), reqwest::Error> {
        let resp = self.http.post(url).json(payload).send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Ok((status, body))
    }

    /// PUT the direct-invoke endpoint, returning the status. Never validated.
    pub(crate) async fn put_direct_invoke(&self) -> Result<u16, reqwest::Error> {
        let url = format!("{}/direct_invoke", self.base);
        let resp = self.http.put(&url).send().await?;
        let status = resp.status().as_u16();
        // Drain the body so the timed window covers the full response.
        let _ = resp.text().await;
        Ok(status)
    }
}
