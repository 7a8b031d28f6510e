// SPDX-License-Identifier: Apache-2.0

//! Ticket records and the reservation wire envelope.
//!
//! Reservation fields are a pure function of the ticket index so runs are
//! reproducible; the envelope carries the consistency-check and backup
//! collaborator addresses *through* the request, letting one target
//! deployment be pointed at different verification deployments without a
//! redeploy.

use serde::{Deserialize, Serialize};

/// A single reservable inventory unit as stored in the durable table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub id: u64,
    pub taken: bool,
    pub res_email: Option<String>,
    pub res_name: Option<String>,
    pub res_card: Option<String>,
    /// Monotonic version for the target's optimistic-concurrency detection.
    /// Written once at seed time, never read back by the harness.
    pub version: u64,
}

impl TicketRecord {
    /// A fresh, unreserved record for ticket `i`.
    pub fn fresh(i: u64) -> Self {
        Self {
            id: i,
            taken: false,
            res_email: None,
            res_name: None,
            res_card: None,
            version: 0,
        }
    }

    /// Durable-store key for ticket `i`.
    pub fn key(i: u64) -> String {
        format!("ticket-{}", i)
    }
}

/// Purchaser fields attached by a reservation, derived from the ticket index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationFields {
    pub res_email: String,
    pub res_name: String,
    pub res_card: String,
}

impl ReservationFields {
    /// Deterministic fields for ticket `i` - same index, same values.
    pub fn for_ticket(i: u64) -> Self {
        Self {
            res_email: format!("test_{}@test.com", i),
            res_name: format!("Test Name{}", i),
            res_card: format!("{}xxxx1234", i),
        }
    }
}

/// The `args` block of a reserve request: the values being written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveArgs {
    pub id: u64,
    pub taken: bool,
    #[serde(flatten)]
    pub fields: ReservationFields,
}

impl ReserveArgs {
    /// Reservation write for ticket `i`.
    pub fn for_ticket(i: u64) -> Self {
        Self {
            id: i,
            taken: true,
            fields: ReservationFields::for_ticket(i),
        }
    }
}

/// The JSON envelope POSTed to `/reserve`.
///
/// `remoteUrl` and `backup` are the collaborator addresses the target is
/// contracted to invoke while applying the write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveRequest {
    #[serde(rename = "remoteUrl")]
    pub remote_url: String,
    pub backup: String,
    pub args: ReserveArgs,
}

impl ReserveRequest {
    /// Envelope reserving ticket `i` through the given collaborators.
    pub fn new(i: u64, consistency_check_url: &str, backup_url: &str) -> Self {
        Self {
            remote_url: consistency_check_url.to_string(),
            backup: backup_url.to_string(),
            args: ReserveArgs::for_ticket(i),
        }
    }
}
