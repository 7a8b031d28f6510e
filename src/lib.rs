// SPDX-License-Identifier: Apache-2.0

//! Ticket Reservation Benchmark Harness
//!
//! Measures round-trip latency of a cache/edge-backed ticket reservation
//! service whose durable state lives in DynamoDB. Each reservation routes a
//! consistency-check callback URL and a backup-write URL *through* the
//! request, so the measured latency covers the full cross-system protocol:
//! the write, the out-of-band validation against the backup record, and the
//! backup mirror itself.
//!
//! # Run shape
//!
//! A run is a fixed number of strictly sequential trials. Each trial
//! provisions the durable store fresh, settles, reserves every ticket in id
//! order while timing each call, clears the target's cache, and settles
//! again. The resulting trial × ticket latency matrix is exported once, as
//! CSV, at the end.
//!
//! # Variants
//!
//! The edge benchmark, the direct-to-lambda baseline, and the direct-invoke
//! runtime probe share one driver and one harness; they differ only in
//! configuration (target address and payload shape).

pub mod client;
pub mod config;
pub mod driver;
pub mod error;
pub mod harness;
pub mod matrix;
pub mod reporter;
pub mod store;
pub mod ticket;

pub use client::BenchClient;
pub use config::BenchConfig;
pub use driver::{ReservationDriver, ReserveMode, ReserveOutcome};
pub use error::{BenchError, BenchResult, ReporterError, StoreError};
pub use harness::TrialHarness;
pub use matrix::{TrialMatrix, TrialRow};
pub use reporter::CsvReporter;
pub use store::{Provisioner, TicketTable};
pub use ticket::{ReservationFields, ReserveArgs, ReserveRequest, TicketRecord};
