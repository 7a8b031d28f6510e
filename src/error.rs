// SPDX-License-Identifier: Apache-2.0

//! Error types for the benchmark harness.
//!
//! Explicit enum variants per failure class - no catch-all handling.
//! Reservation failures are deliberately *not* represented here: a non-200
//! reserve response is a measured outcome, not an error (see `driver`).

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the harness.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Setup failures - abort before or between trials
    // =========================================================================
    #[error("Durable store error: {0}")]
    Store(#[from] StoreError),

    // =========================================================================
    // Protocol failures - non-200 on an operation the run cannot survive
    // =========================================================================
    #[error("{op} returned HTTP {status}: {body}")]
    Protocol {
        op: &'static str,
        status: u16,
        body: String,
    },

    #[error("{op} transport failure: {source}")]
    Transport {
        op: &'static str,
        #[source]
        source: reqwest::Error,
    },

    // =========================================================================
    // Configuration errors - fail fast before anything runs
    // =========================================================================
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration: {field} - {reason}")]
    ConfigInvalid {
        field: &'static str,
        reason: String,
    },

    // =========================================================================
    // Export errors
    // =========================================================================
    #[error("Report export error: {0}")]
    Report(#[from] ReporterError),
}

/// Durable-store (DynamoDB) failures during provisioning.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Couldn't check for existence of table {table}: {reason}")]
    Describe { table: String, reason: String },

    #[error("Couldn't load data into table {table}: {reason}")]
    BatchWrite { table: String, reason: String },

    #[error("Batch write to {table} left {count} items unprocessed")]
    Unprocessed { table: String, count: usize },

    #[error("Failed to build store item: {reason}")]
    ItemBuild { reason: String },
}

/// Errors that can occur while exporting the result matrix.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Failed to create output directory: {0}")]
    DirectoryCreation(#[from] std::io::Error),

    #[error("Failed to write CSV row: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;
