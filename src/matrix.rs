// SPDX-License-Identifier: Apache-2.0

//! Trial × ticket latency accumulation.
//!
//! The matrix is the sole artifact a run retains: one row per trial, one
//! column per ticket index, insertion order significant (column `i` is
//! ticket `i`, reservations are issued in id order). A trial cut short by a
//! fatal error is kept as a failed row carrying whatever samples it
//! collected; export skips failed rows but completed rows survive an abort.

use serde::Serialize;

/// One trial's worth of latency samples.
#[derive(Debug, Clone, Serialize)]
pub enum TrialRow {
    /// All `n` reservations were issued; one sample per ticket, in id order.
    Completed(Vec<f64>),
    /// The trial hit a fatal error; samples collected up to that point.
    Failed { samples: Vec<f64>, reason: String },
}

impl TrialRow {
    pub fn is_completed(&self) -> bool {
        matches!(self, TrialRow::Completed(_))
    }

    pub fn samples(&self) -> &[f64] {
        match self {
            TrialRow::Completed(samples) => samples,
            TrialRow::Failed { samples, .. } => samples,
        }
    }
}

/// The trial × ticket latency matrix accumulated across a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct TrialMatrix {
    tickets: usize,
    rows: Vec<TrialRow>,
}

impl TrialMatrix {
    /// An empty matrix with `tickets` columns.
    pub fn new(tickets: usize) -> Self {
        Self {
            tickets,
            rows: Vec::new(),
        }
    }

    /// Number of columns (tickets per trial).
    pub fn tickets(&self) -> usize {
        self.tickets
    }

    /// All rows, completed and failed, in trial order.
    pub fn rows(&self) -> &[TrialRow] {
        &self.rows
    }

    /// Completed rows only, in trial order.
    pub fn completed_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.rows.iter().filter_map(|row| match row {
            TrialRow::Completed(samples) => Some(samples.as_slice()),
            TrialRow::Failed { .. } => None,
        })
    }

    pub fn completed_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_completed()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a trial row. A completed row must hold exactly one sample per
    /// ticket column.
    pub fn push_row(&mut self, row: TrialRow) {
        debug_assert!(
            !row.is_completed() || row.samples().len() == self.tickets,
            "completed row must span every ticket column"
        );
        self.rows.push(row);
    }
}
