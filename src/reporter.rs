// SPDX-License-Identifier: Apache-2.0

//! CSV export for the trial result matrix.
//!
//! One file per run, written once at the end. The filename encodes the
//! variant, environment, ticket count, and trial count so artifacts from
//! different deployments line up column-for-column when compared.

use std::path::{Path, PathBuf};

use crate::error::ReporterError;
use crate::matrix::TrialMatrix;

/// CSV reporter writing into a fixed output directory.
#[derive(Debug, Clone)]
pub struct CsvReporter {
    output_dir: PathBuf,
}

impl CsvReporter {
    /// Create a reporter, creating the output directory if needed.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Write the matrix's completed rows as
    /// `{prefix}_{env}_{n}tickets_{trials}trials.csv`, where `trials` is
    /// the completed-row count so the name always matches the body.
    ///
    /// Header is `trial, ticket0_ms .. ticket{n-1}_ms`; failed rows are
    /// excluded (they are reported in the log, not the artifact). Returns
    /// the path to the created file.
    pub fn save(
        &self,
        matrix: &TrialMatrix,
        prefix: &str,
        env_name: &str,
    ) -> Result<PathBuf, ReporterError> {
        let filename = format!(
            "{}_{}_{}tickets_{}trials.csv",
            prefix,
            env_name,
            matrix.tickets(),
            matrix.completed_count()
        );
        let filepath = self.output_dir.join(&filename);

        let mut writer = csv::Writer::from_path(&filepath)?;

        let mut header = Vec::with_capacity(matrix.tickets() + 1);
        header.push("trial".to_string());
        for i in 0..matrix.tickets() {
            header.push(format!("ticket{}_ms", i));
        }
        writer.write_record(&header)?;

        for (trial, samples) in matrix.completed_rows().enumerate() {
            let mut record = Vec::with_capacity(samples.len() + 1);
            record.push(trial.to_string());
            for sample in samples {
                record.push(sample.to_string());
            }
            writer.write_record(&record)?;
        }

        writer.flush().map_err(csv::Error::from)?;
        Ok(filepath)
    }
}
