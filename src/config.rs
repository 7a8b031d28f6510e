// SPDX-License-Identifier: Apache-2.0

//! Benchmark configuration.
//!
//! Every knob the harness honors lives in one explicit [`BenchConfig`]:
//! target base URL, collaborator URLs, ticket/trial counts, settle delay,
//! table name, output directory. Defaults reproduce the deployed benchmark;
//! a YAML file can override any field and is validated at load time.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{BenchError, BenchResult};

/// Local dev server target.
pub const DEV_TARGET: &str = "http://localhost:8787";
/// Deployed edge target.
pub const EDGE_TARGET: &str = "https://ticket-bench-orch.radical-serverless.com";
/// Deployed consistency-check collaborator.
pub const CONSISTENCY_CHECK_URL: &str =
    "https://nuamf2bgzlrfj6vubqfzkjv52m0kpefu.lambda-url.us-east-2.on.aws/";
/// Deployed backup-write collaborator.
pub const BACKUP_URL: &str =
    "https://c54mpf4fcxguxzvatjfjocaabu0kgsuz.lambda-url.us-east-2.on.aws/";
/// Deployed baseline target (direct-to-lambda comparator).
pub const LAMBDA_BASELINE_TARGET: &str =
    "https://67f42q3sp4gqm7rfgvjngamyra0wrsew.lambda-url.us-east-2.on.aws";

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawBenchConfig {
    target: String,
    #[serde(default = "default_env_name")]
    env_name: String,
    #[serde(default = "default_consistency_check_url")]
    consistency_check_url: String,
    #[serde(default = "default_backup_url")]
    backup_url: String,
    #[serde(default = "default_table_name")]
    table_name: String,
    #[serde(default = "default_tickets")]
    tickets: u64,
    #[serde(default = "default_trials")]
    trials: u32,
    #[serde(default = "default_settle_delay_ms")]
    settle_delay_ms: u64,
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
}

fn default_env_name() -> String {
    "edge".to_string()
}

fn default_consistency_check_url() -> String {
    CONSISTENCY_CHECK_URL.to_string()
}

fn default_backup_url() -> String {
    BACKUP_URL.to_string()
}

fn default_table_name() -> String {
    "Radical-Ticket".to_string()
}

fn default_tickets() -> u64 {
    10
}

fn default_trials() -> u32 {
    10
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Validated benchmark configuration.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Base URL of the target service under test.
    pub target: String,
    /// Short environment label encoded into the output filename.
    pub env_name: String,
    /// Consistency-check collaborator address, routed through each reserve
    /// request as `remoteUrl`.
    pub consistency_check_url: String,
    /// Backup-write collaborator address, routed through as `backup`.
    pub backup_url: String,
    /// DynamoDB table holding the durable ticket records.
    pub table_name: String,
    /// Tickets seeded and reserved per trial.
    pub tickets: u64,
    /// Number of provision/reserve-all/clear cycles.
    pub trials: u32,
    /// Settle delay before and after each reservation burst.
    pub settle_delay_ms: u64,
    /// Directory the CSV artifact is written to.
    pub output_dir: PathBuf,
}

impl BenchConfig {
    /// Default configuration for the dev or edge deployment.
    pub fn for_env(dev: bool) -> Self {
        let (target, env_name) = if dev {
            (DEV_TARGET, "local")
        } else {
            (EDGE_TARGET, "edge")
        };
        Self {
            target: target.to_string(),
            env_name: env_name.to_string(),
            consistency_check_url: default_consistency_check_url(),
            backup_url: default_backup_url(),
            table_name: default_table_name(),
            tickets: default_tickets(),
            trials: default_trials(),
            settle_delay_ms: default_settle_delay_ms(),
            output_dir: default_output_dir(),
        }
    }

    /// Default configuration for the direct-to-lambda baseline comparator.
    pub fn for_baseline(target: Option<String>) -> Self {
        Self {
            target: target.unwrap_or_else(|| LAMBDA_BASELINE_TARGET.to_string()),
            env_name: "lambda".to_string(),
            ..Self::for_env(false)
        }
    }

    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| BenchError::ConfigParse {
            message: format!("reading {}: {}", path.display(), e),
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> BenchResult<Self> {
        let raw: RawBenchConfig =
            serde_yaml::from_str(content).map_err(|e| BenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    /// Validate raw configuration.
    fn validate(raw: RawBenchConfig) -> BenchResult<Self> {
        if raw.target.is_empty() {
            return Err(BenchError::ConfigInvalid {
                field: "target",
                reason: "Target base URL cannot be empty".to_string(),
            });
        }

        if raw.target.ends_with('/') {
            return Err(BenchError::ConfigInvalid {
                field: "target",
                reason: "Target base URL must not carry a trailing slash".to_string(),
            });
        }

        if raw.consistency_check_url.is_empty() || raw.backup_url.is_empty() {
            return Err(BenchError::ConfigInvalid {
                field: "consistency_check_url",
                reason: "Collaborator URLs cannot be empty".to_string(),
            });
        }

        if raw.tickets == 0 {
            return Err(BenchError::ConfigInvalid {
                field: "tickets",
                reason: "At least one ticket must be benchmarked".to_string(),
            });
        }

        if raw.trials == 0 {
            return Err(BenchError::ConfigInvalid {
                field: "trials",
                reason: "At least one trial must run".to_string(),
            });
        }

        if raw.table_name.is_empty() {
            return Err(BenchError::ConfigInvalid {
                field: "table_name",
                reason: "Table name cannot be empty".to_string(),
            });
        }

        Ok(Self {
            target: raw.target,
            env_name: raw.env_name,
            consistency_check_url: raw.consistency_check_url,
            backup_url: raw.backup_url,
            table_name: raw.table_name,
            tickets: raw.tickets,
            trials: raw.trials,
            settle_delay_ms: raw.settle_delay_ms,
            output_dir: raw.output_dir,
        })
    }

    /// Settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
