// SPDX-License-Identifier: Apache-2.0

//! Ticket benchmark CLI.
//!
//! Three subcommands cover the deployment comparison matrix:
//! `bench` drives the cache/edge orchestrator, `baseline` hits the lambda
//! directly with the same reservation payloads, and `runtime` times bare
//! `direct_invoke` round trips.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ticket_bench::{
    BenchClient, BenchConfig, CsvReporter, ReservationDriver, ReserveMode, TicketTable,
    TrialHarness, TrialMatrix,
};

/// Creates tickets and measures latency of reserving a ticket.
#[derive(Parser)]
#[command(name = "ticket-bench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark the edge-routed reservation protocol
    Bench {
        /// Use the local dev server rather than the edge deployment
        #[arg(short, long)]
        dev: bool,

        /// YAML configuration file overriding the built-in defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Benchmark the direct-to-lambda baseline
    Baseline {
        /// Baseline target URL (defaults to the deployed lambda)
        #[arg(short, long)]
        target: Option<String>,

        /// YAML configuration file overriding the built-in defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Time bare direct_invoke round trips against a target
    Runtime {
        /// Target base URL
        target: String,

        /// Number of invocations to time
        #[arg(short, long, default_value_t = 10)]
        count: u32,

        /// Populate the target's cache before invoking
        #[arg(short, long)]
        populate: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Bench { dev, config } => {
            let config = match config {
                Some(path) => BenchConfig::load_file(path)?,
                None => BenchConfig::for_env(dev),
            };
            run_benchmark(config, true).await
        }
        Commands::Baseline { target, config } => {
            let config = match config {
                Some(path) => BenchConfig::load_file(path)?,
                None => BenchConfig::for_baseline(target),
            };
            run_benchmark(config, false).await
        }
        Commands::Runtime {
            target,
            count,
            populate,
        } => run_runtime_probe(&target, count, populate).await,
    }
}

/// Full benchmark run: provision, trial loop, CSV export.
async fn run_benchmark(config: BenchConfig, orchestrated: bool) -> anyhow::Result<()> {
    tracing::info!(
        target = %config.target,
        env = %config.env_name,
        tickets = config.tickets,
        trials = config.trials,
        "starting benchmark"
    );

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let table = TicketTable::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        config.table_name.clone(),
    );

    let client = BenchClient::new(config.target.clone())?;
    let mode = if orchestrated {
        ReserveMode::Orchestrated {
            callback_url: config.consistency_check_url.clone(),
            backup_url: config.backup_url.clone(),
        }
    } else {
        ReserveMode::Direct
    };
    let driver = ReservationDriver::new(client, mode);

    if orchestrated {
        // Observational listing; failures are logged, never fatal.
        driver.client().avail_tickets().await;
    }

    let harness = TrialHarness::new(driver, table, &config);
    let matrix = harness.run().await?;

    export(&config, &matrix, orchestrated)?;
    Ok(())
}

fn export(config: &BenchConfig, matrix: &TrialMatrix, orchestrated: bool) -> anyhow::Result<()> {
    if matrix.completed_count() == 0 {
        tracing::warn!("no completed trials; skipping CSV export");
        return Ok(());
    }

    let prefix = if orchestrated {
        "anti_fraud"
    } else {
        "lambda_baseline"
    };
    let reporter = CsvReporter::new(&config.output_dir)?;
    let path = reporter.save(matrix, prefix, &config.env_name)?;
    tracing::info!(
        path = %path.display(),
        completed = matrix.completed_count(),
        attempted = matrix.rows().len(),
        "results exported"
    );
    Ok(())
}

/// Direct-invoke runtime probe: time `count` PUTs, printing each runtime.
async fn run_runtime_probe(target: &str, count: u32, populate: bool) -> anyhow::Result<()> {
    let client = BenchClient::new(target.to_string())?;
    tracing::info!(target = %target, count, "sending direct invocations");

    if populate {
        tracing::info!("populating");
        client.populate_tickets(10).await?;
    }

    let driver = ReservationDriver::new(client, ReserveMode::Direct);
    for _ in 0..count {
        let runtime_ms = driver.time_direct_invoke().await;
        println!("Runtime {}", runtime_ms);
    }
    Ok(())
}
