// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! wirebench CLI
//!
//! Load generator comparing a todo backend's REST and gRPC bindings, plus
//! the backend itself for local runs.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use wirebench_core::{BenchOverrides, ServerOverrides};

mod commands;

/// wirebench - REST vs gRPC latency harness
#[derive(Parser)]
#[command(name = "wirebench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional YAML configuration file; flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format of `bench`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Line-oriented summary
    #[default]
    Text,
    /// One JSON document
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a load test against a running backend
    #[command(allow_negative_numbers = true)]
    Bench {
        /// Transport to exercise: rest or grpc
        #[arg(long)]
        mode: Option<String>,

        /// REST base URL [default: http://localhost:8080]
        #[arg(long)]
        base: Option<String>,

        /// gRPC address [default: localhost:9090]
        #[arg(long)]
        grpc: Option<String>,

        /// Total measured requests [default: 20000]
        #[arg(short = 'n', long = "requests")]
        requests: Option<i64>,

        /// Concurrent workers [default: 50]
        #[arg(short = 'c', long = "concurrency")]
        concurrency: Option<i64>,

        /// Filler payload per record, in KiB [default: 32]
        #[arg(long)]
        payload_kb: Option<i64>,

        /// Records per list call, 0 for all [default: 100]
        #[arg(long)]
        limit: Option<i64>,

        /// Warm-up requests, capped at -n [default: 1000]
        #[arg(long)]
        warmup: Option<i64>,

        /// Report format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Run the REST and gRPC todo backend
    Serve {
        /// REST listen address [default: 0.0.0.0:8080]
        #[arg(long)]
        rest_addr: Option<String>,

        /// gRPC listen address [default: 0.0.0.0:9090]
        #[arg(long)]
        grpc_addr: Option<String>,
    },

    /// Validate a configuration file
    Validate {
        /// Path to the configuration file
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so reports on stdout stay machine-readable.
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into()))
        .with_writer(std::io::stderr)
        .init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Bench {
            mode,
            base,
            grpc,
            requests,
            concurrency,
            payload_kb,
            limit,
            warmup,
            format,
        } => {
            let overrides = BenchOverrides {
                mode,
                base,
                grpc,
                n: requests,
                c: concurrency,
                payload_kb,
                limit,
                warmup,
            };
            commands::bench::execute(config, &overrides, format).await
        }
        Commands::Serve {
            rest_addr,
            grpc_addr,
        } => {
            let overrides = ServerOverrides {
                rest_addr,
                grpc_addr,
            };
            commands::serve::execute(config, &overrides).await
        }
        Commands::Validate { file } => commands::validate::execute(&file).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bench_flags() {
        let cli = Cli::try_parse_from([
            "wirebench", "bench", "--mode", "GRPC", "-n", "500", "-c", "8", "--payload-kb", "0",
            "--limit", "10", "--format", "json",
        ])
        .unwrap();

        match cli.command {
            Commands::Bench {
                mode,
                requests,
                concurrency,
                payload_kb,
                limit,
                warmup,
                format,
                ..
            } => {
                assert_eq!(mode.as_deref(), Some("GRPC"));
                assert_eq!(requests, Some(500));
                assert_eq!(concurrency, Some(8));
                assert_eq!(payload_kb, Some(0));
                assert_eq!(limit, Some(10));
                assert_eq!(warmup, None);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected bench"),
        }
    }

    #[test]
    fn test_negative_values_reach_validation() {
        let cli = Cli::try_parse_from(["wirebench", "bench", "-n", "-5"]).unwrap();
        match cli.command {
            Commands::Bench { requests, .. } => assert_eq!(requests, Some(-5)),
            _ => panic!("expected bench"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["wirebench", "serve", "--config", "wb.yaml", "--rest-addr", "127.0.0.1:0"])
                .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("wb.yaml")));
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["wirebench", "bench", "--format", "xml"]).is_err());
    }
}
