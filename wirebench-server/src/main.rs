// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! wirebench Backend
//!
//! Standalone REST + gRPC todo server. `wirebench serve` runs the same
//! thing from the main CLI.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wirebench_core::{BenchOverrides, ConfigLoader, ServerOverrides};

#[derive(Parser)]
#[command(name = "wirebench-server")]
#[command(author, version, about = "REST and gRPC todo backend", long_about = None)]
struct Args {
    /// Optional YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// REST listen address (overrides the config file)
    #[arg(long)]
    rest_addr: Option<String>,

    /// gRPC listen address (overrides the config file)
    #[arg(long)]
    grpc_addr: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into()))
        .init();

    let overrides = ServerOverrides {
        rest_addr: args.rest_addr,
        grpc_addr: args.grpc_addr,
    };
    let config = ConfigLoader::resolve(
        args.config.as_deref(),
        &overrides,
        &BenchOverrides::default(),
    )?;

    wirebench_server::run(config.server).await?;
    Ok(())
}
