// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `wirebench serve` command - Run the todo backend.

use std::path::Path;

use wirebench_core::{BenchOverrides, ConfigLoader, ServerOverrides};

pub async fn execute(
    config_path: Option<&Path>,
    overrides: &ServerOverrides,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::resolve(config_path, overrides, &BenchOverrides::default())?;

    tracing::info!(
        rest = %config.server.rest_addr,
        grpc = %config.server.grpc_addr,
        "Starting backend"
    );

    wirebench_server::run(config.server).await?;
    Ok(())
}
