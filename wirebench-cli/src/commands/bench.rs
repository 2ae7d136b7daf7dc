// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `wirebench bench` command - Load-test a running backend.

use std::io;
use std::path::Path;

use wirebench_benchmark::{
    summarize, transport, BenchmarkHarness, JsonReporter, RunParameters, TextReporter,
};
use wirebench_core::{BenchOverrides, ConfigLoader, ServerOverrides};

use crate::OutputFormat;

pub async fn execute(
    config_path: Option<&Path>,
    overrides: &BenchOverrides,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match ConfigLoader::resolve(config_path, &ServerOverrides::default(), overrides) {
        Ok(config) => config.bench,
        Err(e) => {
            eprintln!("✗ Invalid benchmark configuration:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let transport = match transport::for_config(&config) {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("✗ Cannot set up {} transport:", config.mode);
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    };

    let params = RunParameters::from_config(&config);
    let harness = BenchmarkHarness::new().warmup(config.warmup);
    let (n, c) = (params.requests, params.concurrency);

    tracing::debug!(
        mode = %config.mode,
        base = %config.base_url,
        grpc = %config.grpc_target,
        "Starting benchmark"
    );

    let mut text = match format {
        OutputFormat::Text => Some(TextReporter::new(io::stdout())),
        OutputFormat::Json => None,
    };

    if let Some(reporter) = text.as_mut() {
        reporter.warmup(params.warmup)?;
    }
    harness.warm_up(n, c, transport.clone()).await;

    if let Some(reporter) = text.as_mut() {
        reporter.run(&params)?;
    }
    let report = harness.measure(n, c, transport).await;

    if let Some(error) = &report.first_error {
        tracing::warn!(errors = report.failures, first = %error, "Some requests failed");
    }

    let outcome = summarize(&report);

    match text.as_mut() {
        Some(reporter) => reporter.outcome(outcome.as_ref())?,
        None => JsonReporter::new(io::stdout()).write(&params, outcome.as_ref())?,
    }

    if outcome.is_err() {
        std::process::exit(1);
    }

    Ok(())
}
