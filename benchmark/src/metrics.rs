// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Summary statistics for a finished batch.
//!
//! Percentiles use the nearest-rank method over the sorted successful
//! latencies, without interpolation. Failed calls contribute to the error
//! count only.

use std::time::Duration;

use serde::{Serialize, Serializer};
use sysinfo::System;
use thiserror::Error;

use crate::harness::BatchReport;

/// Errors raised while summarizing a batch.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Every call in the batch failed; there is nothing to measure.
    #[error("errors={errors}, no successful requests")]
    NoSuccessfulRequests { errors: usize },
}

/// Latency distribution over successful calls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatencyMetrics {
    #[serde(rename = "min_ms", serialize_with = "as_millis")]
    pub min: Duration,
    #[serde(rename = "max_ms", serialize_with = "as_millis")]
    pub max: Duration,
    #[serde(rename = "mean_ms", serialize_with = "as_millis")]
    pub mean: Duration,
    #[serde(rename = "p50_ms", serialize_with = "as_millis")]
    pub p50: Duration,
    #[serde(rename = "p95_ms", serialize_with = "as_millis")]
    pub p95: Duration,
    #[serde(rename = "p99_ms", serialize_with = "as_millis")]
    pub p99: Duration,
}

impl LatencyMetrics {
    /// Compute the distribution from latencies sorted ascending.
    pub fn from_sorted(sorted: &[Duration]) -> Self {
        let mean = if sorted.is_empty() {
            Duration::ZERO
        } else {
            let sum: u128 = sorted.iter().map(Duration::as_nanos).sum();
            nanos(sum / sorted.len() as u128)
        };

        Self {
            min: percentile(sorted, 0.0),
            max: percentile(sorted, 1.0),
            mean,
            p50: percentile(sorted, 0.50),
            p95: percentile(sorted, 0.95),
            p99: percentile(sorted, 0.99),
        }
    }
}

/// Aggregate metrics for one measured batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    /// Successes plus errors.
    pub requests: usize,
    pub success: usize,
    pub errors: usize,
    pub latency: LatencyMetrics,
    /// Successful calls per second over the batch duration.
    pub rps: f64,
    #[serde(rename = "duration_ms", serialize_with = "as_millis")]
    pub duration: Duration,
    pub bytes_total: u64,
    pub bytes_avg: f64,
}

/// Summarize a batch. The report itself is left untouched.
pub fn summarize(report: &BatchReport) -> Result<Metrics, MetricsError> {
    let success = report.successes();
    let errors = report.failures;

    if success == 0 {
        return Err(MetricsError::NoSuccessfulRequests { errors });
    }

    let mut sorted = report.latencies.clone();
    sorted.sort_unstable();

    let secs = report.duration.as_secs_f64();
    let rps = if secs > 0.0 { success as f64 / secs } else { 0.0 };

    Ok(Metrics {
        requests: success + errors,
        success,
        errors,
        latency: LatencyMetrics::from_sorted(&sorted),
        rps,
        duration: report.duration,
        bytes_total: report.bytes_total,
        bytes_avg: report.bytes_total as f64 / success as f64,
    })
}

/// Nearest-rank percentile of `sorted` (ascending).
///
/// `p <= 0` yields the minimum and `p >= 1` the maximum. An empty slice
/// yields zero.
pub fn percentile(sorted: &[Duration], p: f64) -> Duration {
    let Some(last) = sorted.len().checked_sub(1) else {
        return Duration::ZERO;
    };
    if p <= 0.0 {
        return sorted[0];
    }
    if p >= 1.0 {
        return sorted[last];
    }

    let rank = (p * sorted.len() as f64).ceil() as usize;
    sorted[rank.saturating_sub(1).min(last)]
}

/// Fractional milliseconds, as printed in reports.
pub fn to_millis(d: Duration) -> f64 {
    d.as_nanos() as f64 / 1_000_000.0
}

/// Round to the nearest millisecond, halves away from zero.
pub fn round_to_millis(d: Duration) -> Duration {
    let ns = d.as_nanos();
    let ms = (ns + 500_000) / 1_000_000;
    nanos(ms * 1_000_000)
}

fn nanos(ns: u128) -> Duration {
    let secs = (ns / 1_000_000_000) as u64;
    let sub = (ns % 1_000_000_000) as u32;
    Duration::new(secs, sub)
}

fn as_millis<S: Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(to_millis(*d))
}

/// Host information attached to JSON reports.
#[derive(Debug, Clone, Serialize)]
pub struct SystemInfo {
    pub os: String,
    pub os_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_version: Option<String>,
    pub cpu_model: String,
    pub cpu_cores: usize,
    /// Total system memory in bytes
    pub memory_bytes: u64,
    pub hostname: String,
}

impl SystemInfo {
    /// Collect current system information.
    pub fn collect() -> Self {
        let mut sys = System::new_all();
        sys.refresh_all();

        Self {
            os: System::name().unwrap_or_else(|| "Unknown".to_string()),
            os_version: System::os_version().unwrap_or_else(|| "Unknown".to_string()),
            kernel_version: System::kernel_version(),
            cpu_model: sys
                .cpus()
                .first()
                .map(|cpu| cpu.brand().to_string())
                .unwrap_or_else(|| "Unknown".to_string()),
            cpu_cores: sys.cpus().len(),
            memory_bytes: sys.total_memory(),
            hostname: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}
