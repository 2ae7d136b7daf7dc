// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Rendering of benchmark runs.
//!
//! [`TextReporter`] prints the line-oriented summary, progressively as
//! the run advances. [`JsonReporter`] prints one JSON document once the
//! run is over. Both write to any [`Write`]; nothing is written to disk.

use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use wirebench_core::{BenchConfig, Mode};

use crate::metrics::{round_to_millis, to_millis, Metrics, MetricsError, SystemInfo};

/// Errors that can occur while rendering a report.
#[derive(Debug, Error)]
pub enum ReporterError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Parameters of a run, echoed into every report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunParameters {
    pub mode: Mode,
    pub requests: usize,
    pub concurrency: usize,
    pub payload_kb: i32,
    pub limit: i32,
    /// Warm-up calls actually made
    pub warmup: usize,
}

impl RunParameters {
    /// Parameters for `config`, with the warm-up capped at the batch size.
    pub fn from_config(config: &BenchConfig) -> Self {
        let requests = config.requests.value();
        Self {
            mode: config.mode,
            requests,
            concurrency: config.concurrency.value(),
            payload_kb: config.payload_kb.value(),
            limit: config.limit.value(),
            warmup: config.warmup.min(requests),
        }
    }
}

/// Line-oriented text output.
pub struct TextReporter<W> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Announce the warm-up phase.
    pub fn warmup(&mut self, count: usize) -> Result<(), ReporterError> {
        writeln!(self.out, "warmup: {} requests", count)?;
        Ok(())
    }

    /// Announce the measured phase.
    pub fn run(&mut self, params: &RunParameters) -> Result<(), ReporterError> {
        writeln!(
            self.out,
            "run: mode={} n={} c={} payload_kb={} limit={}",
            params.mode, params.requests, params.concurrency, params.payload_kb, params.limit
        )?;
        Ok(())
    }

    /// Print the summary, or the degenerate line when nothing succeeded.
    pub fn outcome(&mut self, outcome: Result<&Metrics, &MetricsError>) -> Result<(), ReporterError> {
        match outcome {
            Ok(metrics) => self.metrics(metrics),
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                Ok(())
            }
        }
    }

    fn metrics(&mut self, m: &Metrics) -> Result<(), ReporterError> {
        writeln!(
            self.out,
            "requests={} success={} errors={}",
            m.requests, m.success, m.errors
        )?;
        writeln!(
            self.out,
            "latency_ms p50={:.2} p95={:.2}",
            to_millis(m.latency.p50),
            to_millis(m.latency.p95)
        )?;
        writeln!(
            self.out,
            "rps={:.2} duration={}",
            m.rps,
            format_duration(m.duration)
        )?;
        writeln!(
            self.out,
            "bytes_total={} bytes_avg={:.2}",
            m.bytes_total, m.bytes_avg
        )?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Complete JSON document for one run.
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub parameters: &'a RunParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<&'a Metrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub system_info: SystemInfo,
}

/// Single-document JSON output.
pub struct JsonReporter<W> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the report for a finished run.
    pub fn write(
        &mut self,
        params: &RunParameters,
        outcome: Result<&Metrics, &MetricsError>,
    ) -> Result<(), ReporterError> {
        let report = JsonReport {
            tool: "wirebench",
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
            parameters: params,
            metrics: outcome.ok(),
            error: outcome.err().map(ToString::to_string),
            system_info: SystemInfo::collect(),
        };

        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Render a duration rounded to milliseconds, e.g. `0s`, `12ms`,
/// `1.5s`, `2m3.004s`.
pub fn format_duration(d: Duration) -> String {
    let ms = round_to_millis(d).as_millis();
    if ms == 0 {
        return "0s".to_string();
    }
    if ms < 1000 {
        return format!("{}ms", ms);
    }

    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let secs = (ms / 1000) % 60;
    let frac = ms % 1000;

    let mut out = String::new();
    if hours > 0 {
        let _ = write!(out, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(out, "{}m", minutes);
    }
    let _ = write!(out, "{}", secs);
    if frac > 0 {
        let digits = format!("{:03}", frac);
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out.push('s');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::LatencyMetrics;

    fn params() -> RunParameters {
        RunParameters {
            mode: Mode::Grpc,
            requests: 4,
            concurrency: 2,
            payload_kb: 1,
            limit: 10,
            warmup: 4,
        }
    }

    fn metrics() -> Metrics {
        let ms = Duration::from_millis;
        Metrics {
            requests: 5,
            success: 4,
            errors: 1,
            latency: LatencyMetrics {
                min: ms(10),
                max: ms(40),
                mean: ms(25),
                p50: ms(20),
                p95: ms(40),
                p99: ms(40),
            },
            rps: 8.0,
            duration: Duration::from_micros(500_400),
            bytes_total: 4096,
            bytes_avg: 1024.0,
        }
    }

    #[test]
    fn test_text_report_lines() {
        let mut reporter = TextReporter::new(Vec::new());
        reporter.warmup(4).unwrap();
        reporter.run(&params()).unwrap();
        reporter.outcome(Ok(&metrics())).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            text,
            "warmup: 4 requests\n\
             run: mode=grpc n=4 c=2 payload_kb=1 limit=10\n\
             requests=5 success=4 errors=1\n\
             latency_ms p50=20.00 p95=40.00\n\
             rps=8.00 duration=500ms\n\
             bytes_total=4096 bytes_avg=1024.00\n"
        );
    }

    #[test]
    fn test_text_report_no_success() {
        let mut reporter = TextReporter::new(Vec::new());
        let err = MetricsError::NoSuccessfulRequests { errors: 3 };
        reporter.outcome(Err(&err)).unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(text, "errors=3, no successful requests\n");
    }

    #[test]
    fn test_json_report() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.write(&params(), Ok(&metrics())).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert_eq!(value["tool"], "wirebench");
        assert_eq!(value["parameters"]["mode"], "grpc");
        assert_eq!(value["metrics"]["success"], 4);
        assert_eq!(value["metrics"]["latency"]["p95_ms"], 40.0);
        assert!(value.get("error").is_none());
        assert!(value["system_info"]["cpu_cores"].as_u64().unwrap() > 0);
    }

    #[test]
    fn test_json_report_no_success() {
        let mut reporter = JsonReporter::new(Vec::new());
        let err = MetricsError::NoSuccessfulRequests { errors: 2 };
        reporter.write(&params(), Err(&err)).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&reporter.into_inner()).unwrap();
        assert!(value.get("metrics").is_none());
        assert_eq!(value["error"], "errors=2, no successful requests");
    }

    #[test]
    fn test_format_duration() {
        let ms = Duration::from_millis;
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_micros(400)), "0s");
        assert_eq!(format_duration(Duration::from_micros(12_600)), "13ms");
        assert_eq!(format_duration(ms(1000)), "1s");
        assert_eq!(format_duration(ms(1500)), "1.5s");
        assert_eq!(format_duration(ms(1234)), "1.234s");
        assert_eq!(format_duration(ms(123_004)), "2m3.004s");
        assert_eq!(format_duration(ms(3_600_000)), "1h0m0s");
    }
}
