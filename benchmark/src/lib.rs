// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! wirebench Load Generator
//!
//! Fires a fixed number of identical list calls at a todo backend over
//! REST or gRPC with bounded concurrency, then reports latency
//! percentiles, throughput and response sizes.
//!
//! # Pipeline
//!
//! - **transport**: one logical call per invocation, bounded by a timeout
//! - **harness**: fan-out over a worker pool, fan-in of per-call results
//! - **metrics**: nearest-rank percentiles and derived rates
//! - **reporter**: text or JSON rendering

pub mod harness;
pub mod metrics;
pub mod reporter;
pub mod transport;

pub use harness::{run_batch, BatchReport, BenchmarkHarness, CallResult};
pub use metrics::{percentile, summarize, LatencyMetrics, Metrics, MetricsError, SystemInfo};
pub use reporter::{JsonReporter, ReporterError, RunParameters, TextReporter};
pub use transport::{
    from_fn, FnTransport, GrpcTransport, RestTransport, Transport, TransportError,
    REQUEST_TIMEOUT,
};
