// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Batch runner and warm-up/measure harness.
//!
//! A batch is `n` calls spread across a fixed pool of worker tasks. Work
//! and results flow through two bounded MPMC queues sized to hold the
//! whole batch, so the producer never blocks. The work queue is closed
//! after the last unit is enqueued; the result queue closes once every
//! worker has dropped its sender.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::task::JoinSet;

use crate::transport::{Transport, TransportError};

/// Default number of warm-up calls, capped at the measured batch size.
pub const DEFAULT_WARMUP: usize = 1000;

/// Outcome of a single call.
#[derive(Debug)]
pub struct CallResult {
    /// Wall time of the call, including any timeout wait.
    pub latency: Duration,
    /// Response size in bytes, or why the call failed.
    pub outcome: Result<usize, TransportError>,
}

/// Raw results of one batch, partitioned into successes and failures.
///
/// `latencies.len() + failures` always equals the batch size.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Latency of every successful call, in completion order.
    pub latencies: Vec<Duration>,
    /// Number of failed calls.
    pub failures: usize,
    /// Sum of response sizes over successful calls.
    pub bytes_total: u64,
    /// From the first enqueue until the last result was drained.
    pub duration: Duration,
    /// Message of the first failure seen, for diagnostics.
    pub first_error: Option<String>,
}

impl BatchReport {
    /// Number of successful calls.
    pub fn successes(&self) -> usize {
        self.latencies.len()
    }

    /// Total calls recorded.
    pub fn total(&self) -> usize {
        self.latencies.len() + self.failures
    }

    fn record(&mut self, result: CallResult) {
        match result.outcome {
            Ok(bytes) => {
                self.latencies.push(result.latency);
                self.bytes_total += bytes as u64;
            }
            Err(e) => {
                tracing::trace!(error = %e, "call failed");
                self.failures += 1;
                if self.first_error.is_none() {
                    self.first_error = Some(e.to_string());
                }
            }
        }
    }
}

/// Run `n` calls through `transport` using `concurrency` workers.
///
/// Every call produces exactly one result, successful or not; calls are
/// never retried. A concurrency of zero is treated as one.
pub async fn run_batch(n: usize, concurrency: usize, transport: Arc<dyn Transport>) -> BatchReport {
    let workers = concurrency.max(1);
    let capacity = n.max(1);

    let (jobs_tx, jobs_rx) = flume::bounded::<()>(capacity);
    let (results_tx, results_rx) = flume::bounded::<CallResult>(capacity);

    let mut tasks = JoinSet::new();
    for _ in 0..workers {
        let jobs = jobs_rx.clone();
        let results = results_tx.clone();
        let transport = Arc::clone(&transport);

        tasks.spawn(async move {
            while jobs.recv_async().await.is_ok() {
                let timer = Timer::start();
                let outcome = transport.call().await;
                let result = CallResult {
                    latency: timer.elapsed(),
                    outcome,
                };
                if results.send_async(result).await.is_err() {
                    break;
                }
            }
        });
    }

    // Only workers may hold these, so the result queue closes when the
    // last worker exits.
    drop(jobs_rx);
    drop(results_tx);

    let started = Instant::now();

    for _ in 0..n {
        if jobs_tx.send_async(()).await.is_err() {
            // Every worker is gone; the shortfall is accounted below.
            break;
        }
    }
    drop(jobs_tx);

    let mut report = BatchReport::default();
    while let Ok(result) = results_rx.recv_async().await {
        report.record(result);
    }
    report.duration = started.elapsed();

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "benchmark worker failed");
        }
    }

    let missing = n.saturating_sub(report.total());
    if missing > 0 {
        tracing::warn!(missing, "calls lost to failed workers, counted as errors");
        report.failures += missing;
        report
            .first_error
            .get_or_insert_with(|| "worker failed before reporting".to_string());
    }

    tracing::debug!(
        n,
        workers,
        success = report.successes(),
        errors = report.failures,
        duration_ms = report.duration.as_millis() as u64,
        "batch complete"
    );

    report
}

/// Runs a discarded warm-up batch ahead of the measured one.
#[derive(Debug, Clone)]
pub struct BenchmarkHarness {
    /// Warm-up size before capping at the measured size
    warmup: usize,
}

impl BenchmarkHarness {
    /// Create a harness with the default warm-up size.
    pub fn new() -> Self {
        Self {
            warmup: DEFAULT_WARMUP,
        }
    }

    /// Set the number of warm-up calls.
    pub fn warmup(mut self, count: usize) -> Self {
        self.warmup = count;
        self
    }

    /// Warm-up calls actually made for a measured batch of `n`.
    pub fn warmup_size(&self, n: usize) -> usize {
        self.warmup.min(n)
    }

    /// Run and discard the warm-up batch. Returns how many calls it made.
    pub async fn warm_up(
        &self,
        n: usize,
        concurrency: usize,
        transport: Arc<dyn Transport>,
    ) -> usize {
        let count = self.warmup_size(n);
        if count > 0 {
            let warm = run_batch(count, concurrency, transport).await;
            tracing::debug!(
                count,
                errors = warm.failures,
                "warm-up finished"
            );
        }
        count
    }

    /// Run the measured batch.
    pub async fn measure(
        &self,
        n: usize,
        concurrency: usize,
        transport: Arc<dyn Transport>,
    ) -> BatchReport {
        run_batch(n, concurrency, transport).await
    }

    /// Warm up, then measure.
    pub async fn run(
        &self,
        n: usize,
        concurrency: usize,
        transport: Arc<dyn Transport>,
    ) -> BatchReport {
        self.warm_up(n, concurrency, Arc::clone(&transport)).await;
        self.measure(n, concurrency, transport).await
    }
}

impl Default for BenchmarkHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Timer for measuring individual calls.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
