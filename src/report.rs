use std::time::Duration;

use tracing::info;

use crate::runner::WorkerResult;

/// Final totals over every worker, plus the rates derived from the
/// configured duration. Built once after all workers have joined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateReport {
    pub total_success: u64,
    pub total_failed: u64,
    pub total_bytes: u64,
    pub requests_per_second: f64,
    pub bytes_per_second: f64,
}

/// Sums the per-worker counters and divides by the configured duration.
///
/// Pure and order-independent, so permuting the worker list cannot change
/// the report. Failed attempts count toward throughput pressure, which is
/// why the request rate is over successes plus failures.
pub fn aggregate(results: &[WorkerResult], duration: Duration) -> AggregateReport {
    let total_success: u64 = results.iter().map(|r| r.successful_transactions).sum();
    let total_failed: u64 = results.iter().map(|r| r.failed_transactions).sum();
    let total_bytes: u64 = results.iter().map(|r| r.bytes_received).sum();

    let secs = duration.as_secs_f64();
    AggregateReport {
        total_success,
        total_failed,
        total_bytes,
        requests_per_second: (total_success + total_failed) as f64 / secs,
        bytes_per_second: total_bytes as f64 / secs,
    }
}

pub fn print_report(report: &AggregateReport) {
    info!(
        "Speed = {:.1} requests/sec, {:.1} bytes/sec",
        report.requests_per_second, report.bytes_per_second
    );
    info!(
        "Requests: {} success, {} failed",
        report.total_success, report.total_failed
    );
}
