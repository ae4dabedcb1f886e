//! Basic metrics instrumentation for the transport layer.
//!
//! Counts backend attempts, failures and retries, and tracks request duration.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector for backend traffic.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of HTTP attempts made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of failed attempts
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all attempts in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// Attempts made after a failed one
    retries_total: Arc<AtomicU64>,

    /// Requests cut short by an authentication failure
    auth_failures_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            retries_total: Arc::new(AtomicU64::new(0)),
            auth_failures_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an HTTP attempt with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record a failed attempt.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record that another attempt is about to be made.
    pub fn record_retry(&self) {
        self.retries_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an authentication failure.
    pub fn record_auth_failure(&self) {
        self.auth_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    pub fn http_duration_total_ms(&self) -> u64 {
        self.http_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average HTTP attempt duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn retries_total(&self) -> u64 {
        self.retries_total.load(Ordering::Relaxed)
    }

    pub fn auth_failures_total(&self) -> u64 {
        self.auth_failures_total.load(Ordering::Relaxed)
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.http_requests_total.store(0, Ordering::Relaxed);
        self.http_errors_total.store(0, Ordering::Relaxed);
        self.http_duration_total_ms.store(0, Ordering::Relaxed);
        self.retries_total.store(0, Ordering::Relaxed);
        self.auth_failures_total.store(0, Ordering::Relaxed);
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_total_ms: self.http_duration_total_ms(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            retries_total: self.retries_total(),
            auth_failures_total: self.auth_failures_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_total_ms: u64,
    pub http_duration_avg_ms: f64,
    pub retries_total: u64,
    pub auth_failures_total: u64,
}

/// Helper for timing HTTP attempts.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing an HTTP attempt.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
        self.metrics.record_http_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.http_requests_total(), 0);
        assert_eq!(metrics.retries_total(), 0);
        assert_eq!(metrics.http_duration_avg_ms(), 0.0);
    }

    #[test]
    fn test_average_duration() {
        let metrics = Metrics::new();
        metrics.record_http_request(Duration::from_millis(100));
        metrics.record_http_request(Duration::from_millis(200));
        assert_eq!(metrics.http_requests_total(), 2);
        assert_eq!(metrics.http_duration_total_ms(), 300);
        assert_eq!(metrics.http_duration_avg_ms(), 150.0);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_http_request(Duration::from_millis(100));
        metrics.record_http_error();
        metrics.record_retry();
        metrics.record_auth_failure();

        metrics.reset();

        let summary = metrics.summary();
        assert_eq!(summary.http_requests_total, 0);
        assert_eq!(summary.http_errors_total, 0);
        assert_eq!(summary.retries_total, 0);
        assert_eq!(summary.auth_failures_total, 0);
    }

    #[test]
    fn test_http_timer_with_error() {
        let metrics = Metrics::new();
        let timer = HttpTimer::new(metrics.clone());
        timer.complete_with_error();

        assert_eq!(metrics.http_requests_total(), 1);
        assert_eq!(metrics.http_errors_total(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        let metrics = Metrics::new();
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let m = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        m.record_retry();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.retries_total(), 200);
    }
}
