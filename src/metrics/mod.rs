//! Counters for backend traffic and marketplace activity.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared, cheaply clonable counters.
#[derive(Debug, Clone, Default)]
pub struct Metrics {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    http_requests_total: AtomicU64,
    http_errors_total: AtomicU64,
    http_duration_total_ms: AtomicU64,
    rows_fetched_total: AtomicU64,
    favorites_toggled_total: AtomicU64,
    listings_written_total: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_http_request(&self, duration: Duration) {
        self.inner.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.inner
            .http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn record_http_error(&self) {
        self.inner.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Rows returned by reads, across all tables.
    pub fn record_rows_fetched(&self, count: usize) {
        self.inner
            .rows_fetched_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_favorite_toggled(&self) {
        self.inner
            .favorites_toggled_total
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Listing creates, updates and deletes.
    pub fn record_listing_written(&self) {
        self.inner
            .listings_written_total
            .fetch_add(1, Ordering::Relaxed);
    }

    pub fn http_requests_total(&self) -> u64 {
        self.inner.http_requests_total.load(Ordering::Relaxed)
    }

    pub fn http_errors_total(&self) -> u64 {
        self.inner.http_errors_total.load(Ordering::Relaxed)
    }

    pub fn http_duration_total_ms(&self) -> u64 {
        self.inner.http_duration_total_ms.load(Ordering::Relaxed)
    }

    pub fn http_duration_avg_ms(&self) -> f64 {
        let count = self.http_requests_total();
        if count == 0 {
            0.0
        } else {
            self.http_duration_total_ms() as f64 / count as f64
        }
    }

    pub fn rows_fetched_total(&self) -> u64 {
        self.inner.rows_fetched_total.load(Ordering::Relaxed)
    }

    pub fn favorites_toggled_total(&self) -> u64 {
        self.inner.favorites_toggled_total.load(Ordering::Relaxed)
    }

    pub fn listings_written_total(&self) -> u64 {
        self.inner.listings_written_total.load(Ordering::Relaxed)
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            rows_fetched_total: self.rows_fetched_total(),
            favorites_toggled_total: self.favorites_toggled_total(),
            listings_written_total: self.listings_written_total(),
        }
    }
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_avg_ms: f64,
    pub rows_fetched_total: u64,
    pub favorites_toggled_total: u64,
    pub listings_written_total: u64,
}

/// Times one HTTP call and records it when completed.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    pub fn complete(self) {
        self.metrics.record_http_request(self.start.elapsed());
    }

    pub fn complete_with_error(self) {
        self.metrics.record_http_request(self.start.elapsed());
        self.metrics.record_http_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_average_duration() {
        let metrics = Metrics::new();
        assert_eq!(metrics.http_duration_avg_ms(), 0.0);

        metrics.record_http_request(Duration::from_millis(100));
        metrics.record_http_request(Duration::from_millis(200));
        assert_eq!(metrics.http_requests_total(), 2);
        assert_eq!(metrics.http_duration_total_ms(), 300);
        assert_eq!(metrics.http_duration_avg_ms(), 150.0);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = Metrics::new();
        let other = metrics.clone();
        other.record_favorite_toggled();
        other.record_rows_fetched(12);
        other.record_listing_written();

        let summary = metrics.summary();
        assert_eq!(summary.favorites_toggled_total, 1);
        assert_eq!(summary.rows_fetched_total, 12);
        assert_eq!(summary.listings_written_total, 1);
    }

    #[test]
    fn test_http_timer_with_error() {
        let metrics = Metrics::new();
        HttpTimer::new(metrics.clone()).complete_with_error();
        HttpTimer::new(metrics.clone()).complete();

        assert_eq!(metrics.http_requests_total(), 2);
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
                        m.record_http_request(Duration::from_millis(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.http_requests_total(), 200);
    }
}
