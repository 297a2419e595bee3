//! Prometheus metrics collection.
//!
//! Provides metrics for:
//! - HTTP request latency and counts
//! - Active HTTP requests
//! - Stored user count

use parking_lot::RwLock;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::metrics::histogram::{exponential_buckets, Histogram};
use prometheus_client::registry::Registry;
use std::sync::Arc;

/// HTTP request labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct HttpLabels {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path pattern
    pub path: String,
    /// Response status code
    pub status: u16,
}

/// Metrics state container.
///
/// Cloning is cheap; every clone records into the same registry.
#[derive(Clone)]
pub struct MetricsState {
    /// Prometheus registry.
    pub registry: Arc<RwLock<Registry>>,
    /// HTTP request counter.
    pub http_requests_total: Family<HttpLabels, Counter>,
    /// HTTP request duration histogram (seconds).
    pub http_request_duration_seconds: Family<HttpLabels, Histogram>,
    /// Requests currently being handled.
    pub http_active_requests: Gauge,
    /// Users currently stored.
    pub users_total: Gauge,
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsState {
    /// Create a new metrics state with all metrics registered.
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let http_requests_total = Family::<HttpLabels, Counter>::default();
        registry.register(
            "roster_http_requests",
            "Total HTTP requests",
            http_requests_total.clone(),
        );

        let http_request_duration_seconds =
            Family::<HttpLabels, Histogram>::new_with_constructor(|| {
                Histogram::new(exponential_buckets(0.0001, 2.0, 16))
            });
        registry.register(
            "roster_http_request_duration_seconds",
            "HTTP request duration in seconds",
            http_request_duration_seconds.clone(),
        );

        let http_active_requests = Gauge::default();
        registry.register(
            "roster_http_active_requests",
            "Number of HTTP requests in flight",
            http_active_requests.clone(),
        );

        let users_total = Gauge::default();
        registry.register("roster_users", "Number of stored users", users_total.clone());

        Self {
            registry: Arc::new(RwLock::new(registry)),
            http_requests_total,
            http_request_duration_seconds,
            http_active_requests,
            users_total,
        }
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let labels = HttpLabels {
            method: method.to_string(),
            path: path.to_string(),
            status,
        };

        self.http_requests_total.get_or_create(&labels).inc();
        self.http_request_duration_seconds
            .get_or_create(&labels)
            .observe(duration_secs);
    }

    /// Set the stored user gauge.
    pub fn set_users(&self, count: usize) {
        self.users_total
            .set(i64::try_from(count).unwrap_or(i64::MAX));
    }

    /// Count one stored user.
    pub fn user_added(&self) {
        self.users_total.inc();
    }

    /// Count one removed user.
    pub fn user_removed(&self) {
        self.users_total.dec();
    }

    /// Marks a request as in flight until the returned guard is dropped.
    pub fn start_request(&self) -> ActiveRequest {
        self.http_active_requests.inc();
        ActiveRequest {
            gauge: self.http_active_requests.clone(),
        }
    }

    /// Encode metrics for Prometheus scraping.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        let registry = self.registry.read();
        prometheus_client::encoding::text::encode(&mut buffer, &registry)?;
        Ok(buffer)
    }
}

/// In-flight request marker. Decrements the active gauge on drop, including
/// when the request future is cancelled.
#[must_use]
pub struct ActiveRequest {
    gauge: Gauge,
}

impl Drop for ActiveRequest {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}

/// Normalize a raw path for metrics when no route matched.
///
/// Numeric segments become `:id` so ids do not explode label cardinality.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|part| {
            if !part.is_empty() && part.chars().all(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                part
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
