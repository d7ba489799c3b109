//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts by method, matched path, and status
//! - HTTP request latency histograms
//! - Blog post views
//! - Medication logs created
//! - Notes analyzed, by outcome

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "health_tracker";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

pub static BLOG_POST_VIEWS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::with_opts(
        Opts::new("blog_post_views_total", "Total number of recorded blog post views")
            .namespace(NAMESPACE),
    )
    .expect("Failed to create BLOG_POST_VIEWS_TOTAL metric")
});

pub static MEDICATION_LOGS_CREATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "medication_logs_created_total",
            "Total number of medication logs created",
        )
        .namespace(NAMESPACE),
        &["source"], // "manual", "note"
    )
    .expect("Failed to create MEDICATION_LOGS_CREATED_TOTAL metric")
});

pub static NOTES_ANALYZED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("notes_analyzed_total", "Total number of note extraction requests")
            .namespace(NAMESPACE),
        &["outcome"], // "ok", "unparseable", "upstream_error", "not_configured"
    )
    .expect("Failed to create NOTES_ANALYZED_TOTAL metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(BLOG_POST_VIEWS_TOTAL.clone()))
        .expect("Failed to register BLOG_POST_VIEWS_TOTAL");
    registry
        .register(Box::new(MEDICATION_LOGS_CREATED_TOTAL.clone()))
        .expect("Failed to register MEDICATION_LOGS_CREATED_TOTAL");
    registry
        .register(Box::new(NOTES_ANALYZED_TOTAL.clone()))
        .expect("Failed to register NOTES_ANALYZED_TOTAL");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

pub fn record_blog_post_view() {
    BLOG_POST_VIEWS_TOTAL.inc();
}

/// `source` is "manual" or "note".
pub fn record_medication_log_created(source: &str) {
    MEDICATION_LOGS_CREATED_TOTAL
        .with_label_values(&[source])
        .inc();
}

/// `outcome` is "ok", "unparseable", "upstream_error" or "not_configured".
pub fn record_note_analyzed(outcome: &str) {
    NOTES_ANALYZED_TOTAL.with_label_values(&[outcome]).inc();
}

/// Current count for one note analysis outcome.
pub fn notes_analyzed(outcome: &str) -> u64 {
    NOTES_ANALYZED_TOTAL.with_label_values(&[outcome]).get()
}
