// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the GoDaddy webhook.
//!
//! All metrics use the namespace prefix `godaddy_webhook_` and are exposed by
//! the webhook server on `/metrics`.
//!
//! # Metrics Categories
//!
//! - **Challenge Metrics** - Present/CleanUp calls per solver and their outcome
//! - **Registrar Metrics** - Outbound record-set requests and their latency
//!
//! # Example
//!
//! ```rust,no_run
//! use godaddy_webhook::metrics::record_challenge;
//!
//! record_challenge("godaddy", "Present", "success", std::time::Duration::from_millis(250));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all webhook metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "godaddy_webhook";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Challenge Metrics
// ============================================================================

/// Total number of challenge calls by solver, action and outcome
///
/// Labels:
/// - `solver`: Solver name (e.g., `godaddy`)
/// - `action`: `Present` or `CleanUp`
/// - `outcome`: `success` or an error reason
pub static CHALLENGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_challenges_total"),
        "Total number of challenge calls by solver, action and outcome",
    );
    let counter = CounterVec::new(opts, &["solver", "action", "outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of challenge calls in seconds
pub static CHALLENGE_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_challenge_duration_seconds"),
        "Duration of challenge calls in seconds by solver and action",
    )
    .buckets(vec![0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0]);
    let histogram = HistogramVec::new(opts, &["solver", "action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Registrar Metrics
// ============================================================================

/// Total number of registrar requests by HTTP status (`error` when no response)
pub static REGISTRAR_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_registrar_requests_total"),
        "Total number of registrar API requests by HTTP status",
    );
    let counter = CounterVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Latency of registrar requests in seconds
pub static REGISTRAR_REQUEST_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_registrar_request_duration_seconds"),
        "Latency of registrar API requests in seconds",
    )
    .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record one challenge call
pub fn record_challenge(solver: &str, action: &str, outcome: &str, duration: Duration) {
    CHALLENGES_TOTAL
        .with_label_values(&[solver, action, outcome])
        .inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[solver, action])
        .observe(duration.as_secs_f64());
}

/// Record one registrar request
pub fn record_registrar_request(status: &str, duration: Duration) {
    REGISTRAR_REQUESTS_TOTAL.with_label_values(&[status]).inc();
    REGISTRAR_REQUEST_DURATION_SECONDS
        .with_label_values(&[status])
        .observe(duration.as_secs_f64());
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
///
/// Returns an error if encoding fails.
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
