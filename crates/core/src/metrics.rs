//! Prometheus metrics for the dispatch engine.
//!
//! This module provides metrics for:
//! - Admission (submitted and rejected requests, queue depth)
//! - Dispatch (how each request was matched to a counter)
//! - Service outcomes (completions, cancellations, service duration)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Admission Metrics
// =============================================================================

/// Requests admitted to the queue by priority.
pub static REQUESTS_SUBMITTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "queuedesk_requests_submitted_total",
            "Total requests admitted to the waiting line",
        ),
        &["priority"],
    )
    .unwrap()
});

/// Requests refused at submission by reason.
pub static REQUESTS_REJECTED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "queuedesk_requests_rejected_total",
            "Total submissions refused",
        ),
        &["reason"], // "queue_full", "invalid_input"
    )
    .unwrap()
});

/// Current number of waiting requests.
pub static QUEUE_DEPTH: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("queuedesk_queue_depth", "Requests currently waiting").unwrap()
});

// =============================================================================
// Dispatch Metrics
// =============================================================================

/// Requests handed to counters, by how they were matched.
pub static DISPATCHES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "queuedesk_dispatches_total",
            "Total requests assigned to counters",
        ),
        &["match"], // "specialized", "fallback", "generalist"
    )
    .unwrap()
});

// =============================================================================
// Service Metrics
// =============================================================================

/// Terminal transitions by outcome and priority.
pub static SERVICE_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "queuedesk_service_outcomes_total",
            "Total requests that reached a terminal status",
        ),
        &["outcome", "priority"], // outcome: "completed", "cancelled"
    )
    .unwrap()
});

/// Service duration of completed requests in minutes.
pub static SERVICE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "queuedesk_service_duration_minutes",
            "Time from service start to completion",
        )
        .buckets(vec![0.5, 1.0, 2.0, 3.0, 5.0, 10.0, 15.0, 30.0, 60.0]),
        &["priority"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(REQUESTS_SUBMITTED.clone()),
        Box::new(REQUESTS_REJECTED.clone()),
        Box::new(QUEUE_DEPTH.clone()),
        Box::new(DISPATCHES.clone()),
        Box::new(SERVICE_OUTCOMES.clone()),
        Box::new(SERVICE_DURATION.clone()),
    ]
}
