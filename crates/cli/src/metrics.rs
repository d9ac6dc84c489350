//! Prometheus registry for the command driver.
//!
//! Holds the core dispatch metrics plus gauges sampled from the desk right
//! before encoding:
//! - Waiting requests per priority class
//! - Counters per status
//! - Requests currently at counters

use once_cell::sync::Lazy;
use prometheus::{self, Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};

use queuedesk_core::{CounterStatus, Desk, Priority};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Waiting requests by priority.
pub static WAITING_BY_PRIORITY: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new(
            "queuedesk_waiting_requests",
            "Requests waiting in the queue by priority",
        ),
        &["priority"],
    )
    .unwrap()
});

/// Counters by status.
pub static COUNTERS_BY_STATUS: Lazy<IntGaugeVec> = Lazy::new(|| {
    IntGaugeVec::new(
        Opts::new("queuedesk_counters", "Service counters by status"),
        &["status"], // "available", "busy", "inactive"
    )
    .unwrap()
});

/// Requests assigned to or being served at counters.
pub static REQUESTS_AT_COUNTERS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "queuedesk_requests_at_counters",
        "Requests currently assigned to or served at a counter",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(WAITING_BY_PRIORITY.clone()))
        .unwrap();
    registry
        .register(Box::new(COUNTERS_BY_STATUS.clone()))
        .unwrap();
    registry
        .register(Box::new(REQUESTS_AT_COUNTERS.clone()))
        .unwrap();

    // Core metrics (admission, dispatch, service outcomes)
    for metric in queuedesk_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Update gauges with current values from the desk.
pub fn collect_dynamic_metrics(desk: &Desk) {
    let stats = desk.stats();

    for priority in Priority::ALL {
        let waiting = stats.by_priority.get(&priority).copied().unwrap_or(0);
        WAITING_BY_PRIORITY
            .with_label_values(&[priority.as_str()])
            .set(waiting as i64);
    }

    for (status, label) in [
        (CounterStatus::Available, "available"),
        (CounterStatus::Busy, "busy"),
        (CounterStatus::Inactive, "inactive"),
    ] {
        let count = stats.counters.iter().filter(|c| c.status == status).count();
        COUNTERS_BY_STATUS
            .with_label_values(&[label])
            .set(count as i64);
    }

    REQUESTS_AT_COUNTERS.set(stats.at_counters as i64);
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}
