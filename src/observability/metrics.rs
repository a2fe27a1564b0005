//! # Metrics
//!
//! Prometheus metrics for notification delivery.
//!
//! ## Metrics Exposed
//!
//! - `cleaner_notifications_total{type,outcome}` - Notifications attempted, by destination and outcome
//! - `cleaner_notification_duration_seconds{type}` - Duration of a single delivery
//! - `cleaner_reports_written_total{operation}` - Report objects created or updated
//! - `cleaner_notification_dispatch_aborted_total` - Dispatch cycles stopped by a failed notification
//!
//! Metrics are registered in a crate-level [`Registry`]; the host process
//! decides whether and where to expose it.

use anyhow::Result;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};
use std::sync::LazyLock;

pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static NOTIFICATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cleaner_notifications_total",
            "Total number of notifications attempted",
        ),
        &["type", "outcome"],
    )
    .expect("Failed to create NOTIFICATIONS_TOTAL metric - this should never happen")
});

static NOTIFICATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cleaner_notification_duration_seconds",
            "Duration of notification delivery in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["type"],
    )
    .expect("Failed to create NOTIFICATION_DURATION metric - this should never happen")
});

static REPORTS_WRITTEN_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cleaner_reports_written_total",
            "Total number of Report objects written",
        ),
        &["operation"],
    )
    .expect("Failed to create REPORTS_WRITTEN_TOTAL metric - this should never happen")
});

static DISPATCH_ABORTED_TOTAL: LazyLock<IntCounter> = LazyLock::new(|| {
    IntCounter::new(
        "cleaner_notification_dispatch_aborted_total",
        "Total number of dispatch cycles stopped by a failed notification",
    )
    .expect("Failed to create DISPATCH_ABORTED_TOTAL metric - this should never happen")
});

/// Register all notifier metrics with the crate registry
///
/// # Errors
/// Returns an error if a metric is already registered
pub fn register_metrics() -> Result<()> {
    REGISTRY.register(Box::new(NOTIFICATIONS_TOTAL.clone()))?;
    REGISTRY.register(Box::new(NOTIFICATION_DURATION.clone()))?;
    REGISTRY.register(Box::new(REPORTS_WRITTEN_TOTAL.clone()))?;
    REGISTRY.register(Box::new(DISPATCH_ABORTED_TOTAL.clone()))?;

    Ok(())
}

/// Registry the notifier metrics live in
#[must_use]
pub fn registry() -> &'static Registry {
    &REGISTRY
}

pub fn record_notification(notification_type: &str, success: bool, duration: f64) {
    let outcome = if success { "success" } else { "failure" };
    NOTIFICATIONS_TOTAL
        .with_label_values(&[notification_type, outcome])
        .inc();
    NOTIFICATION_DURATION
        .with_label_values(&[notification_type])
        .observe(duration);
}

/// `operation` is either "create" or "update"
pub fn increment_reports_written(operation: &str) {
    REPORTS_WRITTEN_TOTAL.with_label_values(&[operation]).inc();
}

pub fn increment_dispatch_aborted() {
    DISPATCH_ABORTED_TOTAL.inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_metrics() {
        // This should not panic - metrics should register successfully
        assert!(register_metrics().is_ok());
    }

    #[test]
    fn test_record_notification_splits_outcomes() {
        let success_before = NOTIFICATIONS_TOTAL
            .with_label_values(&["MetricsTest", "success"])
            .get();
        let failure_before = NOTIFICATIONS_TOTAL
            .with_label_values(&["MetricsTest", "failure"])
            .get();

        record_notification("MetricsTest", true, 0.2);
        record_notification("MetricsTest", false, 0.1);
        record_notification("MetricsTest", false, 0.1);

        assert_eq!(
            NOTIFICATIONS_TOTAL
                .with_label_values(&["MetricsTest", "success"])
                .get(),
            success_before + 1
        );
        assert_eq!(
            NOTIFICATIONS_TOTAL
                .with_label_values(&["MetricsTest", "failure"])
                .get(),
            failure_before + 2
        );
    }

    #[test]
    fn test_increment_reports_written() {
        let before = REPORTS_WRITTEN_TOTAL.with_label_values(&["create"]).get();
        increment_reports_written("create");
        // Other tests write reports concurrently
        let after = REPORTS_WRITTEN_TOTAL.with_label_values(&["create"]).get();
        assert!(after > before);
    }

    #[test]
    fn test_increment_dispatch_aborted() {
        let before = DISPATCH_ABORTED_TOTAL.get();
        increment_dispatch_aborted();
        assert!(DISPATCH_ABORTED_TOTAL.get() > before);
    }
}
