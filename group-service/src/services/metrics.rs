//! Prometheus metrics for the group service.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
static DIRECTORY_OPERATIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize metrics collection. Called once from `main`; tests skip it and
/// the recording helpers degrade to no-ops.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if METRICS_HANDLE.set(handle).is_err() {
        panic!("failed to set metrics handle: already initialized");
    }

    let registry = Registry::new();

    let operations_counter = IntCounterVec::new(
        Opts::new(
            "directory_operations_total",
            "Directory operations by operation name and outcome",
        ),
        &["operation", "outcome"],
    )
    .expect("failed to create directory_operations_total metric");

    registry
        .register(Box::new(operations_counter.clone()))
        .expect("failed to register directory_operations_total");

    PROMETHEUS_REGISTRY
        .set(registry)
        .expect("failed to set prometheus registry");
    DIRECTORY_OPERATIONS_TOTAL
        .set(operations_counter)
        .expect("failed to set directory_operations_total");
}

/// Record one directory operation outcome (`success` / `error`).
pub fn record_directory_operation(operation: &str, outcome: &str) {
    if let Some(counter) = DIRECTORY_OPERATIONS_TOTAL.get() {
        counter.with_label_values(&[operation, outcome]).inc();
    }
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}
