//! Observability utilities for the stats service.
//!
//! - Prometheus metrics recording and export
//! - Hit and query metrics ([`StatsMetrics`])
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, StatsMetrics};
//!
//! init_metrics()?;
//! StatsMetrics::set_known_apps(["ewm-main-service"]);
//! StatsMetrics::record_hit("ewm-main-service");
//!
//! let app = Router::new().route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod stats;

pub use middleware::metrics_middleware;
pub use stats::StatsMetrics;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder once per process.
///
/// Later calls return the handle installed by the first one.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");
        register_metric_descriptions();

        Ok(handle)
    })
}

pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_histogram};

    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP request errors"
    );

    describe_counter!(
        stats::HITS_RECORDED,
        "Hits recorded, labelled by known calling application or \"other\""
    );
    describe_counter!(
        stats::QUERIES,
        "Stats queries served, labelled by unique flag"
    );
    describe_histogram!(stats::QUERY_ROWS, "Rows returned per stats query");
    describe_histogram!(
        stats::QUERY_DURATION,
        "Stats aggregation duration in seconds"
    );
}
