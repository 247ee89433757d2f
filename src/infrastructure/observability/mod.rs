//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_endpoint_outcome, record_http_request,
    PrometheusMetrics, UNMATCHED_PATH,
};
