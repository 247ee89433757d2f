//! API middleware components

pub mod logging;
pub mod metrics;

pub use logging::{logging_middleware, redact_uri};
pub use metrics::metrics_middleware;
