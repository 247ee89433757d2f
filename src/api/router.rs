use axum::{
    http::{Method, Uri},
    middleware,
    routing::get,
    Router,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::dispatch::Route;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::partners;
use super::pmpartners;
use super::state::AppState;
use super::types::ApiError;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Every envelope endpoint served by the application
pub fn route_table() -> Vec<Route> {
    let mut routes = partners::routes();
    routes.extend(pmpartners::routes());
    routes
}

/// Create the full router with application state
pub fn create_router(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let router = Router::new()
        // Health endpoints (no state needed)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Partner self-service and partner manager controllers
        .merge(partners::create_partners_router())
        .merge(pmpartners::create_pmpartners_router())
        .fallback(unknown_route)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    match metrics {
        Some(m) => router.merge(create_metrics_router(m)),
        None => router,
    }
}

async fn unknown_route(method: Method, uri: Uri) -> ApiError {
    ApiError::unknown_route(format!("No route for {} {}", method, uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    ApiError::method_not_allowed(format!("{} is not served on {}", method, uri.path()))
}
