//! HTTP metrics middleware for recording request/response metrics

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::infrastructure::observability::{record_http_request, UNMATCHED_PATH};

/// Middleware to record HTTP request metrics
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = metric_path(&request);

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

/// Route template of the request; raw paths would put partner ids and keys into labels
fn metric_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_request_uses_fixed_label() {
        let request = Request::builder()
            .uri("/pmpartners/1001/pk_live_abc")
            .body(Body::empty())
            .unwrap();

        assert_eq!(metric_path(&request), UNMATCHED_PATH);
    }
}
