//! Request/response logging middleware with sensitive data redaction

use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::info;

/// Route parameters whose values must never reach the logs
const SENSITIVE_PARAMS: &[&str] = &["{partnerAPIKey}"];

/// Middleware to log HTTP requests and responses with sensitive data redaction.
/// `TraceLayer` owns the request span; this middleware only emits events.
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let matched = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());
    let path = matched
        .clone()
        .unwrap_or_else(|| request.uri().path().to_string());
    let uri = redact_uri(request.uri().path(), matched.as_deref());
    let request_id = extract_request_id(&request);

    let headers_log = redact_headers(&request);

    info!(
        method = %method,
        path = %path,
        uri = %uri,
        request_id = %request_id,
        headers = %headers_log,
        "Incoming request"
    );

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        request_id = %request_id,
        "Request completed"
    );

    response
}

fn extract_request_id(request: &Request<Body>) -> String {
    request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Mask path segments bound to sensitive route parameters
///
/// Segments are aligned with the matched route template; without a template
/// the path is logged as is.
pub fn redact_uri(path: &str, template: Option<&str>) -> String {
    let Some(template) = template else {
        return path.to_string();
    };

    let template_segments: Vec<&str> = template.split('/').collect();

    path.split('/')
        .enumerate()
        .map(|(i, segment)| match template_segments.get(i) {
            Some(param) if SENSITIVE_PARAMS.contains(param) => "[REDACTED]",
            _ => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Redact sensitive headers for logging
fn redact_headers(request: &Request<Body>) -> String {
    let mut parts = Vec::new();

    for (name, value) in request.headers() {
        let name_str = name.as_str().to_lowercase();
        if !should_log_header(&name_str) {
            continue;
        }

        let value_str = if is_sensitive_header(&name_str) {
            "[REDACTED]".to_string()
        } else {
            value.to_str().unwrap_or("[invalid]").to_string()
        };
        parts.push(format!("{}={}", name_str, value_str));
    }

    parts.join(", ")
}

/// Check if a header contains sensitive information
fn is_sensitive_header(name: &str) -> bool {
    matches!(
        name,
        "authorization" | "cookie" | "set-cookie" | "x-auth-token" | "proxy-authorization"
    )
}

/// Check if a header should be logged
fn should_log_header(name: &str) -> bool {
    matches!(
        name,
        "content-type"
            | "content-length"
            | "accept"
            | "user-agent"
            | "x-request-id"
            | "x-forwarded-for"
            | "authorization"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_sensitive_header() {
        assert!(is_sensitive_header("authorization"));
        assert!(is_sensitive_header("cookie"));
        assert!(!is_sensitive_header("content-type"));
        assert!(!is_sensitive_header("accept"));
    }

    #[test]
    fn test_should_log_header() {
        assert!(should_log_header("content-type"));
        assert!(should_log_header("x-request-id"));
        assert!(!should_log_header("cache-control"));
        assert!(!should_log_header("etag"));
    }

    #[test]
    fn test_redact_uri_masks_api_key() {
        let uri = redact_uri(
            "/pmpartners/1001/pk_live_abc",
            Some("/pmpartners/{partnerID}/{partnerAPIKey}"),
        );
        assert_eq!(uri, "/pmpartners/1001/[REDACTED]");
    }

    #[test]
    fn test_redact_uri_keeps_other_paths() {
        assert_eq!(
            redact_uri("/pmpartners/updateStatus/1001", Some("/pmpartners/updateStatus/{partnerID}")),
            "/pmpartners/updateStatus/1001"
        );
        assert_eq!(redact_uri("/nowhere/x", None), "/nowhere/x");
    }
}
