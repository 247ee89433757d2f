//! Health check endpoints for Kubernetes liveness and readiness checks

use std::future::Future;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use super::state::AppState;
use crate::domain::DomainError;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
/// Used for basic liveness checks
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Key looked up by the readiness check; a miss still proves the store answers
const LOOKUP_KEY: &str = "readiness-check";

/// Readiness check with dependency verification
/// Checks both partner services with a single point lookup each
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let checks = vec![
        check_service(
            "partner_service",
            state.partner_service.get_partner_details(LOOKUP_KEY),
        )
        .await,
        check_service(
            "management_service",
            state.management_service.get_api_key_request(LOOKUP_KEY),
        )
        .await,
    ];

    let overall_status = if checks.iter().all(|c| c.status == HealthStatus::Healthy) {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    };

    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Degraded => StatusCode::OK, // Still accept requests
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
/// Used by Kubernetes liveness checks to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

async fn check_service<T, F>(name: &str, call: F) -> HealthCheck
where
    F: Future<Output = Result<T, DomainError>>,
{
    let start = Instant::now();
    let result = call.await;
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    match result {
        Ok(_) | Err(DomainError::NotFound { .. }) => HealthCheck {
            name: name.to_string(),
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => HealthCheck {
            name: name.to_string(),
            status: HealthStatus::Unhealthy,
            message: Some(e.to_string()),
            latency_ms,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::api::state::{MockPartnerManagementService, MockPartnerService};

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(!json.contains("checks"));
    }

    #[test]
    fn test_health_response_with_checks() {
        let response = HealthResponse {
            status: HealthStatus::Degraded,
            version: "1.0.0".to_string(),
            checks: Some(vec![
                HealthCheck {
                    name: "partner_service".to_string(),
                    status: HealthStatus::Healthy,
                    message: None,
                    latency_ms: Some(5),
                },
                HealthCheck {
                    name: "management_service".to_string(),
                    status: HealthStatus::Unhealthy,
                    message: Some("Storage error: store unavailable".to_string()),
                    latency_ms: Some(100),
                },
            ]),
            latency_ms: Some(105),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"degraded\""));
        assert!(json.contains("\"partner_service\""));
        assert!(json.contains("\"management_service\""));
        assert!(json.contains("store unavailable"));
    }

    async fn ready_status(state: AppState) -> (StatusCode, serde_json::Value) {
        let response = ready_check(State(state)).await.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn services(
        partner_result: Result<(), DomainError>,
    ) -> (MockPartnerService, MockPartnerManagementService) {
        let mut partners = MockPartnerService::new();
        partners.expect_get_all_partners().times(0);
        partners
            .expect_get_partner_details()
            .withf(|id| id == LOOKUP_KEY)
            .times(1)
            .return_once(move |id| {
                partner_result?;
                Err(DomainError::not_found(format!("Partner '{}' not found", id)))
            });

        let mut management = MockPartnerManagementService::new();
        management.expect_list_api_key_requests().times(0);
        management
            .expect_get_api_key_request()
            .times(1)
            .returning(|id| Err(DomainError::not_found(format!("API key request '{}' not found", id))));

        (partners, management)
    }

    #[tokio::test]
    async fn test_ready_when_lookups_miss() {
        let (partners, management) = services(Ok(()));

        let (status, json) =
            ready_status(AppState::new(Arc::new(partners), Arc::new(management))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["checks"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_degraded_when_a_service_fails() {
        let (partners, management) = services(Err(DomainError::storage("store unavailable")));

        let (status, json) =
            ready_status(AppState::new(Arc::new(partners), Arc::new(management))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["checks"][0]["status"], "unhealthy");
        assert_eq!(json["checks"][0]["message"], "Storage error: store unavailable");
        assert_eq!(json["checks"][1]["status"], "healthy");
    }
}
