//! Partner manager implementation

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use super::{policy_id_by_name, require_partner};
use crate::api::state::PartnerManagementService;
use crate::domain::partner::dto::{
    ActivateDeactivatePartnerRequest, ApiKeyRequestDetails, PartnerApiKeyToPolicyMappingsResponse,
    PartnersPolicyMappingRequest, PartnersPolicyMappingResponse, PartnersResponse,
    PolicyIdResponse, RetrievePartnerDetailsResponse,
};
use crate::domain::partner::{
    ActivationStatus, ApiKeyRequest, ApiKeyRequestState, PartnerApiKey, PartnerRepository,
};
use crate::domain::DomainError;
use crate::infrastructure::partner::ApiKeyGenerator;

const DEFAULT_KEY_VALIDITY_DAYS: i64 = 180;

/// Partner manager operations backed by a partner repository
#[derive(Debug)]
pub struct DefaultPartnerManagementService<R: PartnerRepository> {
    repository: Arc<R>,
    generator: ApiKeyGenerator,
    key_validity: Duration,
}

impl<R: PartnerRepository> DefaultPartnerManagementService<R> {
    /// Create a new partner management service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::default(),
            key_validity: Duration::days(DEFAULT_KEY_VALIDITY_DAYS),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Set how long issued keys stay valid
    pub fn with_key_validity(mut self, key_validity: Duration) -> Self {
        self.key_validity = key_validity;
        self
    }

    /// Load an issued key and check it belongs to the partner
    async fn owned_api_key(
        &self,
        partner_id: &str,
        api_key: &str,
    ) -> Result<PartnerApiKey, DomainError> {
        self.repository
            .get_api_key(api_key)
            .await?
            .filter(|k| k.belongs_to(partner_id))
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "Partner API key not found for partner '{}'",
                    partner_id
                ))
            })
    }

    async fn request_details(
        &self,
        request: &ApiKeyRequest,
    ) -> Result<ApiKeyRequestDetails, DomainError> {
        let organization_name = self
            .repository
            .get_partner(request.partner_id())
            .await?
            .map(|p| p.organization_name().to_string())
            .unwrap_or_default();
        let policy_name = self
            .repository
            .get_policy(request.policy_id())
            .await?
            .map(|p| p.name)
            .unwrap_or_default();

        Ok(ApiKeyRequestDetails {
            api_key_req_id: request.id().to_string(),
            partner_id: request.partner_id().to_string(),
            organization_name,
            policy_name,
            policy_id: request.policy_id().to_string(),
            use_case_description: request.use_case_description().to_string(),
            status: request.state().to_string(),
            requested_at: request.created_at(),
        })
    }

    async fn approve(&self, request: &ApiKeyRequest) -> Result<(), DomainError> {
        let issued = PartnerApiKey::new(
            self.generator.generate(),
            request.partner_id(),
            request.policy_id(),
            Utc::now() + self.key_validity,
        );

        self.repository.issue_api_key(request.id(), issued).await?;
        Ok(())
    }
}

fn parse_activation(status: &str) -> Result<ActivationStatus, DomainError> {
    status
        .parse::<ActivationStatus>()
        .map_err(|e| DomainError::validation(e.to_string()))
}

#[async_trait::async_trait]
impl<R: PartnerRepository + 'static> PartnerManagementService
    for DefaultPartnerManagementService<R>
{
    async fn map_api_key_policy(
        &self,
        request: PartnersPolicyMappingRequest,
        partner_id: &str,
        api_key: &str,
    ) -> Result<PartnersPolicyMappingResponse, DomainError> {
        info!(partner_id = %partner_id, new_policy = %request.new_policy_id, "Remapping partner API key policy");

        require_partner(self.repository.as_ref(), partner_id).await?;
        self.owned_api_key(partner_id, api_key).await?;

        let policy = self
            .repository
            .get_policy(&request.new_policy_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Policy '{}' not found", request.new_policy_id))
            })?;

        let new_policy_id = policy.id.clone();
        let old_policy_id = request.old_policy_id;
        self.repository
            .update_api_key(
                api_key,
                Box::new(move |key| {
                    if key.policy_id() != old_policy_id {
                        return Err(DomainError::validation(format!(
                            "Partner API key is not mapped to policy '{}'",
                            old_policy_id
                        )));
                    }

                    key.remap(new_policy_id);
                    Ok(())
                }),
            )
            .await?;

        Ok(PartnersPolicyMappingResponse {
            message: format!("Partner API key mapped to policy '{}'", policy.id),
        })
    }

    async fn update_partner_status(
        &self,
        partner_id: &str,
        request: ActivateDeactivatePartnerRequest,
    ) -> Result<PartnersPolicyMappingResponse, DomainError> {
        let status = parse_activation(&request.status)?;
        info!(partner_id = %partner_id, status = %status, "Updating partner status");

        self.repository
            .update_partner(
                partner_id,
                Box::new(move |partner| {
                    partner.set_status(status);
                    Ok(())
                }),
            )
            .await?;

        Ok(PartnersPolicyMappingResponse {
            message: format!("Partner status updated to {}", status),
        })
    }

    async fn update_api_key_status(
        &self,
        partner_id: &str,
        request: ActivateDeactivatePartnerRequest,
        api_key: &str,
    ) -> Result<PartnersPolicyMappingResponse, DomainError> {
        let status = parse_activation(&request.status)?;
        info!(partner_id = %partner_id, status = %status, "Updating partner API key status");

        self.owned_api_key(partner_id, api_key).await?;
        self.repository
            .update_api_key(
                api_key,
                Box::new(move |key| {
                    key.set_status(status);
                    Ok(())
                }),
            )
            .await?;

        Ok(PartnersPolicyMappingResponse {
            message: format!("Partner API key status updated to {}", status),
        })
    }

    async fn decide_api_key_request(
        &self,
        request: ActivateDeactivatePartnerRequest,
        request_id: &str,
    ) -> Result<PartnersPolicyMappingResponse, DomainError> {
        let decision = ApiKeyRequestState::parse_decision(&request.status)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        info!(request_id = %request_id, decision = %decision, "Deciding API key request");

        let api_key_request = self
            .repository
            .get_api_key_request(request_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("API key request '{}' not found", request_id))
            })?;
        api_key_request.ensure_pending()?;

        let message = match decision {
            ApiKeyRequestState::Approved => {
                self.approve(&api_key_request).await?;
                "Partner API key request approved"
            }
            _ => {
                self.repository
                    .update_api_key_request(
                        request_id,
                        Box::new(|request| {
                            request.ensure_pending()?;
                            request.reject();
                            Ok(())
                        }),
                    )
                    .await?;
                "Partner API key request rejected"
            }
        };

        Ok(PartnersPolicyMappingResponse {
            message: message.to_string(),
        })
    }

    async fn list_partners(&self) -> Result<PartnersResponse, DomainError> {
        let partners = self.repository.list_partners().await?;

        Ok(PartnersResponse {
            partners: partners
                .iter()
                .map(RetrievePartnerDetailsResponse::from)
                .collect(),
        })
    }

    async fn get_partner(
        &self,
        partner_id: &str,
    ) -> Result<RetrievePartnerDetailsResponse, DomainError> {
        let partner = require_partner(self.repository.as_ref(), partner_id).await?;
        Ok(RetrievePartnerDetailsResponse::from(&partner))
    }

    async fn get_api_key_policy_mapping(
        &self,
        partner_id: &str,
        api_key: &str,
    ) -> Result<PartnerApiKeyToPolicyMappingsResponse, DomainError> {
        let key = self.owned_api_key(partner_id, api_key).await?;
        Ok(PartnerApiKeyToPolicyMappingsResponse::from(&key))
    }

    async fn list_api_key_requests(&self) -> Result<Vec<ApiKeyRequestDetails>, DomainError> {
        let requests = self.repository.list_api_key_requests(None).await?;

        let mut details = Vec::with_capacity(requests.len());
        for request in &requests {
            details.push(self.request_details(request).await?);
        }

        Ok(details)
    }

    async fn get_api_key_request(
        &self,
        request_id: &str,
    ) -> Result<ApiKeyRequestDetails, DomainError> {
        let request = self
            .repository
            .get_api_key_request(request_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("API key request '{}' not found", request_id))
            })?;

        self.request_details(&request).await
    }

    async fn get_policy_id(&self, policy_name: &str) -> Result<PolicyIdResponse, DomainError> {
        policy_id_by_name(self.repository.as_ref(), policy_name).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::state::PartnerService;
    use crate::domain::partner::dto::PartnerUpdateRequest;
    use crate::domain::partner::{Partner, Policy};
    use crate::infrastructure::partner::InMemoryPartnerStore;
    use crate::infrastructure::services::yielding::YieldingStore;
    use crate::infrastructure::services::DefaultPartnerService;

    async fn setup() -> (
        DefaultPartnerManagementService<InMemoryPartnerStore>,
        Arc<InMemoryPartnerStore>,
    ) {
        let store = Arc::new(InMemoryPartnerStore::with_policies(vec![
            Policy::new("policy-1", "Auth Policy", "default"),
            Policy::new("policy-2", "eKYC Policy", "default"),
        ]));
        store
            .create_partner(Partner::new("1001", "Acme", "default"))
            .await
            .unwrap();
        store
            .create_api_key_request(ApiKeyRequest::new("req-1", "1001", "policy-1", "auth"))
            .await
            .unwrap();

        let service = DefaultPartnerManagementService::new(store.clone())
            .with_generator(ApiKeyGenerator::new("pk_test_"))
            .with_key_validity(Duration::days(30));

        (service, store)
    }

    fn status(value: &str) -> ActivateDeactivatePartnerRequest {
        ActivateDeactivatePartnerRequest {
            status: value.to_string(),
        }
    }

    async fn approve(
        service: &DefaultPartnerManagementService<InMemoryPartnerStore>,
        store: &InMemoryPartnerStore,
    ) -> String {
        service
            .decide_api_key_request(status("Approved"), "req-1")
            .await
            .unwrap();

        store
            .get_api_key_request("req-1")
            .await
            .unwrap()
            .and_then(|r| r.api_key().map(String::from))
            .unwrap()
    }

    #[tokio::test]
    async fn test_approve_issues_key() {
        let (service, store) = setup().await;
        let key = approve(&service, &store).await;
        assert!(key.starts_with("pk_test_"));

        let mapping = service.get_api_key_policy_mapping("1001", &key).await.unwrap();
        assert_eq!(mapping.policy_id, "policy-1");
        assert_eq!(mapping.status, "Active");
        assert!(mapping.valid_till > Utc::now() + Duration::days(29));
    }

    #[tokio::test]
    async fn test_reject_request() {
        let (service, store) = setup().await;

        let response = service
            .decide_api_key_request(status("Rejected"), "req-1")
            .await
            .unwrap();
        assert_eq!(response.message, "Partner API key request rejected");

        let request = store.get_api_key_request("req-1").await.unwrap().unwrap();
        assert_eq!(request.state(), ApiKeyRequestState::Rejected);
        assert!(request.api_key().is_none());
    }

    #[tokio::test]
    async fn test_decision_only_once() {
        let (service, store) = setup().await;
        approve(&service, &store).await;

        let again = service
            .decide_api_key_request(status("Rejected"), "req-1")
            .await;
        assert!(matches!(again, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_unknown_decision() {
        let (service, _) = setup().await;

        let result = service
            .decide_api_key_request(status("Maybe"), "req-1")
            .await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_partner_status_update() {
        let (service, _) = setup().await;

        service
            .update_partner_status("1001", status("De-Active"))
            .await
            .unwrap();
        let partner = service.get_partner("1001").await.unwrap();
        assert_eq!(partner.status, "De-Active");

        let invalid = service.update_partner_status("1001", status("Paused")).await;
        assert!(matches!(invalid, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_api_key_status_requires_ownership() {
        let (service, store) = setup().await;
        let key = approve(&service, &store).await;

        service
            .update_api_key_status("1001", status("De-Active"), &key)
            .await
            .unwrap();
        let mapping = service.get_api_key_policy_mapping("1001", &key).await.unwrap();
        assert_eq!(mapping.status, "De-Active");

        let foreign = service
            .update_api_key_status("2002", status("Active"), &key)
            .await;
        assert!(matches!(foreign, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_policy_remapping() {
        let (service, store) = setup().await;
        let key = approve(&service, &store).await;

        let stale = PartnersPolicyMappingRequest {
            old_policy_id: "policy-2".to_string(),
            new_policy_id: "policy-1".to_string(),
        };
        let result = service.map_api_key_policy(stale, "1001", &key).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));

        let request = PartnersPolicyMappingRequest {
            old_policy_id: "policy-1".to_string(),
            new_policy_id: "policy-2".to_string(),
        };
        service.map_api_key_policy(request, "1001", &key).await.unwrap();

        let mapping = service.get_api_key_policy_mapping("1001", &key).await.unwrap();
        assert_eq!(mapping.policy_id, "policy-2");
    }

    #[tokio::test]
    async fn test_request_listing_joins_names() {
        let (service, _) = setup().await;

        let requests = service.list_api_key_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].organization_name, "Acme");
        assert_eq!(requests[0].policy_name, "Auth Policy");
        assert_eq!(requests[0].status, "in-progress");

        let missing = service.get_api_key_request("req-404").await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_policy_id_lookup() {
        let (service, _) = setup().await;

        let policy = service.get_policy_id("eKYC Policy").await.unwrap();
        assert_eq!(policy.policy_id, "policy-2");

        let missing = service.get_policy_id("DoesNotExist").await;
        assert!(matches!(missing, Err(DomainError::NotFound { .. })));
    }

    async fn yielding_setup() -> Arc<YieldingStore> {
        let store = Arc::new(YieldingStore(InMemoryPartnerStore::with_policies(vec![
            Policy::new("policy-1", "Auth Policy", "default"),
        ])));
        store
            .create_api_key_request(ApiKeyRequest::new("req-1", "1001", "policy-1", "auth"))
            .await
            .unwrap();
        store
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_decisions_accept_one() {
        let store = yielding_setup().await;
        let service = Arc::new(DefaultPartnerManagementService::new(store.clone()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let service = service.clone();
                let decision = if i % 2 == 0 { "Approved" } else { "Rejected" };
                tokio::spawn(async move {
                    service
                        .decide_api_key_request(status(decision), "req-1")
                        .await
                })
            })
            .collect();

        let mut accepted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => accepted += 1,
                Err(DomainError::Conflict { .. }) => {}
                Err(other) => panic!("unexpected error: {}", other),
            }
        }
        assert_eq!(accepted, 1);

        let request = store.get_api_key_request("req-1").await.unwrap().unwrap();
        match request.state() {
            ApiKeyRequestState::Approved => {
                let key = request.api_key().unwrap();
                assert!(store.get_api_key(key).await.unwrap().is_some());
            }
            state => {
                assert_eq!(state, ApiKeyRequestState::Rejected);
                assert!(request.api_key().is_none());
            }
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_status_and_contact_updates_both_survive() {
        let store = yielding_setup().await;
        let management = Arc::new(DefaultPartnerManagementService::new(store.clone()));
        let partners = Arc::new(DefaultPartnerService::new(store.clone()));

        for i in 0..20 {
            let id = format!("{}", 2000 + i);
            store
                .create_partner(Partner::new(&id, format!("Org {}", i), "default"))
                .await
                .unwrap();

            let deactivate = {
                let management = management.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    management
                        .update_partner_status(&id, status("De-Active"))
                        .await
                })
            };
            let contact = {
                let partners = partners.clone();
                let id = id.clone();
                tokio::spawn(async move {
                    let update = PartnerUpdateRequest {
                        address: "2 High St".to_string(),
                        contact_number: "+2000".to_string(),
                        email_id: "new@org.test".to_string(),
                    };
                    partners.update_partner(update, &id).await
                })
            };
            deactivate.await.unwrap().unwrap();
            contact.await.unwrap().unwrap();

            let partner = store.get_partner(&id).await.unwrap().unwrap();
            assert_eq!(partner.status(), ActivationStatus::DeActive);
            assert_eq!(partner.address(), "2 High St");
        }
    }
}

