//! Application state for shared services

use std::sync::Arc;

use crate::domain::partner::dto::{
    ActivateDeactivatePartnerRequest, ApiKeyRequestDetails, ApiKeyRequestStatus,
    DigitalCertificateRequest, DigitalCertificateResponse, DownloadPartnerApiKeyResponse,
    PartnerApiKeyRequest, PartnerApiKeyResponse, PartnerApiKeyToPolicyMappingsResponse,
    PartnerRequest, PartnerResponse, PartnerUpdateRequest, PartnersPolicyMappingRequest,
    PartnersPolicyMappingResponse, PartnersResponse, PolicyIdResponse,
    RetrievePartnerDetailsResponse,
};
use crate::domain::DomainError;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub partner_service: Arc<dyn PartnerService>,
    pub management_service: Arc<dyn PartnerManagementService>,
}

impl AppState {
    pub fn new(
        partner_service: Arc<dyn PartnerService>,
        management_service: Arc<dyn PartnerManagementService>,
    ) -> Self {
        Self {
            partner_service,
            management_service,
        }
    }
}

/// Partner self-service operations behind `/partners`
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PartnerService: Send + Sync {
    /// Register a new partner organization
    async fn save_partner(&self, request: PartnerRequest) -> Result<PartnerResponse, DomainError>;

    async fn get_partner_details(
        &self,
        partner_id: &str,
    ) -> Result<RetrievePartnerDetailsResponse, DomainError>;

    async fn get_all_partners(&self) -> Result<PartnersResponse, DomainError>;

    async fn get_partner_details_by_name(
        &self,
        organization_name: &str,
    ) -> Result<RetrievePartnerDetailsResponse, DomainError>;

    async fn get_policy_id(&self, policy_name: &str) -> Result<PolicyIdResponse, DomainError>;

    async fn update_partner(
        &self,
        request: PartnerUpdateRequest,
        partner_id: &str,
    ) -> Result<PartnerResponse, DomainError>;

    /// Submit a request for an API key under a named policy
    async fn submit_api_key_request(
        &self,
        request: PartnerApiKeyRequest,
        partner_id: &str,
    ) -> Result<PartnerApiKeyResponse, DomainError>;

    /// Retrieve the key issued for an approved request
    async fn download_api_key(
        &self,
        partner_id: &str,
        request_id: &str,
    ) -> Result<DownloadPartnerApiKeyResponse, DomainError>;

    async fn list_api_key_requests(
        &self,
        partner_id: &str,
    ) -> Result<Vec<ApiKeyRequestStatus>, DomainError>;

    async fn view_api_key_request(
        &self,
        partner_id: &str,
        request_id: &str,
    ) -> Result<ApiKeyRequestStatus, DomainError>;

    async fn validate_digital_certificate(
        &self,
        request: DigitalCertificateRequest,
    ) -> Result<DigitalCertificateResponse, DomainError>;

    async fn upload_digital_certificate(
        &self,
        request: DigitalCertificateRequest,
    ) -> Result<DigitalCertificateResponse, DomainError>;
}

/// Partner manager operations behind `/pmpartners`
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PartnerManagementService: Send + Sync {
    /// Move a partner API key to a different policy
    async fn map_api_key_policy(
        &self,
        request: PartnersPolicyMappingRequest,
        partner_id: &str,
        api_key: &str,
    ) -> Result<PartnersPolicyMappingResponse, DomainError>;

    async fn update_partner_status(
        &self,
        partner_id: &str,
        request: ActivateDeactivatePartnerRequest,
    ) -> Result<PartnersPolicyMappingResponse, DomainError>;

    async fn update_api_key_status(
        &self,
        partner_id: &str,
        request: ActivateDeactivatePartnerRequest,
        api_key: &str,
    ) -> Result<PartnersPolicyMappingResponse, DomainError>;

    /// Approve or reject a pending API key request
    async fn decide_api_key_request(
        &self,
        request: ActivateDeactivatePartnerRequest,
        request_id: &str,
    ) -> Result<PartnersPolicyMappingResponse, DomainError>;

    async fn list_partners(&self) -> Result<PartnersResponse, DomainError>;

    async fn get_partner(
        &self,
        partner_id: &str,
    ) -> Result<RetrievePartnerDetailsResponse, DomainError>;

    async fn get_api_key_policy_mapping(
        &self,
        partner_id: &str,
        api_key: &str,
    ) -> Result<PartnerApiKeyToPolicyMappingsResponse, DomainError>;

    async fn list_api_key_requests(&self) -> Result<Vec<ApiKeyRequestDetails>, DomainError>;

    async fn get_api_key_request(
        &self,
        request_id: &str,
    ) -> Result<ApiKeyRequestDetails, DomainError>;

    async fn get_policy_id(&self, policy_name: &str) -> Result<PolicyIdResponse, DomainError>;
}
