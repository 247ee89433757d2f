//! Partner self-service implementation

use std::sync::Arc;

use tracing::{debug, info};

use super::{policy_id_by_name, require_partner, require_policy_by_name};
use crate::api::state::PartnerService;
use crate::domain::partner::dto::{
    ApiKeyRequestStatus, DigitalCertificateRequest, DigitalCertificateResponse,
    DownloadPartnerApiKeyResponse, PartnerApiKeyRequest, PartnerApiKeyResponse, PartnerRequest,
    PartnerResponse, PartnerUpdateRequest, PartnersResponse, PolicyIdResponse,
    RetrievePartnerDetailsResponse,
};
use crate::domain::partner::{ApiKeyRequest, ApiKeyRequestState, Partner, PartnerRepository};
use crate::domain::DomainError;
use crate::infrastructure::partner::ApiKeyGenerator;

const MAX_ID_ATTEMPTS: usize = 5;

/// Partner self-service backed by a partner repository
#[derive(Debug)]
pub struct DefaultPartnerService<R: PartnerRepository> {
    repository: Arc<R>,
    generator: ApiKeyGenerator,
}

impl<R: PartnerRepository> DefaultPartnerService<R> {
    /// Create a new partner service
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            generator: ApiKeyGenerator::default(),
        }
    }

    /// Create with a custom generator
    pub fn with_generator(mut self, generator: ApiKeyGenerator) -> Self {
        self.generator = generator;
        self
    }

    async fn next_partner_id(&self) -> Result<String, DomainError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = self.generator.partner_id();

            if self.repository.get_partner(&id).await?.is_none() {
                return Ok(id);
            }
        }

        Err(DomainError::internal("Unable to allocate a partner ID"))
    }

    /// Load a request and check it belongs to the partner
    async fn owned_request(
        &self,
        partner_id: &str,
        request_id: &str,
    ) -> Result<ApiKeyRequest, DomainError> {
        self.repository
            .get_api_key_request(request_id)
            .await?
            .filter(|r| r.partner_id() == partner_id)
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "API key request '{}' not found for partner '{}'",
                    request_id, partner_id
                ))
            })
    }

    async fn request_status(
        &self,
        request: &ApiKeyRequest,
    ) -> Result<ApiKeyRequestStatus, DomainError> {
        let issued = match request.api_key() {
            Some(key) => self.repository.get_api_key(key).await?,
            None => None,
        };

        Ok(ApiKeyRequestStatus::new(request, issued.as_ref()))
    }
}

#[async_trait::async_trait]
impl<R: PartnerRepository + 'static> PartnerService for DefaultPartnerService<R> {
    async fn save_partner(&self, request: PartnerRequest) -> Result<PartnerResponse, DomainError> {
        info!(organization = %request.organization_name, "Registering partner");

        if !self
            .repository
            .policy_group_exists(&request.policy_group)
            .await?
        {
            return Err(DomainError::not_found(format!(
                "Policy group '{}' not found",
                request.policy_group
            )));
        }

        let id = self.next_partner_id().await?;
        let partner = Partner::new(&id, request.organization_name, request.policy_group)
            .with_contact(request.address, request.contact_number, request.email_id);

        let created = self.repository.create_partner(partner).await?;

        info!(partner_id = %id, "Partner registered");

        Ok(PartnerResponse::from(&created))
    }

    async fn get_partner_details(
        &self,
        partner_id: &str,
    ) -> Result<RetrievePartnerDetailsResponse, DomainError> {
        let partner = require_partner(self.repository.as_ref(), partner_id).await?;
        Ok(RetrievePartnerDetailsResponse::from(&partner))
    }

    async fn get_all_partners(&self) -> Result<PartnersResponse, DomainError> {
        let partners = self.repository.list_partners().await?;

        Ok(PartnersResponse {
            partners: partners
                .iter()
                .map(RetrievePartnerDetailsResponse::from)
                .collect(),
        })
    }

    async fn get_partner_details_by_name(
        &self,
        organization_name: &str,
    ) -> Result<RetrievePartnerDetailsResponse, DomainError> {
        let partner = self
            .repository
            .find_partner_by_name(organization_name)
            .await?
            .ok_or_else(|| {
                DomainError::not_found(format!("Partner '{}' not found", organization_name))
            })?;

        Ok(RetrievePartnerDetailsResponse::from(&partner))
    }

    async fn get_policy_id(&self, policy_name: &str) -> Result<PolicyIdResponse, DomainError> {
        policy_id_by_name(self.repository.as_ref(), policy_name).await
    }

    async fn update_partner(
        &self,
        request: PartnerUpdateRequest,
        partner_id: &str,
    ) -> Result<PartnerResponse, DomainError> {
        info!(partner_id = %partner_id, "Updating partner details");

        let updated = self
            .repository
            .update_partner(
                partner_id,
                Box::new(move |partner| {
                    partner.set_contact(request.address, request.contact_number, request.email_id);
                    Ok(())
                }),
            )
            .await?;
        Ok(PartnerResponse::from(&updated))
    }

    async fn submit_api_key_request(
        &self,
        request: PartnerApiKeyRequest,
        partner_id: &str,
    ) -> Result<PartnerApiKeyResponse, DomainError> {
        info!(partner_id = %partner_id, policy = %request.policy_name, "Submitting API key request");

        let partner = require_partner(self.repository.as_ref(), partner_id).await?;

        if !partner.status().is_active() {
            return Err(DomainError::validation(format!(
                "Partner '{}' is not active",
                partner_id
            )));
        }

        let policy = require_policy_by_name(self.repository.as_ref(), &request.policy_name).await?;

        let api_key_request = ApiKeyRequest::new(
            self.generator.request_id(),
            partner_id,
            policy.id,
            request.use_case_description,
        );
        let created = self
            .repository
            .create_api_key_request(api_key_request)
            .await?;

        info!(request_id = %created.id(), "API key request submitted");

        Ok(PartnerApiKeyResponse {
            api_request_id: created.id().to_string(),
            message: "partnerAPIKeyRequest successfully submitted".to_string(),
        })
    }

    async fn download_api_key(
        &self,
        partner_id: &str,
        request_id: &str,
    ) -> Result<DownloadPartnerApiKeyResponse, DomainError> {
        let request = self.owned_request(partner_id, request_id).await?;

        match (request.state(), request.api_key()) {
            (ApiKeyRequestState::Approved, Some(key)) => Ok(DownloadPartnerApiKeyResponse {
                partner_api_key: key.to_string(),
            }),
            (state, _) => Err(DomainError::validation(format!(
                "API key request '{}' is not approved (status: {})",
                request_id, state
            ))),
        }
    }

    async fn list_api_key_requests(
        &self,
        partner_id: &str,
    ) -> Result<Vec<ApiKeyRequestStatus>, DomainError> {
        require_partner(self.repository.as_ref(), partner_id).await?;

        let requests = self
            .repository
            .list_api_key_requests(Some(partner_id))
            .await?;

        let mut statuses = Vec::with_capacity(requests.len());
        for request in &requests {
            statuses.push(self.request_status(request).await?);
        }

        debug!(partner_id = %partner_id, count = statuses.len(), "Listed API key requests");

        Ok(statuses)
    }

    async fn view_api_key_request(
        &self,
        partner_id: &str,
        request_id: &str,
    ) -> Result<ApiKeyRequestStatus, DomainError> {
        let request = self.owned_request(partner_id, request_id).await?;
        self.request_status(&request).await
    }

    async fn validate_digital_certificate(
        &self,
        request: DigitalCertificateRequest,
    ) -> Result<DigitalCertificateResponse, DomainError> {
        let partner = require_partner(self.repository.as_ref(), &request.partner_id).await?;

        let stored = partner.digital_certificate().ok_or_else(|| {
            DomainError::not_found(format!(
                "No digital certificate uploaded for partner '{}'",
                request.partner_id
            ))
        })?;

        let valid = stored == request.digital_certificate;
        let message = if valid {
            "Digital certificate matches the uploaded certificate"
        } else {
            "Digital certificate does not match the uploaded certificate"
        };

        Ok(DigitalCertificateResponse {
            partner_id: request.partner_id,
            valid,
            message: message.to_string(),
        })
    }

    async fn upload_digital_certificate(
        &self,
        request: DigitalCertificateRequest,
    ) -> Result<DigitalCertificateResponse, DomainError> {
        let DigitalCertificateRequest {
            partner_id,
            digital_certificate,
        } = request;
        info!(partner_id = %partner_id, "Uploading digital certificate");

        self.repository
            .update_partner(
                &partner_id,
                Box::new(move |partner| {
                    partner.set_digital_certificate(digital_certificate);
                    Ok(())
                }),
            )
            .await?;

        Ok(DigitalCertificateResponse {
            partner_id,
            valid: true,
            message: "Digital certificate uploaded".to_string(),
        })
    }
}
