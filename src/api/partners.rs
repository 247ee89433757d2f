//! Partner self-service endpoints under `/partners`

use async_trait::async_trait;
use axum::{extract::Path, routing::get, Router};

use super::dispatch::{mount, Endpoint, ResponseId, Route, Verb};
use super::state::AppState;
use crate::domain::partner::dto::{
    ApiKeyRequestStatus, DigitalCertificateRequest, DigitalCertificateResponse,
    DownloadPartnerApiKeyResponse, PartnerApiKeyRequest, PartnerApiKeyResponse, PartnerRequest,
    PartnerResponse, PartnerUpdateRequest, PartnersResponse, PolicyIdResponse,
    RetrievePartnerDetailsResponse,
};
use crate::domain::DomainError;

const PARTNER_RETRIEVE_ID: &str = "mosip.partnermanagement.partners.retrieve";

/// POST /partners/partnerReg
pub struct RegisterPartner;

#[async_trait]
impl Endpoint for RegisterPartner {
    const NAME: &'static str = "register_partner";
    const VERB: Verb = Verb::Post;
    const PATH: &'static str = "/partners/partnerReg";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;

    type Params = ();
    type Body = PartnerRequest;
    type Output = PartnerResponse;

    async fn invoke(
        state: &AppState,
        _params: (),
        body: PartnerRequest,
    ) -> Result<PartnerResponse, DomainError> {
        state.partner_service.save_partner(body).await
    }
}

/// GET /partners/{partnerID}
pub struct GetPartnerDetails;

#[async_trait]
impl Endpoint for GetPartnerDetails {
    const NAME: &'static str = "get_partner_details";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/partners/{partnerID}";
    const RESPONSE_ID: ResponseId = ResponseId::Fixed(PARTNER_RETRIEVE_ID);

    type Params = Path<String>;
    type Body = ();
    type Output = RetrievePartnerDetailsResponse;

    async fn invoke(
        state: &AppState,
        Path(partner_id): Path<String>,
        _body: (),
    ) -> Result<RetrievePartnerDetailsResponse, DomainError> {
        state.partner_service.get_partner_details(&partner_id).await
    }
}

/// GET /partners/getpartners
pub struct GetAllPartners;

#[async_trait]
impl Endpoint for GetAllPartners {
    const NAME: &'static str = "get_all_partners";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/partners/getpartners";
    const RESPONSE_ID: ResponseId = ResponseId::Fixed("mosip.partnerservice.partners.get");

    type Params = ();
    type Body = ();
    type Output = PartnersResponse;

    async fn invoke(
        state: &AppState,
        _params: (),
        _body: (),
    ) -> Result<PartnersResponse, DomainError> {
        state.partner_service.get_all_partners().await
    }
}

/// GET /partners/findbyname/{partnerName}
pub struct FindPartnerByName;

#[async_trait]
impl Endpoint for FindPartnerByName {
    const NAME: &'static str = "find_partner_by_name";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/partners/findbyname/{partnerName}";
    const RESPONSE_ID: ResponseId = ResponseId::Fixed(PARTNER_RETRIEVE_ID);

    type Params = Path<String>;
    type Body = ();
    type Output = RetrievePartnerDetailsResponse;

    async fn invoke(
        state: &AppState,
        Path(partner_name): Path<String>,
        _body: (),
    ) -> Result<RetrievePartnerDetailsResponse, DomainError> {
        state
            .partner_service
            .get_partner_details_by_name(&partner_name)
            .await
    }
}

/// GET /partners/findbypolicyname/{policyName}
pub struct FindPolicyByName;

#[async_trait]
impl Endpoint for FindPolicyByName {
    const NAME: &'static str = "find_policy_by_name";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/partners/findbypolicyname/{policyName}";
    const RESPONSE_ID: ResponseId = ResponseId::Fixed("mosip.partnermanagement.partners.policy");

    type Params = Path<String>;
    type Body = ();
    type Output = PolicyIdResponse;

    async fn invoke(
        state: &AppState,
        Path(policy_name): Path<String>,
        _body: (),
    ) -> Result<PolicyIdResponse, DomainError> {
        state.partner_service.get_policy_id(&policy_name).await
    }
}

/// PUT /partners/{partnerID}
pub struct UpdatePartner;

#[async_trait]
impl Endpoint for UpdatePartner {
    const NAME: &'static str = "update_partner";
    const VERB: Verb = Verb::Put;
    const PATH: &'static str = "/partners/{partnerID}";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;

    type Params = Path<String>;
    type Body = PartnerUpdateRequest;
    type Output = PartnerResponse;

    async fn invoke(
        state: &AppState,
        Path(partner_id): Path<String>,
        body: PartnerUpdateRequest,
    ) -> Result<PartnerResponse, DomainError> {
        state.partner_service.update_partner(body, &partner_id).await
    }
}

/// POST /partners/submit/{partnerID}/partnerAPIKeyRequests
pub struct SubmitApiKeyRequest;

#[async_trait]
impl Endpoint for SubmitApiKeyRequest {
    const NAME: &'static str = "submit_api_key_request";
    const VERB: Verb = Verb::Post;
    const PATH: &'static str = "/partners/submit/{partnerID}/partnerAPIKeyRequests";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;

    type Params = Path<String>;
    type Body = PartnerApiKeyRequest;
    type Output = PartnerApiKeyResponse;

    async fn invoke(
        state: &AppState,
        Path(partner_id): Path<String>,
        body: PartnerApiKeyRequest,
    ) -> Result<PartnerApiKeyResponse, DomainError> {
        state
            .partner_service
            .submit_api_key_request(body, &partner_id)
            .await
    }
}

/// POST /partners/{partnerID}/partnerAPIKeyRequests/{APIKeyReqID}
///
/// Takes no body despite being a POST.
pub struct DownloadApiKey;

#[async_trait]
impl Endpoint for DownloadApiKey {
    const NAME: &'static str = "download_api_key";
    const VERB: Verb = Verb::Post;
    const PATH: &'static str = "/partners/{partnerID}/partnerAPIKeyRequests/{APIKeyReqID}";
    const RESPONSE_ID: ResponseId =
        ResponseId::Fixed("mosip.partnermanagement.partnerAPIKey.download");

    type Params = Path<(String, String)>;
    type Body = ();
    type Output = DownloadPartnerApiKeyResponse;

    async fn invoke(
        state: &AppState,
        Path((partner_id, request_id)): Path<(String, String)>,
        _body: (),
    ) -> Result<DownloadPartnerApiKeyResponse, DomainError> {
        state
            .partner_service
            .download_api_key(&partner_id, &request_id)
            .await
    }
}

/// GET /partners/{partnerID}/partnerAPIKeyRequests
pub struct ListApiKeyRequests;

#[async_trait]
impl Endpoint for ListApiKeyRequests {
    const NAME: &'static str = "list_partner_api_key_requests";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/partners/{partnerID}/partnerAPIKeyRequests";
    const RESPONSE_ID: ResponseId =
        ResponseId::Fixed("mosip.partnermanagement.partners.retrieve.apiKeyRequests");

    type Params = Path<String>;
    type Body = ();
    type Output = Vec<ApiKeyRequestStatus>;

    async fn invoke(
        state: &AppState,
        Path(partner_id): Path<String>,
        _body: (),
    ) -> Result<Vec<ApiKeyRequestStatus>, DomainError> {
        state.partner_service.list_api_key_requests(&partner_id).await
    }
}

/// GET /partners/{partnerID}/partnerAPIKeyRequests/{APIKeyReqID}
pub struct ViewApiKeyRequest;

#[async_trait]
impl Endpoint for ViewApiKeyRequest {
    const NAME: &'static str = "view_api_key_request";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/partners/{partnerID}/partnerAPIKeyRequests/{APIKeyReqID}";
    const RESPONSE_ID: ResponseId =
        ResponseId::Fixed("mosip.partnermanagement.partners.apikey.status");

    type Params = Path<(String, String)>;
    type Body = ();
    type Output = ApiKeyRequestStatus;

    async fn invoke(
        state: &AppState,
        Path((partner_id, request_id)): Path<(String, String)>,
        _body: (),
    ) -> Result<ApiKeyRequestStatus, DomainError> {
        state
            .partner_service
            .view_api_key_request(&partner_id, &request_id)
            .await
    }
}

/// PUT /partners/validatedigitalcertificate
pub struct ValidateDigitalCertificate;

#[async_trait]
impl Endpoint for ValidateDigitalCertificate {
    const NAME: &'static str = "validate_digital_certificate";
    const VERB: Verb = Verb::Put;
    const PATH: &'static str = "/partners/validatedigitalcertificate";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;

    type Params = ();
    type Body = DigitalCertificateRequest;
    type Output = DigitalCertificateResponse;

    async fn invoke(
        state: &AppState,
        _params: (),
        body: DigitalCertificateRequest,
    ) -> Result<DigitalCertificateResponse, DomainError> {
        state.partner_service.validate_digital_certificate(body).await
    }
}

/// POST /partners/uploaddigitalcertificate
pub struct UploadDigitalCertificate;

#[async_trait]
impl Endpoint for UploadDigitalCertificate {
    const NAME: &'static str = "upload_digital_certificate";
    const VERB: Verb = Verb::Post;
    const PATH: &'static str = "/partners/uploaddigitalcertificate";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;
    const CARRY_METADATA: bool = true;

    type Params = ();
    type Body = DigitalCertificateRequest;
    type Output = DigitalCertificateResponse;

    async fn invoke(
        state: &AppState,
        _params: (),
        body: DigitalCertificateRequest,
    ) -> Result<DigitalCertificateResponse, DomainError> {
        state.partner_service.upload_digital_certificate(body).await
    }
}

/// Route table of the partner controller
pub fn routes() -> Vec<Route> {
    vec![
        Route::submit::<RegisterPartner>(),
        Route::retrieve::<GetPartnerDetails>(),
        Route::retrieve::<GetAllPartners>(),
        Route::retrieve::<FindPartnerByName>(),
        Route::retrieve::<FindPolicyByName>(),
        Route::submit::<UpdatePartner>(),
        Route::submit::<SubmitApiKeyRequest>(),
        Route::retrieve::<DownloadApiKey>(),
        Route::retrieve::<ListApiKeyRequests>(),
        Route::retrieve::<ViewApiKeyRequest>(),
        Route::submit::<ValidateDigitalCertificate>(),
        Route::submit::<UploadDigitalCertificate>(),
    ]
}

/// GET /partners/test
pub async fn liveness() -> &'static str {
    "partners application is up and running"
}

/// Create the `/partners` router
pub fn create_partners_router() -> Router<AppState> {
    mount(Router::new().route("/partners/test", get(liveness)), routes())
}
