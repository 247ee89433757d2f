//! Partner manager endpoints under `/pmpartners`

use async_trait::async_trait;
use axum::{extract::Path, routing::get, Router};

use super::dispatch::{mount, Endpoint, ResponseId, Route, Verb};
use super::state::AppState;
use crate::domain::partner::dto::{
    ActivateDeactivatePartnerRequest, ApiKeyRequestDetails, PartnerApiKeyRequestsResponse,
    PartnerApiKeyToPolicyMappingsResponse, PartnersPolicyMappingRequest,
    PartnersPolicyMappingResponse, PartnersResponse, PolicyIdResponse,
    RetrievePartnerDetailsResponse,
};
use crate::domain::DomainError;

const PARTNER_RETRIEVE_ID: &str = "mosip.partnermanagement.partners.retrieve";

/// POST /pmpartners/{partnerID}/{partnerAPIKey}
pub struct MapApiKeyPolicy;

#[async_trait]
impl Endpoint for MapApiKeyPolicy {
    const NAME: &'static str = "map_api_key_policy";
    const VERB: Verb = Verb::Post;
    const PATH: &'static str = "/pmpartners/{partnerID}/{partnerAPIKey}";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;

    type Params = Path<(String, String)>;
    type Body = PartnersPolicyMappingRequest;
    type Output = PartnersPolicyMappingResponse;

    async fn invoke(
        state: &AppState,
        Path((partner_id, api_key)): Path<(String, String)>,
        body: PartnersPolicyMappingRequest,
    ) -> Result<PartnersPolicyMappingResponse, DomainError> {
        state
            .management_service
            .map_api_key_policy(body, &partner_id, &api_key)
            .await
    }
}

/// PUT /pmpartners/updateStatus/{partnerID}
pub struct UpdatePartnerStatus;

#[async_trait]
impl Endpoint for UpdatePartnerStatus {
    const NAME: &'static str = "update_partner_status";
    const VERB: Verb = Verb::Put;
    const PATH: &'static str = "/pmpartners/updateStatus/{partnerID}";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;

    type Params = Path<String>;
    type Body = ActivateDeactivatePartnerRequest;
    type Output = PartnersPolicyMappingResponse;

    async fn invoke(
        state: &AppState,
        Path(partner_id): Path<String>,
        body: ActivateDeactivatePartnerRequest,
    ) -> Result<PartnersPolicyMappingResponse, DomainError> {
        state
            .management_service
            .update_partner_status(&partner_id, body)
            .await
    }
}

/// PUT /pmpartners/{partnerID}/{partnerAPIKey}
pub struct UpdateApiKeyStatus;

#[async_trait]
impl Endpoint for UpdateApiKeyStatus {
    const NAME: &'static str = "update_api_key_status";
    const VERB: Verb = Verb::Put;
    const PATH: &'static str = "/pmpartners/{partnerID}/{partnerAPIKey}";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;

    type Params = Path<(String, String)>;
    type Body = ActivateDeactivatePartnerRequest;
    type Output = PartnersPolicyMappingResponse;

    async fn invoke(
        state: &AppState,
        Path((partner_id, api_key)): Path<(String, String)>,
        body: ActivateDeactivatePartnerRequest,
    ) -> Result<PartnersPolicyMappingResponse, DomainError> {
        state
            .management_service
            .update_api_key_status(&partner_id, body, &api_key)
            .await
    }
}

/// PUT /pmpartners/PartnerAPIKeyRequests/{APIKeyReqID}
pub struct DecideApiKeyRequest;

#[async_trait]
impl Endpoint for DecideApiKeyRequest {
    const NAME: &'static str = "decide_api_key_request";
    const VERB: Verb = Verb::Put;
    const PATH: &'static str = "/pmpartners/PartnerAPIKeyRequests/{APIKeyReqID}";
    const RESPONSE_ID: ResponseId = ResponseId::Echo;

    type Params = Path<String>;
    type Body = ActivateDeactivatePartnerRequest;
    type Output = PartnersPolicyMappingResponse;

    async fn invoke(
        state: &AppState,
        Path(request_id): Path<String>,
        body: ActivateDeactivatePartnerRequest,
    ) -> Result<PartnersPolicyMappingResponse, DomainError> {
        state
            .management_service
            .decide_api_key_request(body, &request_id)
            .await
    }
}

/// GET /pmpartners
pub struct ListPartners;

#[async_trait]
impl Endpoint for ListPartners {
    const NAME: &'static str = "list_partners";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/pmpartners";
    const RESPONSE_ID: ResponseId = ResponseId::Fixed(PARTNER_RETRIEVE_ID);

    type Params = ();
    type Body = ();
    type Output = PartnersResponse;

    async fn invoke(
        state: &AppState,
        _params: (),
        _body: (),
    ) -> Result<PartnersResponse, DomainError> {
        state.management_service.list_partners().await
    }
}

/// GET /pmpartners/{partnerID}
pub struct GetPartner;

#[async_trait]
impl Endpoint for GetPartner {
    const NAME: &'static str = "get_partner";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/pmpartners/{partnerID}";
    const RESPONSE_ID: ResponseId = ResponseId::Fixed(PARTNER_RETRIEVE_ID);

    type Params = Path<String>;
    type Body = ();
    type Output = RetrievePartnerDetailsResponse;

    async fn invoke(
        state: &AppState,
        Path(partner_id): Path<String>,
        _body: (),
    ) -> Result<RetrievePartnerDetailsResponse, DomainError> {
        state.management_service.get_partner(&partner_id).await
    }
}

/// GET /pmpartners/{partnerID}/{partnerAPIKey}
pub struct GetApiKeyPolicyMapping;

#[async_trait]
impl Endpoint for GetApiKeyPolicyMapping {
    const NAME: &'static str = "get_api_key_policy_mapping";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/pmpartners/{partnerID}/{partnerAPIKey}";
    const RESPONSE_ID: ResponseId =
        ResponseId::Fixed("mosip.partnermanagement.partners.retrieve.policy");

    type Params = Path<(String, String)>;
    type Body = ();
    type Output = PartnerApiKeyToPolicyMappingsResponse;

    async fn invoke(
        state: &AppState,
        Path((partner_id, api_key)): Path<(String, String)>,
        _body: (),
    ) -> Result<PartnerApiKeyToPolicyMappingsResponse, DomainError> {
        state
            .management_service
            .get_api_key_policy_mapping(&partner_id, &api_key)
            .await
    }
}

/// GET /pmpartners/PartnerAPIKeyRequests
pub struct ListApiKeyRequests;

#[async_trait]
impl Endpoint for ListApiKeyRequests {
    const NAME: &'static str = "list_api_key_requests";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/pmpartners/PartnerAPIKeyRequests";
    const RESPONSE_ID: ResponseId =
        ResponseId::Fixed("mosip.partnermanagement.partners.apikey.request.retrieve");

    type Params = ();
    type Body = ();
    type Output = PartnerApiKeyRequestsResponse;

    async fn invoke(
        state: &AppState,
        _params: (),
        _body: (),
    ) -> Result<PartnerApiKeyRequestsResponse, DomainError> {
        let apikey_requests = state.management_service.list_api_key_requests().await?;
        Ok(PartnerApiKeyRequestsResponse { apikey_requests })
    }
}

/// GET /pmpartners/PartnerAPIKeyRequests/{APIKeyReqID}
pub struct GetApiKeyRequest;

#[async_trait]
impl Endpoint for GetApiKeyRequest {
    const NAME: &'static str = "get_api_key_request";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/pmpartners/PartnerAPIKeyRequests/{APIKeyReqID}";
    const RESPONSE_ID: ResponseId =
        ResponseId::Fixed("mosip.partnermanagement.partners.apikey.requests.retrieve");

    type Params = Path<String>;
    type Body = ();
    type Output = ApiKeyRequestDetails;

    async fn invoke(
        state: &AppState,
        Path(request_id): Path<String>,
        _body: (),
    ) -> Result<ApiKeyRequestDetails, DomainError> {
        state.management_service.get_api_key_request(&request_id).await
    }
}

/// GET /pmpartners/policyname/{PolicyName}
pub struct GetPolicyId;

#[async_trait]
impl Endpoint for GetPolicyId {
    const NAME: &'static str = "get_policy_id";
    const VERB: Verb = Verb::Get;
    const PATH: &'static str = "/pmpartners/policyname/{PolicyName}";
    const RESPONSE_ID: ResponseId = ResponseId::Fixed("mosip.partnermanagement.partners");

    type Params = Path<String>;
    type Body = ();
    type Output = PolicyIdResponse;

    async fn invoke(
        state: &AppState,
        Path(policy_name): Path<String>,
        _body: (),
    ) -> Result<PolicyIdResponse, DomainError> {
        state.management_service.get_policy_id(&policy_name).await
    }
}

/// Route table of the partner manager controller
pub fn routes() -> Vec<Route> {
    vec![
        Route::submit::<MapApiKeyPolicy>(),
        Route::submit::<UpdatePartnerStatus>(),
        Route::submit::<UpdateApiKeyStatus>(),
        Route::submit::<DecideApiKeyRequest>(),
        Route::retrieve::<ListPartners>(),
        Route::retrieve::<GetPartner>(),
        Route::retrieve::<GetApiKeyPolicyMapping>(),
        Route::retrieve::<ListApiKeyRequests>(),
        Route::retrieve::<GetApiKeyRequest>(),
        Route::retrieve::<GetPolicyId>(),
    ]
}

/// GET /pmpartners/test
pub async fn liveness() -> &'static str {
    "pmpartners application is up and runing"
}

/// Create the `/pmpartners` router
pub fn create_pmpartners_router() -> Router<AppState> {
    mount(
        Router::new().route("/pmpartners/test", get(liveness)),
        routes(),
    )
}
