//! Request and response payloads carried inside the envelopes
//!
//! Field names follow the portal's JSON contract (camelCase, with the
//! historical `ID`/`API` capitalisation where clients depend on it).
//! Request payloads carry declarative constraints checked at decode time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::entity::{ApiKeyRequest, Partner, PartnerApiKey};

// ---------------------------------------------------------------------------
// Partner self-service
// ---------------------------------------------------------------------------

/// Self-registration of a new partner organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartnerRequest {
    #[validate(length(min = 1, message = "organizationName must not be empty"))]
    pub organization_name: String,
    #[validate(length(min = 1, message = "policyGroup must not be empty"))]
    pub policy_group: String,
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "contactNumber must not be empty"))]
    pub contact_number: String,
    #[validate(email(message = "emailId must be a valid e-mail address"))]
    pub email_id: String,
}

/// Replacement contact details for an existing partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartnerUpdateRequest {
    #[validate(length(min = 1, message = "address must not be empty"))]
    pub address: String,
    #[validate(length(min = 1, message = "contactNumber must not be empty"))]
    pub contact_number: String,
    #[validate(email(message = "emailId must be a valid e-mail address"))]
    pub email_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerResponse {
    pub partner_id: String,
    pub status: String,
}

/// Full details of one partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievePartnerDetailsResponse {
    #[serde(rename = "partnerID")]
    pub partner_id: String,
    pub organization_name: String,
    pub policy_group: String,
    pub address: String,
    pub contact_number: String,
    pub email_id: String,
    pub status: String,
}

/// Listing of partners
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnersResponse {
    pub partners: Vec<RetrievePartnerDetailsResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyIdResponse {
    #[serde(rename = "policyID")]
    pub policy_id: String,
    pub policy_name: String,
}

/// A partner's request for an API key under a named policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartnerApiKeyRequest {
    #[validate(length(min = 1, message = "policyName must not be empty"))]
    pub policy_name: String,
    #[validate(length(min = 1, message = "useCaseDescription must not be empty"))]
    pub use_case_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerApiKeyResponse {
    pub api_request_id: String,
    pub message: String,
}

/// Status of an API key request from the partner's point of view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequestStatus {
    #[serde(rename = "apiKeyReqID")]
    pub api_key_req_id: String,
    pub api_key_request_status: String,
    #[serde(rename = "partnerAPIKey", skip_serializing_if = "Option::is_none", default)]
    pub partner_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub validity_till: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadPartnerApiKeyResponse {
    #[serde(rename = "partnerAPIKey")]
    pub partner_api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DigitalCertificateRequest {
    #[serde(rename = "partnerID")]
    #[validate(length(min = 1, message = "partnerID must not be empty"))]
    pub partner_id: String,
    #[validate(length(min = 1, message = "digitalCertificate must not be empty"))]
    pub digital_certificate: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigitalCertificateResponse {
    #[serde(rename = "partnerID")]
    pub partner_id: String,
    pub valid: bool,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Partner manager
// ---------------------------------------------------------------------------

/// Move a partner API key from one policy to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PartnersPolicyMappingRequest {
    #[serde(rename = "oldPolicyID")]
    #[validate(length(min = 1, message = "oldPolicyID must not be empty"))]
    pub old_policy_id: String,
    #[serde(rename = "newPolicyID")]
    #[validate(length(min = 1, message = "newPolicyID must not be empty"))]
    pub new_policy_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartnersPolicyMappingResponse {
    pub message: String,
}

/// Status change requested by a partner manager.
///
/// Used for partner activation (`Active`/`De-Active`), API key activation
/// (`Active`/`De-Active`) and API key request decisions
/// (`Approved`/`Rejected`); the service interprets the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ActivateDeactivatePartnerRequest {
    #[validate(length(min = 1, message = "status must not be empty"))]
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerApiKeyToPolicyMappingsResponse {
    #[serde(rename = "partnerID")]
    pub partner_id: String,
    #[serde(rename = "partnerAPIKey")]
    pub partner_api_key: String,
    #[serde(rename = "policyID")]
    pub policy_id: String,
    pub status: String,
    pub valid_till: DateTime<Utc>,
}

/// An API key request as received by the partner manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequestDetails {
    #[serde(rename = "apiKeyReqID")]
    pub api_key_req_id: String,
    #[serde(rename = "partnerID")]
    pub partner_id: String,
    pub organization_name: String,
    pub policy_name: String,
    #[serde(rename = "policyID")]
    pub policy_id: String,
    pub use_case_description: String,
    pub status: String,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerApiKeyRequestsResponse {
    pub apikey_requests: Vec<ApiKeyRequestDetails>,
}

impl From<&Partner> for RetrievePartnerDetailsResponse {
    fn from(partner: &Partner) -> Self {
        Self {
            partner_id: partner.id().to_string(),
            organization_name: partner.organization_name().to_string(),
            policy_group: partner.policy_group().to_string(),
            address: partner.address().to_string(),
            contact_number: partner.contact_number().to_string(),
            email_id: partner.email_id().to_string(),
            status: partner.status().to_string(),
        }
    }
}

impl From<&Partner> for PartnerResponse {
    fn from(partner: &Partner) -> Self {
        Self {
            partner_id: partner.id().to_string(),
            status: partner.status().to_string(),
        }
    }
}

impl ApiKeyRequestStatus {
    /// Build the partner-facing view; the issued key's expiry is attached when known
    pub fn new(request: &ApiKeyRequest, issued: Option<&PartnerApiKey>) -> Self {
        Self {
            api_key_req_id: request.id().to_string(),
            api_key_request_status: request.state().to_string(),
            partner_api_key: request.api_key().map(String::from),
            validity_till: issued.map(|k| k.valid_till()),
        }
    }
}

impl From<&PartnerApiKey> for PartnerApiKeyToPolicyMappingsResponse {
    fn from(key: &PartnerApiKey) -> Self {
        Self {
            partner_id: key.partner_id().to_string(),
            partner_api_key: key.key().to_string(),
            policy_id: key.policy_id().to_string(),
            status: key.status().to_string(),
            valid_till: key.valid_till(),
        }
    }
}
