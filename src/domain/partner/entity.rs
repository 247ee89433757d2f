//! Partner entities and their lifecycle states

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::PartnerValidationError;
use crate::domain::DomainError;

/// Activation state of a partner or of an issued partner API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActivationStatus {
    #[default]
    #[serde(rename = "Active")]
    Active,
    #[serde(rename = "De-Active")]
    DeActive,
}

impl ActivationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::str::FromStr for ActivationStatus {
    type Err = PartnerValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "De-Active" => Ok(Self::DeActive),
            other => Err(PartnerValidationError::UnknownActivationStatus(
                other.to_string(),
            )),
        }
    }
}

impl std::fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::DeActive => write!(f, "De-Active"),
        }
    }
}

/// State of a partner's API key request as seen by the partner manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ApiKeyRequestState {
    #[default]
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Rejected")]
    Rejected,
}

impl ApiKeyRequestState {
    /// Parse a manager decision. Only terminal states are accepted.
    pub fn parse_decision(s: &str) -> Result<Self, PartnerValidationError> {
        match s {
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            other => Err(PartnerValidationError::UnknownDecision(other.to_string())),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for ApiKeyRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "in-progress"),
            Self::Approved => write!(f, "Approved"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// A registered partner organization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    id: String,
    organization_name: String,
    policy_group: String,
    address: String,
    contact_number: String,
    email_id: String,
    status: ActivationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    digital_certificate: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Partner {
    pub fn new(
        id: impl Into<String>,
        organization_name: impl Into<String>,
        policy_group: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: id.into(),
            organization_name: organization_name.into(),
            policy_group: policy_group.into(),
            address: String::new(),
            contact_number: String::new(),
            email_id: String::new(),
            status: ActivationStatus::Active,
            digital_certificate: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set contact details (builder pattern)
    pub fn with_contact(
        mut self,
        address: impl Into<String>,
        contact_number: impl Into<String>,
        email_id: impl Into<String>,
    ) -> Self {
        self.address = address.into();
        self.contact_number = contact_number.into();
        self.email_id = email_id.into();
        self
    }

    // Getters

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn organization_name(&self) -> &str {
        &self.organization_name
    }

    pub fn policy_group(&self) -> &str {
        &self.policy_group
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn contact_number(&self) -> &str {
        &self.contact_number
    }

    pub fn email_id(&self) -> &str {
        &self.email_id
    }

    pub fn status(&self) -> ActivationStatus {
        self.status
    }

    pub fn digital_certificate(&self) -> Option<&str> {
        self.digital_certificate.as_deref()
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_contact(
        &mut self,
        address: impl Into<String>,
        contact_number: impl Into<String>,
        email_id: impl Into<String>,
    ) {
        self.address = address.into();
        self.contact_number = contact_number.into();
        self.email_id = email_id.into();
        self.touch();
    }

    pub fn set_status(&mut self, status: ActivationStatus) {
        self.status = status;
        self.touch();
    }

    pub fn set_digital_certificate(&mut self, certificate: impl Into<String>) {
        self.digital_certificate = Some(certificate.into());
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A partner's request for an API key bound to one policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyRequest {
    id: String,
    partner_id: String,
    policy_id: String,
    use_case_description: String,
    state: ApiKeyRequestState,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ApiKeyRequest {
    pub fn new(
        id: impl Into<String>,
        partner_id: impl Into<String>,
        policy_id: impl Into<String>,
        use_case_description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: id.into(),
            partner_id: partner_id.into(),
            policy_id: policy_id.into(),
            use_case_description: use_case_description.into(),
            state: ApiKeyRequestState::InProgress,
            api_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }

    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    pub fn use_case_description(&self) -> &str {
        &self.use_case_description
    }

    pub fn state(&self) -> ApiKeyRequestState {
        self.state
    }

    /// The key issued on approval
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Fail with a conflict once the request has been decided
    pub fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.state.is_pending() {
            return Ok(());
        }

        Err(DomainError::conflict(format!(
            "API key request '{}' is already {}",
            self.id, self.state
        )))
    }

    /// Record the manager's approval along with the issued key
    pub fn approve(&mut self, api_key: impl Into<String>) {
        self.state = ApiKeyRequestState::Approved;
        self.api_key = Some(api_key.into());
        self.updated_at = Utc::now();
    }

    pub fn reject(&mut self) {
        self.state = ApiKeyRequestState::Rejected;
        self.updated_at = Utc::now();
    }
}

/// An issued partner API key and the policy it is mapped to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerApiKey {
    key: String,
    partner_id: String,
    policy_id: String,
    status: ActivationStatus,
    valid_till: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl PartnerApiKey {
    pub fn new(
        key: impl Into<String>,
        partner_id: impl Into<String>,
        policy_id: impl Into<String>,
        valid_till: DateTime<Utc>,
    ) -> Self {
        Self {
            key: key.into(),
            partner_id: partner_id.into(),
            policy_id: policy_id.into(),
            status: ActivationStatus::Active,
            valid_till,
            created_at: Utc::now(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn partner_id(&self) -> &str {
        &self.partner_id
    }

    pub fn policy_id(&self) -> &str {
        &self.policy_id
    }

    pub fn status(&self) -> ActivationStatus {
        self.status
    }

    pub fn valid_till(&self) -> DateTime<Utc> {
        self.valid_till
    }

    pub fn belongs_to(&self, partner_id: &str) -> bool {
        self.partner_id == partner_id
    }

    pub fn set_status(&mut self, status: ActivationStatus) {
        self.status = status;
    }

    pub fn remap(&mut self, policy_id: impl Into<String>) {
        self.policy_id = policy_id.into();
    }
}

/// A named policy a partner API key can be mapped to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub policy_group: String,
}

impl Policy {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        policy_group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            policy_group: policy_group.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_status_parse() {
        assert_eq!("Active".parse::<ActivationStatus>(), Ok(ActivationStatus::Active));
        assert_eq!(
            "De-Active".parse::<ActivationStatus>(),
            Ok(ActivationStatus::DeActive)
        );
        assert_eq!(
            "active".parse::<ActivationStatus>(),
            Err(PartnerValidationError::UnknownActivationStatus(
                "active".to_string()
            ))
        );
    }

    #[test]
    fn test_activation_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ActivationStatus::DeActive).unwrap(),
            "\"De-Active\""
        );
    }

    #[test]
    fn test_decision_rejects_in_progress() {
        assert_eq!(
            ApiKeyRequestState::parse_decision("Approved"),
            Ok(ApiKeyRequestState::Approved)
        );
        assert!(ApiKeyRequestState::parse_decision("in-progress").is_err());
    }

    #[test]
    fn test_api_key_request_approval() {
        let mut request = ApiKeyRequest::new("req-1", "1001", "policy-1", "auth");
        assert!(request.state().is_pending());
        assert!(request.api_key().is_none());

        request.approve("pk_live_abc");
        assert_eq!(request.state(), ApiKeyRequestState::Approved);
        assert_eq!(request.api_key(), Some("pk_live_abc"));
    }

    #[test]
    fn test_decided_request_is_not_pending() {
        let mut request = ApiKeyRequest::new("req-1", "1001", "policy-1", "auth");
        assert!(request.ensure_pending().is_ok());

        request.reject();
        assert!(matches!(
            request.ensure_pending(),
            Err(DomainError::Conflict { .. })
        ));
    }

    #[test]
    fn test_partner_set_status() {
        let mut partner = Partner::new("1001", "Acme", "default")
            .with_contact("Street 1", "+100", "ops@acme.test");
        assert!(partner.status().is_active());

        partner.set_status(ActivationStatus::DeActive);
        assert_eq!(partner.status(), ActivationStatus::DeActive);
        assert_eq!(partner.email_id(), "ops@acme.test");
    }
}
