//! In-memory partner repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::partner::{
    ApiKeyRequest, Edit, Partner, PartnerApiKey, PartnerRepository, Policy,
};
use crate::domain::DomainError;

/// In-memory implementation of PartnerRepository
#[derive(Debug, Default)]
pub struct InMemoryPartnerStore {
    partners: Arc<RwLock<HashMap<String, Partner>>>,
    requests: Arc<RwLock<HashMap<String, ApiKeyRequest>>>,
    api_keys: Arc<RwLock<HashMap<String, PartnerApiKey>>>,
    policies: Arc<RwLock<HashMap<String, Policy>>>,
}

impl InMemoryPartnerStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with policies
    pub fn with_policies(policies: Vec<Policy>) -> Self {
        let policies = policies.into_iter().map(|p| (p.id.clone(), p)).collect();

        Self {
            policies: Arc::new(RwLock::new(policies)),
            ..Self::default()
        }
    }
}

/// Apply an edit to a copy and store it only if the edit succeeds
fn apply<T: Clone>(
    entry: Option<&mut T>,
    edit: Edit<T>,
    missing: impl FnOnce() -> DomainError,
) -> Result<T, DomainError> {
    let stored = entry.ok_or_else(missing)?;
    let mut updated = stored.clone();
    edit(&mut updated)?;
    *stored = updated.clone();
    Ok(updated)
}

#[async_trait]
impl PartnerRepository for InMemoryPartnerStore {
    async fn get_partner(&self, id: &str) -> Result<Option<Partner>, DomainError> {
        let partners = self.partners.read().await;
        Ok(partners.get(id).cloned())
    }

    async fn find_partner_by_name(&self, name: &str) -> Result<Option<Partner>, DomainError> {
        let partners = self.partners.read().await;
        Ok(partners
            .values()
            .find(|p| p.organization_name() == name)
            .cloned())
    }

    async fn list_partners(&self) -> Result<Vec<Partner>, DomainError> {
        let partners = self.partners.read().await;
        let mut result: Vec<Partner> = partners.values().cloned().collect();
        result.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(result)
    }

    async fn create_partner(&self, partner: Partner) -> Result<Partner, DomainError> {
        let mut partners = self.partners.write().await;
        let id = partner.id().to_string();

        if partners.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "Partner with ID '{}' already exists",
                id
            )));
        }

        if partners
            .values()
            .any(|p| p.organization_name() == partner.organization_name())
        {
            return Err(DomainError::conflict(format!(
                "Partner '{}' is already registered",
                partner.organization_name()
            )));
        }

        partners.insert(id, partner.clone());
        Ok(partner)
    }

    async fn update_partner(&self, id: &str, edit: Edit<Partner>) -> Result<Partner, DomainError> {
        let mut partners = self.partners.write().await;

        apply(partners.get_mut(id), edit, || {
            DomainError::not_found(format!("Partner '{}' not found", id))
        })
    }

    async fn get_api_key_request(&self, id: &str) -> Result<Option<ApiKeyRequest>, DomainError> {
        let requests = self.requests.read().await;
        Ok(requests.get(id).cloned())
    }

    async fn list_api_key_requests(
        &self,
        partner_id: Option<&str>,
    ) -> Result<Vec<ApiKeyRequest>, DomainError> {
        let requests = self.requests.read().await;

        let mut result: Vec<ApiKeyRequest> = requests
            .values()
            .filter(|r| partner_id.is_none_or(|id| r.partner_id() == id))
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });

        Ok(result)
    }

    async fn create_api_key_request(
        &self,
        request: ApiKeyRequest,
    ) -> Result<ApiKeyRequest, DomainError> {
        let mut requests = self.requests.write().await;
        let id = request.id().to_string();

        if requests.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "API key request '{}' already exists",
                id
            )));
        }

        requests.insert(id, request.clone());
        Ok(request)
    }

    async fn update_api_key_request(
        &self,
        id: &str,
        edit: Edit<ApiKeyRequest>,
    ) -> Result<ApiKeyRequest, DomainError> {
        let mut requests = self.requests.write().await;

        apply(requests.get_mut(id), edit, || {
            DomainError::not_found(format!("API key request '{}' not found", id))
        })
    }

    async fn issue_api_key(
        &self,
        request_id: &str,
        api_key: PartnerApiKey,
    ) -> Result<ApiKeyRequest, DomainError> {
        // requests before api_keys
        let mut requests = self.requests.write().await;
        let mut api_keys = self.api_keys.write().await;

        let request = requests.get_mut(request_id).ok_or_else(|| {
            DomainError::not_found(format!("API key request '{}' not found", request_id))
        })?;
        request.ensure_pending()?;

        if api_keys.contains_key(api_key.key()) {
            return Err(DomainError::conflict("Generated partner API key already exists"));
        }

        request.approve(api_key.key());
        api_keys.insert(api_key.key().to_string(), api_key);

        Ok(request.clone())
    }

    async fn get_api_key(&self, key: &str) -> Result<Option<PartnerApiKey>, DomainError> {
        let api_keys = self.api_keys.read().await;
        Ok(api_keys.get(key).cloned())
    }

    async fn update_api_key(
        &self,
        key: &str,
        edit: Edit<PartnerApiKey>,
    ) -> Result<PartnerApiKey, DomainError> {
        let mut api_keys = self.api_keys.write().await;

        apply(api_keys.get_mut(key), edit, || {
            DomainError::not_found("Partner API key not found")
        })
    }

    async fn get_policy(&self, id: &str) -> Result<Option<Policy>, DomainError> {
        let policies = self.policies.read().await;
        Ok(policies.get(id).cloned())
    }

    async fn find_policy_by_name(&self, name: &str) -> Result<Option<Policy>, DomainError> {
        let policies = self.policies.read().await;
        Ok(policies.values().find(|p| p.name == name).cloned())
    }

    async fn policy_group_exists(&self, group: &str) -> Result<bool, DomainError> {
        let policies = self.policies.read().await;
        Ok(policies.values().any(|p| p.policy_group == group))
    }
}
