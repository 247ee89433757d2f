//! Partner repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{ApiKeyRequest, Partner, PartnerApiKey, Policy};
use crate::domain::DomainError;

/// In-place change applied to a stored entity while it is locked
///
/// An `Err` leaves the stored entity untouched and is returned to the caller.
pub type Edit<T> = Box<dyn FnOnce(&mut T) -> Result<(), DomainError> + Send>;

/// Storage for partners, their API key requests, issued keys and policies
#[async_trait]
pub trait PartnerRepository: Send + Sync + Debug {
    /// Get a partner by ID
    async fn get_partner(&self, id: &str) -> Result<Option<Partner>, DomainError>;

    /// Find a partner by organization name
    async fn find_partner_by_name(&self, name: &str) -> Result<Option<Partner>, DomainError>;

    /// List all partners ordered by ID
    async fn list_partners(&self) -> Result<Vec<Partner>, DomainError>;

    /// Create a new partner; fails on a duplicate ID or organization name
    async fn create_partner(&self, partner: Partner) -> Result<Partner, DomainError>;

    /// Apply an edit to an existing partner
    async fn update_partner(&self, id: &str, edit: Edit<Partner>) -> Result<Partner, DomainError>;

    async fn get_api_key_request(&self, id: &str) -> Result<Option<ApiKeyRequest>, DomainError>;

    /// List API key requests, optionally restricted to one partner
    async fn list_api_key_requests(
        &self,
        partner_id: Option<&str>,
    ) -> Result<Vec<ApiKeyRequest>, DomainError>;

    async fn create_api_key_request(
        &self,
        request: ApiKeyRequest,
    ) -> Result<ApiKeyRequest, DomainError>;

    async fn update_api_key_request(
        &self,
        id: &str,
        edit: Edit<ApiKeyRequest>,
    ) -> Result<ApiKeyRequest, DomainError>;

    /// Approve a pending request and store the key issued for it as one step
    async fn issue_api_key(
        &self,
        request_id: &str,
        api_key: PartnerApiKey,
    ) -> Result<ApiKeyRequest, DomainError>;

    async fn get_api_key(&self, key: &str) -> Result<Option<PartnerApiKey>, DomainError>;

    async fn update_api_key(
        &self,
        key: &str,
        edit: Edit<PartnerApiKey>,
    ) -> Result<PartnerApiKey, DomainError>;

    async fn get_policy(&self, id: &str) -> Result<Option<Policy>, DomainError>;

    async fn find_policy_by_name(&self, name: &str) -> Result<Option<Policy>, DomainError>;

    /// Check whether any policy belongs to the given group
    async fn policy_group_exists(&self, group: &str) -> Result<bool, DomainError>;
}
