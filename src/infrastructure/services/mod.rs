//! Reference implementations of the partner service traits
//!
//! Both services share one repository.

mod management_service;
mod partner_service;

pub use management_service::DefaultPartnerManagementService;
pub use partner_service::DefaultPartnerService;

use crate::domain::partner::dto::PolicyIdResponse;
use crate::domain::partner::{Partner, PartnerRepository, Policy};
use crate::domain::DomainError;

async fn require_partner<R>(repository: &R, partner_id: &str) -> Result<Partner, DomainError>
where
    R: PartnerRepository + ?Sized,
{
    repository
        .get_partner(partner_id)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Partner '{}' not found", partner_id)))
}

async fn require_policy_by_name<R>(repository: &R, policy_name: &str) -> Result<Policy, DomainError>
where
    R: PartnerRepository + ?Sized,
{
    repository
        .find_policy_by_name(policy_name)
        .await?
        .ok_or_else(|| DomainError::not_found(format!("Policy '{}' not found", policy_name)))
}

async fn policy_id_by_name<R>(
    repository: &R,
    policy_name: &str,
) -> Result<PolicyIdResponse, DomainError>
where
    R: PartnerRepository + ?Sized,
{
    let policy = require_policy_by_name(repository, policy_name).await?;

    Ok(PolicyIdResponse {
        policy_id: policy.id,
        policy_name: policy.name,
    })
}
