//! Domain layer - Partner entities, payloads and storage contracts

pub mod error;
pub mod partner;

pub use error::DomainError;
pub use partner::{
    ActivationStatus, ApiKeyRequest, ApiKeyRequestState, Partner, PartnerApiKey,
    PartnerRepository, PartnerValidationError, Policy,
};
