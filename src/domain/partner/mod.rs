//! Partner domain
//!
//! Partners self-register, request API keys under named policies and have
//! those requests approved or rejected by a partner manager. Approved keys
//! are mapped to exactly one policy and can be activated or deactivated.

pub mod dto;
mod entity;
mod repository;
mod validation;

pub use entity::{
    ActivationStatus, ApiKeyRequest, ApiKeyRequestState, Partner, PartnerApiKey, Policy,
};
pub use repository::{Edit, PartnerRepository};
pub use validation::PartnerValidationError;
