//! Partner infrastructure implementations
//!
//! In-memory storage and key generation backing the reference services.

mod generator;
mod repository;

pub use generator::ApiKeyGenerator;
pub use repository::InMemoryPartnerStore;
