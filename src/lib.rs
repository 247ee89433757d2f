//! PMP Partner API
//!
//! REST surface of the Partner Management Portal:
//! - `/partners`: partner self-registration, API key requests and
//!   digital certificates
//! - `/pmpartners`: partner manager approvals, activation and policy mapping
//!
//! Every endpoint speaks the same request/response envelope protocol and is
//! served by a declarative dispatch table.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::ensure;
use tracing::info;

use api::state::AppState;
use config::PartnersConfig;
use domain::partner::Policy;
use infrastructure::partner::{ApiKeyGenerator, InMemoryPartnerStore};
use infrastructure::services::{DefaultPartnerManagementService, DefaultPartnerService};

/// Create the application state backed by the in-memory partner store
pub fn create_app_state(config: &PartnersConfig) -> anyhow::Result<AppState> {
    ensure!(
        !config.api_key_prefix.is_empty(),
        "partners.api_key_prefix must not be empty"
    );
    ensure!(
        config.api_key_validity_days > 0,
        "partners.api_key_validity_days must be positive, got {}",
        config.api_key_validity_days
    );

    let policies: Vec<Policy> = config.policies.iter().map(Policy::from).collect();
    info!(policies = policies.len(), "Seeding partner policies");

    let store = Arc::new(InMemoryPartnerStore::with_policies(policies));
    let generator = ApiKeyGenerator::new(&config.api_key_prefix);

    let partner_service =
        DefaultPartnerService::new(store.clone()).with_generator(generator.clone());
    let management_service = DefaultPartnerManagementService::new(store)
        .with_generator(generator)
        .with_key_validity(chrono::Duration::days(config.api_key_validity_days));

    Ok(AppState::new(
        Arc::new(partner_service),
        Arc::new(management_service),
    ))
}
