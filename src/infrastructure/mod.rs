//! Infrastructure layer - storage, services and observability

pub mod logging;
pub mod observability;
pub mod partner;
pub mod services;
