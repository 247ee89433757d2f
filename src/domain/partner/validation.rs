//! Partner validation errors

use thiserror::Error;

/// Errors raised while interpreting caller-supplied partner values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PartnerValidationError {
    #[error("Unknown activation status '{0}'. Expected 'Active' or 'De-Active'")]
    UnknownActivationStatus(String),

    #[error("Unknown API key request decision '{0}'. Expected 'Approved' or 'Rejected'")]
    UnknownDecision(String),
}
