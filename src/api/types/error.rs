//! Portal error responses
//!
//! Every failure is rendered as a `ResponseWrapper` with a null `response`
//! and a single error record.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::envelope::{EnvelopeError, ErrorRecord, ResponseWrapper, RESPONSE_VERSION};
use crate::domain::DomainError;

/// Error codes reported in `errors[].errorCode`
pub mod codes {
    pub const MALFORMED_ENVELOPE: &str = "PMS_COR_001";
    pub const INVALID_PAYLOAD: &str = "PMS_COR_002";
    pub const NOT_FOUND: &str = "PMS_PRT_404";
    pub const VALIDATION: &str = "PMS_PRT_400";
    pub const CONFLICT: &str = "PMS_PRT_409";
    pub const INTERNAL: &str = "PMS_COR_500";
    pub const UNKNOWN_ROUTE: &str = "PMS_COR_404";
    pub const METHOD_NOT_ALLOWED: &str = "PMS_COR_405";
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: ErrorRecord,
    id: Option<String>,
    version: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            error: ErrorRecord::new(code, message),
            id: None,
            version: None,
        }
    }

    /// Attach the `id`/`version` the error envelope should answer with
    pub fn with_envelope(mut self, id: impl Into<String>, version: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self.version = Some(version.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Body was not a usable request envelope
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::MALFORMED_ENVELOPE, message)
    }

    /// Payload failed its field constraints
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::INVALID_PAYLOAD, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::VALIDATION, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, codes::CONFLICT, message)
    }

    /// No route matches the request path
    pub fn unknown_route(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::UNKNOWN_ROUTE, message)
    }

    /// The path exists but not for this method
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            codes::METHOD_NOT_ALLOWED,
            message,
        )
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, codes::INTERNAL, message)
    }

    /// Whether the request never got past envelope decoding
    pub fn is_malformed_envelope(&self) -> bool {
        matches!(
            self.error.error_code.as_str(),
            codes::MALFORMED_ENVELOPE | codes::INVALID_PAYLOAD
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let wrapper = ResponseWrapper::<()>::failure(
            self.id.unwrap_or_default(),
            self.version
                .unwrap_or_else(|| RESPONSE_VERSION.to_string()),
            self.error,
            Vec::new(),
        );

        (self.status, Json(wrapper)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Conflict { message } => Self::conflict(message),
            DomainError::Storage { message } => Self::internal(message),
            DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl From<EnvelopeError> for ApiError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Malformed(message) => Self::malformed(message),
            EnvelopeError::Invalid(message) => Self::invalid_payload(message),
            EnvelopeError::Encode(e) => Self::internal(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error.error_code, self.error.message)
    }
}

impl std::error::Error for ApiError {}
