//! Request envelope extractor that returns errors as response envelopes

use axum::extract::{FromRequest, Request};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use validator::Validate;

use super::envelope::{decode_request, EnvelopeHeader, RequestWrapper, RESPONSE_VERSION};
use super::error::ApiError;

/// Extractor for a `RequestWrapper<T>` body
///
/// Decode and constraint failures are rejected with an [`ApiError`] that
/// echoes whatever `id`/`version` could still be read from the body.
#[derive(Debug, Clone)]
pub struct Envelope<T>(pub RequestWrapper<T>);

impl<T> Envelope<T> {
    /// Consume the extractor and return the inner envelope
    pub fn into_inner(self) -> RequestWrapper<T> {
        self.0
    }
}

impl<T> std::ops::Deref for Envelope<T> {
    type Target = RequestWrapper<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S, T> FromRequest<S> for Envelope<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            ApiError::malformed(format!(
                "Failed to read request body: {}",
                rejection.body_text()
            ))
        })?;

        decode_request::<T>(&bytes).map(Envelope).map_err(|err| {
            let header = EnvelopeHeader::peek(&bytes);
            ApiError::from(err).with_envelope(
                header.id.unwrap_or_default(),
                header
                    .version
                    .unwrap_or_else(|| RESPONSE_VERSION.to_string()),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::error::codes;
    use crate::domain::partner::dto::ActivateDeactivatePartnerRequest;
    use axum::body::Body;

    fn request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("PUT")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_extracts_envelope() {
        let req = request(r#"{"id":"abc","version":"1.0","request":{"status":"Active"}}"#);

        let envelope = Envelope::<ActivateDeactivatePartnerRequest>::from_request(req, &())
            .await
            .unwrap();
        assert_eq!(envelope.id(), "abc");
        assert_eq!(envelope.into_inner().into_request().status, "Active");
    }

    #[tokio::test]
    async fn test_rejection_echoes_header() {
        let req = request(r#"{"id":"abc","version":"2.0"}"#);

        let err = Envelope::<ActivateDeactivatePartnerRequest>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.error.error_code, codes::MALFORMED_ENVELOPE);
        assert_eq!(err.id(), Some("abc"));
        assert_eq!(err.version(), Some("2.0"));
    }

    #[tokio::test]
    async fn test_rejection_on_constraint_failure() {
        let req = request(r#"{"id":"abc","version":"1.0","request":{"status":""}}"#);

        let err = Envelope::<ActivateDeactivatePartnerRequest>::from_request(req, &())
            .await
            .unwrap_err();
        assert_eq!(err.error.error_code, codes::INVALID_PAYLOAD);
    }
}
