//! Request and response envelopes shared by every portal endpoint
//!
//! Clients send a `RequestWrapper` around the operation payload and always
//! receive a `ResponseWrapper`. A response carries either a payload or a
//! non-empty list of errors, never both.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Version stamped on responses that do not echo the request
pub const RESPONSE_VERSION: &str = "1.0";

/// Envelope decode and encode failures
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// Body is not JSON, is not an envelope, or misses `id`/`version`/`request`
    #[error("Malformed request envelope: {0}")]
    Malformed(String),

    /// Envelope is well formed but the payload breaks its field constraints
    #[error("Invalid request payload: {0}")]
    Invalid(String),

    #[error("Failed to encode envelope: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Inbound envelope around an operation payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestWrapper<T> {
    id: String,
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    requesttime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
    request: T,
}

impl<T> RequestWrapper<T> {
    pub fn new(id: impl Into<String>, version: impl Into<String>, request: T) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            requesttime: None,
            metadata: None,
            request,
        }
    }

    pub fn with_request_time(mut self, requesttime: DateTime<Utc>) -> Self {
        self.requesttime = Some(requesttime);
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn requesttime(&self) -> Option<DateTime<Utc>> {
        self.requesttime
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn request(&self) -> &T {
        &self.request
    }

    /// Consume the envelope and return the payload
    pub fn into_request(self) -> T {
        self.request
    }
}

/// One failure reported in a response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    #[serde(rename = "errorCode")]
    pub error_code: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// Outbound envelope
///
/// Built only through [`ResponseWrapper::success`] and
/// [`ResponseWrapper::failure`], so exactly one of `response` and `errors`
/// is populated. Deserialization enforces the same rule.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseWrapper<R> {
    id: String,
    version: String,
    #[serde(with = "responsetime_format")]
    responsetime: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<Value>,
    response: Option<R>,
    errors: Vec<ErrorRecord>,
}

#[derive(Deserialize)]
struct ResponseWire<R> {
    id: String,
    version: String,
    #[serde(with = "responsetime_format")]
    responsetime: DateTime<Utc>,
    #[serde(default)]
    metadata: Option<Value>,
    response: Option<R>,
    #[serde(default)]
    errors: Vec<ErrorRecord>,
}

impl<R> TryFrom<ResponseWire<R>> for ResponseWrapper<R> {
    type Error = &'static str;

    fn try_from(wire: ResponseWire<R>) -> Result<Self, Self::Error> {
        match (wire.response.is_some(), wire.errors.is_empty()) {
            (true, false) => Err("response envelope carries both a response and errors"),
            (false, true) => Err("response envelope carries neither a response nor errors"),
            _ => Ok(Self {
                id: wire.id,
                version: wire.version,
                responsetime: wire.responsetime,
                metadata: wire.metadata,
                response: wire.response,
                errors: wire.errors,
            }),
        }
    }
}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for ResponseWrapper<R> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ResponseWire::<R>::deserialize(deserializer)?;
        Self::try_from(wire).map_err(serde::de::Error::custom)
    }
}

impl<R> ResponseWrapper<R> {
    pub fn success(id: impl Into<String>, version: impl Into<String>, response: R) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            responsetime: Utc::now(),
            metadata: None,
            response: Some(response),
            errors: Vec::new(),
        }
    }

    /// Error envelope; at least one error is always present
    pub fn failure(
        id: impl Into<String>,
        version: impl Into<String>,
        first: ErrorRecord,
        rest: Vec<ErrorRecord>,
    ) -> Self {
        let mut errors = Vec::with_capacity(rest.len() + 1);
        errors.push(first);
        errors.extend(rest);

        Self {
            id: id.into(),
            version: version.into(),
            responsetime: Utc::now(),
            metadata: None,
            response: None,
            errors,
        }
    }

    pub fn with_metadata(mut self, metadata: Option<Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn responsetime(&self) -> DateTime<Utc> {
        self.responsetime
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    pub fn response(&self) -> Option<&R> {
        self.response.as_ref()
    }

    pub fn errors(&self) -> &[ErrorRecord] {
        &self.errors
    }

    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a request envelope and check the payload's declared constraints
pub fn decode_request<T>(raw: &[u8]) -> Result<RequestWrapper<T>, EnvelopeError>
where
    T: DeserializeOwned + Validate,
{
    let wrapper: RequestWrapper<T> =
        serde_json::from_slice(raw).map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

    if wrapper.id.trim().is_empty() {
        return Err(EnvelopeError::Malformed("id must not be empty".to_string()));
    }
    if wrapper.version.trim().is_empty() {
        return Err(EnvelopeError::Malformed(
            "version must not be empty".to_string(),
        ));
    }

    wrapper
        .request
        .validate()
        .map_err(|e| EnvelopeError::Invalid(constraint_messages(&e)))?;

    Ok(wrapper)
}

/// Join the declared constraint messages, which name fields by their wire names
fn constraint_messages(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_values()
        .flat_map(|field| field.iter())
        .map(|error| match &error.message {
            Some(message) => message.to_string(),
            None => format!("constraint '{}' violated", error.code),
        })
        .collect();
    messages.sort();
    messages.join("; ")
}

/// Serialize a request envelope
pub fn encode_request<T: Serialize>(wrapper: &RequestWrapper<T>) -> Result<Vec<u8>, EnvelopeError> {
    Ok(serde_json::to_vec(wrapper)?)
}

/// Serialize a response envelope; the payload is dropped when errors are present
pub fn encode_response<R: Serialize>(
    id: &str,
    version: &str,
    payload: R,
    errors: Vec<ErrorRecord>,
) -> Result<Vec<u8>, EnvelopeError> {
    let mut errors = errors.into_iter();
    let wrapper = match errors.next() {
        None => ResponseWrapper::success(id, version, payload),
        Some(first) => ResponseWrapper::failure(id, version, first, errors.collect()),
    };

    Ok(serde_json::to_vec(&wrapper)?)
}

/// `id` and `version` of a body that failed to decode, when they can be read
#[derive(Debug, Default, Deserialize)]
pub(crate) struct EnvelopeHeader {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl EnvelopeHeader {
    pub(crate) fn peek(raw: &[u8]) -> Self {
        serde_json::from_slice(raw).unwrap_or_default()
    }
}

/// Millisecond precision UTC timestamps, e.g. `2026-01-31T09:15:00.123Z`
mod responsetime_format {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::partner::dto::{PartnerApiKeyRequest, PartnerResponse};
    use serde_json::json;

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn test_decode_request() {
        let raw = body(json!({
            "id": "mosip.partnermanagement.partnerAPIKeyRequest.create",
            "version": "1.0",
            "requesttime": "2026-03-01T10:00:00.000Z",
            "request": { "policyName": "Auth Policy", "useCaseDescription": "auth" }
        }));

        let wrapper = decode_request::<PartnerApiKeyRequest>(&raw).unwrap();
        assert_eq!(wrapper.id(), "mosip.partnermanagement.partnerAPIKeyRequest.create");
        assert_eq!(wrapper.version(), "1.0");
        assert!(wrapper.requesttime().is_some());
        assert!(wrapper.metadata().is_none());
        assert_eq!(wrapper.request().policy_name, "Auth Policy");
    }

    #[test]
    fn test_decode_without_request_is_malformed() {
        let raw = body(json!({ "id": "x", "version": "1.0" }));

        let result = decode_request::<PartnerApiKeyRequest>(&raw);
        assert!(matches!(result, Err(EnvelopeError::Malformed(msg)) if msg.contains("request")));
    }

    #[test]
    fn test_decode_rejects_non_json_and_blank_id() {
        assert!(matches!(
            decode_request::<PartnerApiKeyRequest>(b"not json"),
            Err(EnvelopeError::Malformed(_))
        ));

        let raw = body(json!({
            "id": " ",
            "version": "1.0",
            "request": { "policyName": "p", "useCaseDescription": "u" }
        }));
        assert!(matches!(
            decode_request::<PartnerApiKeyRequest>(&raw),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_checks_payload_constraints() {
        let raw = body(json!({
            "id": "x",
            "version": "1.0",
            "request": { "policyName": "", "useCaseDescription": "auth" }
        }));

        let result = decode_request::<PartnerApiKeyRequest>(&raw);
        assert!(matches!(result, Err(EnvelopeError::Invalid(msg)) if msg.contains("policyName")));
    }

    #[test]
    fn test_constraint_messages_use_wire_names() {
        let raw = body(json!({
            "id": "x",
            "version": "1.0",
            "request": { "policyName": "", "useCaseDescription": "" }
        }));

        let Err(EnvelopeError::Invalid(msg)) = decode_request::<PartnerApiKeyRequest>(&raw) else {
            panic!("expected an invalid payload");
        };
        assert_eq!(
            msg,
            "policyName must not be empty; useCaseDescription must not be empty"
        );
        assert!(!msg.contains("policy_name"));
    }

    #[test]
    fn test_request_round_trip() {
        let wrapper = RequestWrapper::new(
            "mosip.partnermanagement.partnerAPIKeyRequest.create",
            "1.0",
            PartnerApiKeyRequest {
                policy_name: "Auth Policy".to_string(),
                use_case_description: "auth".to_string(),
            },
        )
        .with_request_time(Utc::now())
        .with_metadata(json!({ "source": "portal" }));

        let raw = encode_request(&wrapper).unwrap();
        assert_eq!(decode_request::<PartnerApiKeyRequest>(&raw).unwrap(), wrapper);
    }

    #[test]
    fn test_encode_response_success() {
        let payload = PartnerResponse {
            partner_id: "1001".to_string(),
            status: "Active".to_string(),
        };

        let raw = encode_response("id", "1.0", payload, Vec::new()).unwrap();
        let json: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(json["response"]["partnerId"], "1001");
        assert_eq!(json["errors"], json!([]));
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_encode_response_drops_payload_on_errors() {
        let payload = PartnerResponse {
            partner_id: "1001".to_string(),
            status: "Active".to_string(),
        };
        let errors = vec![ErrorRecord::new("PMS_PRT_404", "Partner '1001' not found")];

        let raw = encode_response("id", "1.0", payload, errors).unwrap();
        let json: Value = serde_json::from_slice(&raw).unwrap();
        assert!(json["response"].is_null());
        assert_eq!(json["errors"][0]["errorCode"], "PMS_PRT_404");
        assert_eq!(json["errors"][0]["message"], "Partner '1001' not found");
    }

    #[test]
    fn test_responsetime_has_millisecond_precision() {
        let wrapper = ResponseWrapper::success("id", RESPONSE_VERSION, 1);
        let json = serde_json::to_value(&wrapper).unwrap();

        let responsetime = json["responsetime"].as_str().unwrap();
        assert_eq!(responsetime.len(), "2026-01-31T09:15:00.123Z".len());
        assert!(responsetime.ends_with('Z'));

        let parsed: ResponseWrapper<i32> = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.response(), Some(&1));
        assert!(parsed.is_success());
    }

    #[test]
    fn test_failure_keeps_every_error() {
        let wrapper = ResponseWrapper::<()>::failure(
            "id",
            RESPONSE_VERSION,
            ErrorRecord::new("PMS_PRT_400", "first"),
            vec![ErrorRecord::new("PMS_PRT_400", "second")],
        );

        assert!(!wrapper.is_success());
        assert!(wrapper.response().is_none());
        assert_eq!(wrapper.errors().len(), 2);
        assert_eq!(wrapper.errors()[0].message, "first");
    }

    #[test]
    fn test_deserialize_rejects_inconsistent_envelopes() {
        let both = json!({
            "id": "id",
            "version": "1.0",
            "responsetime": "2026-01-31T09:15:00.123Z",
            "response": 1,
            "errors": [{ "errorCode": "PMS_PRT_404", "message": "missing" }]
        });
        assert!(serde_json::from_value::<ResponseWrapper<i32>>(both).is_err());

        let neither = json!({
            "id": "id",
            "version": "1.0",
            "responsetime": "2026-01-31T09:15:00.123Z",
            "response": null,
            "errors": []
        });
        assert!(serde_json::from_value::<ResponseWrapper<i32>>(neither).is_err());

        let failure = json!({
            "id": "id",
            "version": "1.0",
            "responsetime": "2026-01-31T09:15:00.123Z",
            "response": null,
            "errors": [{ "errorCode": "PMS_PRT_404", "message": "missing" }]
        });
        let parsed: ResponseWrapper<i32> = serde_json::from_value(failure).unwrap();
        assert_eq!(parsed.errors()[0].error_code, "PMS_PRT_404");
    }

    #[test]
    fn test_header_peek() {
        let header = EnvelopeHeader::peek(br#"{"id":"abc","version":"2.0","request":5}"#);
        assert_eq!(header.id.as_deref(), Some("abc"));
        assert_eq!(header.version.as_deref(), Some("2.0"));

        let header = EnvelopeHeader::peek(b"garbage");
        assert!(header.id.is_none());
    }
}
