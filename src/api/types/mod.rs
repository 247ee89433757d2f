//! Envelope types shared by the portal endpoints

pub mod envelope;
pub mod error;
pub mod extract;

pub use envelope::{
    decode_request, encode_request, encode_response, EnvelopeError, ErrorRecord,
    RequestWrapper, ResponseWrapper, RESPONSE_VERSION,
};
pub use error::{codes, ApiError};
pub use extract::Envelope;
