//! Partner API key and identifier generation
//!
//! Keys are random bytes encoded as URL-safe base64 behind a fixed prefix.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::{Rng, RngCore};

/// Generator for partner API keys and record identifiers
#[derive(Debug, Clone)]
pub struct ApiKeyGenerator {
    /// Prefix for all generated keys (e.g., "pk_live_", "pk_test_")
    prefix: String,
    /// Number of random bytes to generate
    key_bytes: usize,
}

impl ApiKeyGenerator {
    /// Create a new API key generator
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            key_bytes: 32,
        }
    }

    /// Create a generator for production keys
    pub fn production() -> Self {
        Self::new("pk_live_")
    }

    /// Set the number of random bytes
    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        self.key_bytes = bytes;
        self
    }

    /// Generate a new partner API key
    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);

        format!("{}{}", self.prefix, URL_SAFE_NO_PAD.encode(&random_bytes))
    }

    /// Generate a numeric partner ID
    pub fn partner_id(&self) -> String {
        rand::thread_rng().gen_range(100_000..1_000_000).to_string()
    }

    /// Generate an API key request ID
    pub fn request_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

impl Default for ApiKeyGenerator {
    fn default() -> Self {
        Self::production()
    }
}
