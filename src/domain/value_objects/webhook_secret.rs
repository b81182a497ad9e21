use sha2::{Digest, Sha256};

/// Shared credential presented by the extraction service on every callback.
#[derive(Clone)]
pub struct WebhookSecret(String);

impl WebhookSecret {
    pub fn new(secret: impl Into<String>) -> Result<Self, String> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err("Webhook secret cannot be empty".to_string());
        }
        Ok(Self(secret))
    }

    /// Constant-time comparison of SHA-256 digests.
    pub fn verify(&self, provided: Option<&str>) -> bool {
        let Some(provided) = provided else {
            return false;
        };

        let expected = Sha256::digest(self.0.as_bytes());
        let actual = Sha256::digest(provided.as_bytes());

        expected
            .iter()
            .zip(actual.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret(***)")
    }
}
