//! Secret generation
//!
//! Secrets are random bytes rendered as lowercase hex.

use rand::RngCore;

/// Generator for API key secrets
#[derive(Debug, Clone)]
pub struct SecretGenerator {
    /// Number of random bytes per secret
    key_bytes: usize,
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretGenerator {
    /// 32 random bytes, 64 hex characters
    pub fn new() -> Self {
        Self { key_bytes: 32 }
    }

    /// Set the number of random bytes. Hex doubles the length, so at most 64
    /// bytes still fit the stored secret.
    pub fn with_key_bytes(mut self, bytes: usize) -> Self {
        self.key_bytes = bytes.clamp(16, 64);
        self
    }

    pub fn generate(&self) -> String {
        let mut random_bytes = vec![0u8; self.key_bytes];
        rand::thread_rng().fill_bytes(&mut random_bytes);
        hex::encode(random_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::validate_secret;

    #[test]
    fn test_generate_is_hex_of_expected_length() {
        let secret = SecretGenerator::new().generate();

        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(validate_secret(&secret).is_ok());
    }

    #[test]
    fn test_generate_is_unique() {
        let generator = SecretGenerator::new();
        assert_ne!(generator.generate(), generator.generate());
    }

    #[test]
    fn test_key_bytes_are_clamped() {
        assert_eq!(SecretGenerator::new().with_key_bytes(4).generate().len(), 32);
        assert_eq!(SecretGenerator::new().with_key_bytes(100).generate().len(), 128);
    }
}
