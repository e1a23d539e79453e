//! Session token, worker key and password hashing helpers.
//!
//! Session tokens and worker keys are 256 bits of randomness encoded as
//! URL-safe base64. Operator passwords are never stored in plaintext, only
//! their SHA-256 hash.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a new opaque token.
pub fn generate_token() -> String {
    let mut token_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut token_bytes);
    URL_SAFE_NO_PAD.encode(token_bytes)
}

/// Hash a secret using SHA-256, hex encoded.
pub fn hash_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_token() {
        let token = generate_token();

        // 32 bytes base64 encoded without padding
        assert_eq!(token.len(), 43);
        assert!(!token.contains('='));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_hash_secret() {
        let hash = hash_secret("123456");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_secret("123456"));
        assert_ne!(hash, hash_secret("1234567"));
        assert_eq!(
            hash,
            "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92"
        );
    }
}
