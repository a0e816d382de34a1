//! Credential hashing and verification
//!
//! Passwords are stored as Argon2id digests in PHC string format, so each digest
//! carries its own salt and cost parameters.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

use crate::config::HashingConfig;
use crate::error::CredentialError;

/// One-way password hasher, built once at startup and shared read-only.
#[derive(Clone)]
pub struct CredentialManager {
    argon2: Argon2<'static>,
}

impl CredentialManager {
    pub fn new(config: &HashingConfig) -> Result<Self, CredentialError> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            config.parallelism,
            None,
        )
        .map_err(|e| CredentialError::InvalidParams(e.to_string()))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| CredentialError::HashingFailed(e.to_string()))
    }

    /// Check a plaintext candidate against a stored digest.
    ///
    /// Malformed or foreign digests verify as `false`. The final comparison is
    /// constant-time.
    pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

impl Default for CredentialManager {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}
