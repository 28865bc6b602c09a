//! Password hashing and verification using Argon2id

use crate::{config::AppConfig, error::AppError};
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};

/// Password hasher with configurable parameters
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with default parameters (OWASP recommended)
    pub fn new() -> Self {
        // OWASP recommended parameters (as of 2024)
        // m=64MiB, t=3 iterations, p=4 lanes
        let params = Params::new(65536, 3, 4, None).expect("Invalid Argon2 params");

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Self { argon2 }
    }

    /// Hash a password
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AppError::Internal(format!("Failed to hash password: {}", e))
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a hash.
    /// Argon2's verifier compares digests in constant time.
    pub fn verify(&self, password: &str, hash: &str) -> Result<(), AppError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            tracing::debug!("Failed to parse password hash: {:?}", e);
            AppError::Internal(format!("Failed to parse password hash: {}", e))
        })?;

        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::InvalidCredentials)
    }

    /// Validate password against policy
    pub fn validate_password_policy(password: &str, config: &AppConfig) -> Result<(), AppError> {
        let min_length = config.security.password_min_length;

        if password.len() < min_length {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                min_length
            )));
        }

        Ok(())
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "correct horse battery staple";

        let hash = hasher.hash(password).unwrap();
        hasher.verify(password, &hash).unwrap();
    }

    #[test]
    fn test_hash_is_never_the_plaintext() {
        let hasher = PasswordHasher::new();
        let password = "abcdef";

        let hash = hasher.hash(password).unwrap();
        assert_ne!(hash, password);
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = PasswordHasher::new();
        let password = "abcdef";

        let hash = hasher.hash(password).unwrap();
        assert!(hasher.verify("abcdeg", &hash).is_err());
    }

    #[test]
    fn test_hash_is_different_each_time() {
        let hasher = PasswordHasher::new();
        let password = "abcdef";

        let hash1 = hasher.hash(password).unwrap();
        let hash2 = hasher.hash(password).unwrap();

        // Hashes should be different due to salt
        assert_ne!(hash1, hash2);

        // But both should verify correctly
        hasher.verify(password, &hash1).unwrap();
        hasher.verify(password, &hash2).unwrap();
    }
}
