//! Argon2id password hashing.
//!
//! Parameters are fixed to `argon2::Params::DEFAULT` (19 MiB, 2 passes,
//! 1 lane) with a fresh random salt per hash. Hashes are stored as PHC
//! strings, so the parameters travel with each hash.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::{UserError, UserResult};

fn hasher() -> Argon2<'static> {
    Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default())
}

/// Hash a plaintext password into a PHC string
pub fn hash_password(plain: &str) -> UserResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserError::Hashing(e.to_string()))
}

/// Turns a plaintext password into its stored form
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHashing: Send + Sync {
    fn hash(&self, plain: &str) -> UserResult<String>;
}

/// [`hash_password`] behind [`PasswordHashing`], the service default
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hashing;

impl PasswordHashing for Argon2Hashing {
    fn hash(&self, plain: &str) -> UserResult<String> {
        hash_password(plain)
    }
}

/// Check a plaintext password against a stored PHC string
pub fn verify_password(plain: &str, stored: &str) -> UserResult<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| UserError::Hashing(e.to_string()))?;
    Ok(hasher().verify_password(plain.as_bytes(), &parsed).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_and_hides_plaintext() {
        let hash = hash_password("secret123").unwrap();

        assert!(hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
        assert!(!hash.contains("secret123"));
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("secret124", &hash).unwrap());
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_argon2_hashing_produces_phc_string() {
        let hash = Argon2Hashing.hash("hunter2").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        let err = verify_password("hunter2", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, UserError::Hashing(_)));
    }
}
