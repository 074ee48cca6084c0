//! Password value object.
//!
//! Encapsulates Argon2 hashing and verification. Length policy is not
//! enforced here: registration may hash the `"*"` placeholder for
//! password-less signups, while the profile change-password schema
//! applies the minimum-length rule at the validation boundary.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Hashed password, compared by value.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose the hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain-text password.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {e}")))?;
        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap an existing hash loaded from the store.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain-text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let password = Password::new("correct horse").unwrap();
        assert!(password.verify("correct horse"));
        assert!(!password.verify("wrong horse"));
    }

    #[test]
    fn restored_hash_still_verifies() {
        let password = Password::new("secret123").unwrap();
        let restored = Password::from_hash(password.as_str().to_string());
        assert!(restored.verify("secret123"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let first = Password::new("repeated").unwrap();
        let second = Password::new("repeated").unwrap();
        assert_ne!(first.as_str(), second.as_str());
        assert!(first.verify("repeated"));
        assert!(second.verify("repeated"));
    }

    #[test]
    fn placeholder_passwords_are_hashable() {
        // Password-less registration hashes the "*" placeholder.
        let password = Password::new("*").unwrap();
        assert!(password.verify("*"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        let password = Password::from_hash("not-a-phc-string".to_string());
        assert!(!password.verify("anything"));
    }
}
