//! Password value object - Domain layer password handling.
//!
//! Encapsulates hashing, verification, and the password policy.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

static UPPERCASE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]").unwrap());
static SPECIAL_CHAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[!@#$%^&*]").unwrap());

/// Validate a plain-text password against the account policy:
/// at least 6 characters, one uppercase letter, and one of `!@#$%^&*`.
///
/// Shaped for use with `#[validate(custom(...))]` on request types.
pub fn validate_password_strength(plain_text: &str) -> Result<(), ValidationError> {
    if plain_text.len() < MIN_PASSWORD_LENGTH as usize {
        return Err(ValidationError::new("password_length")
            .with_message("Password must be at least 6 characters long".into()));
    }
    if !UPPERCASE_RE.is_match(plain_text) || !SPECIAL_CHAR_RE.is_match(plain_text) {
        return Err(ValidationError::new("password_strength").with_message(
            "Password must contain at least one uppercase letter and one special character".into(),
        ));
    }
    Ok(())
}

/// Password value object that handles hashing and verification.
///
/// Value object - immutable, compared by value.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Create a new password by hashing the plain text.
    ///
    /// # Errors
    /// Returns a validation error when the plain text fails the policy.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        validate_password_strength(plain_text).map_err(|e| {
            AppError::validation(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Invalid password".to_string()),
            )
        })?;

        let hash = Self::hash(plain_text)?;
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
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

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        Self::verify_hash(plain_text, &self.hash).unwrap_or(false)
    }

    /// Hash a password using Argon2.
    fn hash(plain_text: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Verify password against hash.
    fn verify_hash(plain_text: &str, hash: &str) -> AppResult<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid hash format: {}", e)))?;
        Ok(Self::argon2()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }

    /// Get Argon2 instance with default config.
    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
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
    fn test_password_hash_and_verify() {
        let plain = "Secure!1";
        let password = Password::new(plain).unwrap();

        assert!(password.verify(plain));
        assert!(!password.verify("Wrong!12"));
    }

    #[test]
    fn test_password_from_hash() {
        let plain = "Test@123";
        let password = Password::new(plain).unwrap();
        let hash = password.as_str().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify(plain));
    }

    #[test]
    fn test_same_password_different_salts() {
        let plain = "Same#Pass1";
        let pass1 = Password::new(plain).unwrap();
        let pass2 = Password::new(plain).unwrap();

        // Different salts produce different hashes
        assert_ne!(pass1.as_str(), pass2.as_str());
        // But both verify correctly
        assert!(pass1.verify(plain));
        assert!(pass2.verify(plain));
    }

    #[test]
    fn test_policy_rejects_short_password() {
        assert!(Password::new("A!b1").is_err());
    }

    #[test]
    fn test_policy_requires_uppercase() {
        assert!(Password::new("lowercase!1").is_err());
    }

    #[test]
    fn test_policy_requires_special_character() {
        assert!(Password::new("NoSpecial1").is_err());
    }

    #[test]
    fn test_policy_minimum_length_boundary() {
        // Exactly 6 characters with uppercase and special should work
        assert!(Password::new("Abc!de").is_ok());
    }
}
