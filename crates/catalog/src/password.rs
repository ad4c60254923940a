//! One-way password hashing.
//!
//! Hashes are bcrypt strings (`$2b$10$...`) with a random per-password
//! salt, so the same password never produces the same stored value twice.
//! The storefront verifies logins against the same format.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Minimum password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt work factor.
pub const HASH_COST: u32 = 10;

/// Errors from password validation and hashing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Password shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// The hasher failed.
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Validate password meets requirements.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` if the password has fewer than
/// [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: &SecretString) -> Result<(), PasswordError> {
    if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    Ok(())
}

/// Hash a password using bcrypt at [`HASH_COST`].
///
/// # Errors
///
/// Returns `PasswordError::Hash` if the hasher rejects the input.
pub fn hash_password(password: &SecretString) -> Result<String, PasswordError> {
    bcrypt::hash(password.expose_secret(), HASH_COST)
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check a password against a stored bcrypt hash.
///
/// Returns `false` for malformed hashes.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
