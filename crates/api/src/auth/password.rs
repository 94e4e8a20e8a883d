//! bcrypt password hashing and verification.
//!
//! Hashes use [`bcrypt::DEFAULT_COST`] and a random salt, stored in the
//! modular crypt format (`$2b$<cost>$<salt+hash>`) so cost and salt travel
//! with the hash. bcrypt reads at most 72 bytes of input; longer passwords
//! are refused before they get here (see `noda_core::credentials::check_password_size`).
//!
//! Hashing is CPU-bound, so request handlers go through the async wrappers,
//! which run on the blocking thread pool.

use bcrypt::{BcryptError, DEFAULT_COST};
use noda_core::error::CoreError;

/// Hash a plaintext password at the default cost.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, DEFAULT_COST)
}

/// Verify a plaintext password against a stored bcrypt hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, hash)
}

/// [`hash_password`] on the blocking pool.
pub async fn hash(password: String) -> Result<String, CoreError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| CoreError::Internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| CoreError::Internal(format!("Password hashing failed: {e}")))
}

/// [`verify_password`] on the blocking pool.
pub async fn verify(password: String, hash: String) -> Result<bool, CoreError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| CoreError::Internal(format!("Password verification task failed: {e}")))?
        .map_err(|e| CoreError::Internal(format!("Password verification failed: {e}")))
}
