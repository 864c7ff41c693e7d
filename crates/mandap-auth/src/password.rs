//! Password hashing and signing-secret generation.
//!
//! Hashing uses Argon2id (hybrid mode) with default parameters and a salt
//! from OsRng; hashes are stored in PHC string format.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rand::Rng;

/// Hash a partner password for storage.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if hashing fails (rare).
///
/// # Example
///
/// ```
/// use mandap_auth::password::hash_password;
///
/// let hash = hash_password("correct horse battery").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 hash.
///
/// Returns `Ok(true)` on a match and `Ok(false)` on a mismatch; `Err` only
/// when the stored hash is not a valid PHC string.
///
/// # Errors
///
/// Returns `argon2::password_hash::Error` if the hash cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}

/// Generate a random signing secret.
///
/// 256 bits from the thread RNG, hex encoded (64 characters). Used for
/// ephemeral development-mode JWT secrets; production deployments configure
/// their own.
#[must_use]
pub fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::thread_rng().r#gen();
    hex::encode(bytes)
}

// =============================================================================
// Tests
// =============================================================================
