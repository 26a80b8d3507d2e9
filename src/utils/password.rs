//! Password hashing with Argon2id.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$...`), so the salt and
//! parameters travel with the hash.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

const SALT_BYTES: usize = 16;

/// Hash checked when no account matches, so an unknown email costs as much
/// as a wrong password. Built with the same parameters as real hashes.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("dummy-password-never-matches").ok());

/// Stand-in PHC hash for credential checks without a stored hash.
pub fn dummy_hash() -> &'static str {
    DUMMY_HASH.as_deref().unwrap_or_default()
}

/// Hashes a plaintext password with a fresh random salt.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if salt generation or hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; SALT_BYTES];
    getrandom::fill(&mut salt_bytes).map_err(|e| {
        AppError::internal(
            "Failed to generate password salt",
            json!({ "reason": e.to_string() }),
        )
    })?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| {
        AppError::internal("Failed to encode password salt", json!({ "reason": e.to_string() }))
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal("Failed to hash password", json!({ "reason": e.to_string() })))
}

/// Verifies a plaintext password against a stored PHC hash.
///
/// A malformed stored hash never matches.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn join_error(e: tokio::task::JoinError) -> AppError {
    AppError::internal("Password task failed", json!({ "reason": e.to_string() }))
}

/// [`hash_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if hashing fails or the task panics.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(join_error)?
}

/// [`verify_password`] on the blocking thread pool.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the task panics.
pub async fn verify_password_blocking(
    password: String,
    stored_hash: String,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(join_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("name1name2").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("name1name2", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = hash_password("name1name2").unwrap();
        let second = hash_password("name1name2").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_dummy_hash_is_a_real_argon2_hash() {
        let hash = dummy_hash();

        assert!(PasswordHash::new(hash).is_ok());
        assert!(hash.starts_with("$argon2id$"));
        assert!(!verify_password("name1name2", hash));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hash = hash_password_blocking("name1name2".to_string())
            .await
            .unwrap();

        assert!(verify_password_blocking("name1name2".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!verify_password_blocking("wrong".to_string(), hash)
            .await
            .unwrap());
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("", ""));
    }
}
