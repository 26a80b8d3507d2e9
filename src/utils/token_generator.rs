//! Random credential generation.
//!
//! Auth keys are long-lived bearer credentials handed to clients after login.
//! Confirmation tokens are one-shot secrets delivered out of band and stored
//! only as HMAC digests.

use base64::Engine as _;
use serde_json::json;

use crate::error::AppError;

/// Number of random bytes in an auth key (hex-encoded to 40 characters).
const AUTH_KEY_BYTES: usize = 20;

/// Number of random bytes in a confirmation token before base64 encoding.
const CONFIRMATION_TOKEN_BYTES: usize = 24;

/// Generates a new auth key: 40 lowercase hex characters.
pub fn generate_auth_key() -> String {
    let bytes: [u8; AUTH_KEY_BYTES] = rand::random();
    hex::encode(bytes)
}

/// Generates a confirmation token encoded as URL-safe base64 without padding,
/// producing a 32-character string.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_confirmation_token() -> Result<String, AppError> {
    let mut buffer = [0u8; CONFIRMATION_TOKEN_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}
