//! Repository trait for pending email confirmations.

use crate::error::AppError;
use async_trait::async_trait;

/// Stores HMAC digests of confirmation tokens, one pending token per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationRepository: Send + Sync {
    /// Stores the digest for a user, replacing any pending one.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn store(&self, user_id: i64, token_hash: &str) -> Result<(), AppError>;

    /// Deletes the pending confirmation if the digest matches.
    ///
    /// Returns `true` when a matching confirmation was consumed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn consume(&self, user_id: i64, token_hash: &str) -> Result<bool, AppError>;
}
