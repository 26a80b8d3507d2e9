//! Repository trait for auth tokens.

use crate::domain::entities::AuthToken;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for auth tokens.
///
/// A user owns at most one token. Implementations enforce this with a
/// uniqueness constraint so concurrent first logins converge on one key.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Returns the user's token, creating it with `candidate_key` if none exists.
    ///
    /// When a token already exists, `candidate_key` is discarded and the
    /// stored token is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_or_create(&self, user_id: i64, candidate_key: &str)
    -> Result<AuthToken, AppError>;

    /// Finds a token by its key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, AppError>;

    /// Counts issued tokens.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
