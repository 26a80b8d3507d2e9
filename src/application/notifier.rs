//! Outbound delivery of email confirmation tokens.

use async_trait::async_trait;

use crate::domain::entities::User;
use crate::error::AppError;

/// Delivers a freshly issued confirmation token to its user.
///
/// # Implementations
///
/// - [`crate::infrastructure::notifier::LogNotifier`] - Writes the token to the service log
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationNotifier: Send + Sync {
    /// Sends `token` to `user`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if delivery fails.
    async fn send_confirmation(&self, user: &User, token: &str) -> Result<(), AppError>;
}
