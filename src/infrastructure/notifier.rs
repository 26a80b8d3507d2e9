//! Confirmation delivery implementations.

use async_trait::async_trait;

use crate::application::notifier::ConfirmationNotifier;
use crate::domain::entities::User;
use crate::error::AppError;

/// Writes confirmation tokens to the service log instead of sending mail.
///
/// The token itself is only emitted at `debug` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl ConfirmationNotifier for LogNotifier {
    async fn send_confirmation(&self, user: &User, token: &str) -> Result<(), AppError> {
        tracing::info!(user_id = user.id, email = %user.email, "Confirmation token issued");
        tracing::debug!(user_id = user.id, %token, "Confirmation token");
        Ok(())
    }
}
