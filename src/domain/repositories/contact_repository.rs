//! Repository trait for contact data access.

use crate::domain::entities::{Contact, ContactPatch, NewContact};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for address contacts.
///
/// Every read and write is scoped by the owning `user_id`; a contact owned
/// by another user behaves exactly like one that does not exist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Creates a contact owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, user_id: i64, new_contact: NewContact) -> Result<Contact, AppError>;

    /// Lists contacts of a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Contact>, AppError>;

    /// Partially updates a contact owned by `user_id`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(Contact))` with the updated record
    /// - `Ok(None)` if the user owns no contact with this id
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, AppError>;

    /// Deletes the listed contacts owned by `user_id`.
    ///
    /// Ids that do not exist or belong to another user are ignored.
    /// Returns the number of deleted rows.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_ids(&self, user_id: i64, ids: &[i64]) -> Result<u64, AppError>;

    /// Counts all contacts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
