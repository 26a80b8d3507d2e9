//! Contact service: address book of the authenticated user.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::entities::{Contact, ContactPatch, NewContact};
use crate::domain::repositories::ContactRepository;
use crate::error::AppError;

pub const CONTACT_NOT_FOUND: &str = "Contact not found";

/// Service for managing a user's contacts.
///
/// Every operation takes the owner's id; contacts of other users are
/// invisible.
pub struct ContactService {
    contacts: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(contacts: Arc<dyn ContactRepository>) -> Self {
        Self { contacts }
    }

    /// Lists the user's contacts.
    pub async fn list(&self, user_id: i64) -> Result<Vec<Contact>, AppError> {
        self.contacts.list_by_user(user_id).await
    }

    /// Adds a contact to the user's address book.
    pub async fn create(&self, user_id: i64, new_contact: NewContact) -> Result<Contact, AppError> {
        let contact = self.contacts.create(user_id, new_contact).await?;
        tracing::info!(user_id, contact_id = contact.id, "Contact created");
        Ok(contact)
    }

    /// Partially updates one of the user's contacts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the user owns no contact with this id.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: ContactPatch,
    ) -> Result<Contact, AppError> {
        self.contacts
            .update(id, user_id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(CONTACT_NOT_FOUND, Value::Null))
    }

    /// Deletes the listed contacts and returns how many were removed.
    ///
    /// Foreign and unknown ids are skipped silently.
    pub async fn delete(&self, user_id: i64, ids: &[i64]) -> Result<u64, AppError> {
        let deleted = self.contacts.delete_by_ids(user_id, ids).await?;
        tracing::info!(user_id, requested = ids.len(), deleted, "Contacts deleted");
        Ok(deleted)
    }

    /// Total number of stored contacts.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.contacts.count().await
    }
}
