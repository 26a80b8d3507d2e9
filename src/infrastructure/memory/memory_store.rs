//! In-process implementation of every repository trait.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::domain::entities::{
    AuthToken, Contact, ContactPatch, NewContact, NewUser, User, UserPatch,
};
use crate::domain::repositories::{
    ConfirmationRepository, ContactRepository, TokenRepository, UserRepository,
};
use crate::error::AppError;

#[derive(Default)]
struct Tables {
    next_user_id: i64,
    next_contact_id: i64,
    users: BTreeMap<i64, User>,
    contacts: BTreeMap<i64, Contact>,
    tokens: HashMap<String, AuthToken>,
    confirmations: HashMap<i64, String>,
}

/// Repository backend holding all data in a single mutex-guarded set of
/// tables.
///
/// Mirrors the database constraints: unique emails, one token per user,
/// one pending confirmation per user. Data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, AppError> {
        self.tables
            .lock()
            .map_err(|_| AppError::internal("Memory store lock poisoned", json!({})))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut tables = self.lock()?;

        if tables.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::email_taken());
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            company: new_user.company,
            position: new_user.position,
            user_type: new_user.user_type,
            is_active: new_user.is_active,
            date_joined: Utc::now(),
        };
        tables.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.lock()?.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, AppError> {
        let mut tables = self.lock()?;

        if let Some(email) = &patch.email
            && tables.users.values().any(|u| u.id != id && &u.email == email)
        {
            return Err(AppError::email_taken());
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Record not found", json!(null)))?;
        patch.apply_to(user);

        Ok(user.clone())
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<(), AppError> {
        let mut tables = self.lock()?;

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Record not found", json!(null)))?;
        user.is_active = active;

        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.lock()?;

        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        tables.contacts.retain(|_, c| c.user_id != id);
        tables.tokens.retain(|_, t| t.user_id != id);
        tables.confirmations.remove(&id);

        Ok(true)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.lock()?.users.len() as i64)
    }
}

#[async_trait]
impl ContactRepository for MemoryStore {
    async fn create(&self, user_id: i64, new_contact: NewContact) -> Result<Contact, AppError> {
        let mut tables = self.lock()?;

        tables.next_contact_id += 1;
        let contact = Contact {
            id: tables.next_contact_id,
            user_id,
            city: new_contact.city,
            street: new_contact.street,
            house: new_contact.house,
            structure: new_contact.structure,
            building: new_contact.building,
            apartment: new_contact.apartment,
            phone: new_contact.phone,
            created_at: Utc::now(),
        };
        tables.contacts.insert(contact.id, contact.clone());

        Ok(contact)
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<Contact>, AppError> {
        Ok(self
            .lock()?
            .contacts
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: i64,
        user_id: i64,
        patch: ContactPatch,
    ) -> Result<Option<Contact>, AppError> {
        let mut tables = self.lock()?;

        let Some(contact) = tables
            .contacts
            .get_mut(&id)
            .filter(|c| c.user_id == user_id)
        else {
            return Ok(None);
        };
        patch.apply_to(contact);

        Ok(Some(contact.clone()))
    }

    async fn delete_by_ids(&self, user_id: i64, ids: &[i64]) -> Result<u64, AppError> {
        let mut tables = self.lock()?;

        let before = tables.contacts.len();
        tables
            .contacts
            .retain(|id, c| !(c.user_id == user_id && ids.contains(id)));

        Ok((before - tables.contacts.len()) as u64)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.lock()?.contacts.len() as i64)
    }
}

#[async_trait]
impl TokenRepository for MemoryStore {
    async fn get_or_create(
        &self,
        user_id: i64,
        candidate_key: &str,
    ) -> Result<AuthToken, AppError> {
        let mut tables = self.lock()?;

        if let Some(existing) = tables.tokens.values().find(|t| t.user_id == user_id) {
            return Ok(existing.clone());
        }

        let token = AuthToken {
            key: candidate_key.to_string(),
            user_id,
            created_at: Utc::now(),
        };
        tables.tokens.insert(token.key.clone(), token.clone());

        Ok(token)
    }

    async fn find_by_key(&self, key: &str) -> Result<Option<AuthToken>, AppError> {
        Ok(self.lock()?.tokens.get(key).cloned())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.lock()?.tokens.len() as i64)
    }
}

#[async_trait]
impl ConfirmationRepository for MemoryStore {
    async fn store(&self, user_id: i64, token_hash: &str) -> Result<(), AppError> {
        self.lock()?
            .confirmations
            .insert(user_id, token_hash.to_string());
        Ok(())
    }

    async fn consume(&self, user_id: i64, token_hash: &str) -> Result<bool, AppError> {
        let mut tables = self.lock()?;

        if tables.confirmations.get(&user_id).map(String::as_str) != Some(token_hash) {
            return Ok(false);
        }
        tables.confirmations.remove(&user_id);

        Ok(true)
    }
}
