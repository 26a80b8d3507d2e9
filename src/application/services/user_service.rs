//! User service: registration, email confirmation and profiles.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use serde_json::Value;

use crate::application::notifier::ConfirmationNotifier;
use crate::domain::entities::{
    Contact, NewContact, NewUser, User, UserPatch, UserType, normalize_email,
};
use crate::domain::repositories::{ConfirmationRepository, ContactRepository, UserRepository};
use crate::error::AppError;
use crate::utils::password::hash_password_blocking;
use crate::utils::token_generator::generate_confirmation_token;

type HmacSha256 = Hmac<Sha256>;

/// Message returned for every failed confirmation, whatever the cause.
pub const INVALID_CONFIRMATION: &str = "Invalid email or confirmation token";

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub position: String,
    pub contacts: Vec<NewContact>,
}

/// Validated profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub position: Option<String>,
}

/// A user together with their contacts.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub contacts: Vec<Contact>,
}

/// Service for account lifecycle operations.
///
/// Confirmation tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`)
/// before storage; the raw token only leaves the service through the notifier.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    contacts: Arc<dyn ContactRepository>,
    confirmations: Arc<dyn ConfirmationRepository>,
    notifier: Arc<dyn ConfirmationNotifier>,
    signing_secret: String,
}

impl UserService {
    /// Creates a new user service.
    ///
    /// # Arguments
    ///
    /// - `signing_secret` - HMAC key for confirmation tokens; must stay stable
    ///   while confirmations are pending
    pub fn new(
        users: Arc<dyn UserRepository>,
        contacts: Arc<dyn ContactRepository>,
        confirmations: Arc<dyn ConfirmationRepository>,
        notifier: Arc<dyn ConfirmationNotifier>,
        signing_secret: String,
    ) -> Self {
        Self {
            users,
            contacts,
            confirmations,
            notifier,
            signing_secret,
        }
    }

    /// Hashes a raw confirmation token with HMAC-SHA256.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Registers an inactive buyer, stores their initial contacts and sends
    /// an email confirmation token.
    ///
    /// If storing the contacts or the confirmation fails, the new user is
    /// deleted again so the email can be registered on retry. A failed
    /// notification is logged; the registration still succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database or hashing errors.
    pub async fn register(&self, registration: Registration) -> Result<UserProfile, AppError> {
        let email = normalize_email(&registration.email);

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::email_taken());
        }

        let password_hash = hash_password_blocking(registration.password).await?;

        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                first_name: registration.first_name,
                last_name: registration.last_name,
                company: registration.company,
                position: registration.position,
                user_type: UserType::Buyer,
                is_active: false,
            })
            .await?;

        match self.complete_registration(&user, registration.contacts).await {
            Ok(contacts) => Ok(UserProfile { user, contacts }),
            Err(e) => {
                if let Err(cleanup) = self.users.delete(user.id).await {
                    tracing::error!(
                        error = %cleanup,
                        user_id = user.id,
                        "Failed to remove partially registered user"
                    );
                }
                Err(e)
            }
        }
    }

    /// Stores the initial contacts and issues the confirmation.
    async fn complete_registration(
        &self,
        user: &User,
        new_contacts: Vec<NewContact>,
    ) -> Result<Vec<Contact>, AppError> {
        let mut contacts = Vec::with_capacity(new_contacts.len());
        for new_contact in new_contacts {
            contacts.push(self.contacts.create(user.id, new_contact).await?);
        }

        self.issue_confirmation(user).await?;

        Ok(contacts)
    }

    /// Generates, stores and delivers a new confirmation token.
    async fn issue_confirmation(&self, user: &User) -> Result<(), AppError> {
        let token = generate_confirmation_token()?;

        self.confirmations
            .store(user.id, &self.hash_token(&token))
            .await?;

        if let Err(e) = self.notifier.send_confirmation(user, &token).await {
            tracing::warn!(error = %e, user_id = user.id, "Failed to deliver confirmation token");
        }

        Ok(())
    }

    /// Activates the account if `token` matches the pending confirmation.
    ///
    /// The token is single-use.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] if the email is unknown or the token
    /// does not match.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn confirm(&self, email: &str, token: &str) -> Result<User, AppError> {
        let email = normalize_email(email);

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::forbidden(INVALID_CONFIRMATION, Value::Null))?;

        let consumed = self
            .confirmations
            .consume(user.id, &self.hash_token(token.trim()))
            .await?;

        if !consumed {
            return Err(AppError::forbidden(INVALID_CONFIRMATION, Value::Null));
        }

        self.users.set_active(user.id, true).await?;
        tracing::info!(user_id = user.id, "Email confirmed");

        Ok(User {
            is_active: true,
            ..user
        })
    }

    /// Loads the user's profile with contacts.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn profile(&self, user: &User) -> Result<UserProfile, AppError> {
        let contacts = self.contacts.list_by_user(user.id).await?;

        Ok(UserProfile {
            user: user.clone(),
            contacts,
        })
    }

    /// Applies a partial profile update and returns the fresh profile.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new email belongs to another user.
    /// Returns [`AppError::Internal`] on database or hashing errors.
    pub async fn update_profile(
        &self,
        user: &User,
        update: ProfileUpdate,
    ) -> Result<UserProfile, AppError> {
        let email = update.email.map(|email| normalize_email(&email));

        if let Some(email) = &email
            && *email != user.email
            && self.users.find_by_email(email).await?.is_some()
        {
            return Err(AppError::email_taken());
        }

        let password_hash = match update.password {
            Some(password) => Some(hash_password_blocking(password).await?),
            None => None,
        };

        let patch = UserPatch {
            email,
            password_hash,
            first_name: update.first_name,
            last_name: update.last_name,
            company: update.company,
            position: update.position,
        };

        let updated = if patch.is_empty() {
            user.clone()
        } else {
            let updated = self.users.update(user.id, patch).await?;
            tracing::info!(user_id = user.id, "Profile updated");
            updated
        };

        self.profile(&updated).await
    }

    /// Total number of registered users.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn user_count(&self) -> Result<i64, AppError> {
        self.users.count().await
    }
}
