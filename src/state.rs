//! Shared application state and repository wiring.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::notifier::ConfirmationNotifier;
use crate::application::services::{AuthService, ContactService, UserService};
use crate::domain::repositories::{
    ConfirmationRepository, ContactRepository, TokenRepository, UserRepository,
};
use crate::infrastructure::memory::MemoryStore;
use crate::infrastructure::persistence::{
    PgConfirmationRepository, PgContactRepository, PgTokenRepository, PgUserRepository,
};

/// The set of repositories the services are built on.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub contacts: Arc<dyn ContactRepository>,
    pub tokens: Arc<dyn TokenRepository>,
    pub confirmations: Arc<dyn ConfirmationRepository>,
}

impl Repositories {
    /// PostgreSQL-backed repositories sharing one pool.
    pub fn postgres(pool: Arc<PgPool>) -> Self {
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            contacts: Arc::new(PgContactRepository::new(pool.clone())),
            tokens: Arc::new(PgTokenRepository::new(pool.clone())),
            confirmations: Arc::new(PgConfirmationRepository::new(pool)),
        }
    }

    /// Repositories backed by a fresh in-process store.
    pub fn in_memory() -> Self {
        Self::in_memory_with(Arc::new(MemoryStore::new()))
    }

    /// Repositories backed by the given in-process store.
    pub fn in_memory_with(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            contacts: store.clone(),
            tokens: store.clone(),
            confirmations: store,
        }
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub contact_service: Arc<ContactService>,
    /// Present when running against PostgreSQL; used by the health check.
    pub db: Option<Arc<PgPool>>,
}

impl AppState {
    /// Builds the services on top of `repositories`.
    ///
    /// # Arguments
    ///
    /// - `notifier` - delivery channel for confirmation tokens
    /// - `signing_secret` - HMAC key for stored confirmation tokens
    pub fn new(
        repositories: Repositories,
        notifier: Arc<dyn ConfirmationNotifier>,
        signing_secret: String,
    ) -> Self {
        let Repositories {
            users,
            contacts,
            tokens,
            confirmations,
        } = repositories;

        Self {
            user_service: Arc::new(UserService::new(
                users.clone(),
                contacts.clone(),
                confirmations,
                notifier,
                signing_secret,
            )),
            auth_service: Arc::new(AuthService::new(users, tokens)),
            contact_service: Arc::new(ContactService::new(contacts)),
            db: None,
        }
    }

    /// Attaches the database pool checked by `/health`.
    pub fn with_db(mut self, pool: Arc<PgPool>) -> Self {
        self.db = Some(pool);
        self
    }
}
