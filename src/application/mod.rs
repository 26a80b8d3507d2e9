//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Login, token issuing, token authentication
//! - [`services::user_service::UserService`] - Registration, confirmation, profiles
//! - [`services::contact_service::ContactService`] - Contacts of the current user
//!
//! Outbound confirmation delivery goes through [`notifier::ConfirmationNotifier`].

pub mod notifier;
pub mod services;
