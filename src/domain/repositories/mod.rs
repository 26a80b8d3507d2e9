//! Repository trait definitions for the domain layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence` (PostgreSQL)
//!   and `crate::infrastructure::memory` (in-process)
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Account storage, lookup by email
//! - [`ContactRepository`] - Contacts scoped to their owner
//! - [`TokenRepository`] - Get-or-create auth tokens
//! - [`ConfirmationRepository`] - Pending email confirmations

pub mod confirmation_repository;
pub mod contact_repository;
pub mod token_repository;
pub mod user_repository;

pub use confirmation_repository::ConfirmationRepository;
pub use contact_repository::ContactRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use confirmation_repository::MockConfirmationRepository;
#[cfg(test)]
pub use contact_repository::MockContactRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
