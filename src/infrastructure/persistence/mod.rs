//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow` row structs.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Account storage and lookup
//! - [`PgContactRepository`] - Owner-scoped contact storage
//! - [`PgTokenRepository`] - Get-or-create auth tokens
//! - [`PgConfirmationRepository`] - Pending email confirmations

pub mod pg_confirmation_repository;
pub mod pg_contact_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_confirmation_repository::PgConfirmationRepository;
pub use pg_contact_repository::PgContactRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
