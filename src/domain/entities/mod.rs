//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without persistence logic.
//!
//! # Entity Types
//!
//! - [`User`] - An account; identified by a unique email
//! - [`AuthToken`] - The single bearer credential of a user
//! - [`Contact`] - An address/phone record owned by a user
//!
//! # Design Pattern
//!
//! Entities have separate structs for creation and partial updates:
//! - `NewUser`, `NewContact` - For creating new records
//! - `UserPatch`, `ContactPatch` - For partial updates (`None` = unchanged)

pub mod contact;
pub mod token;
pub mod user;

pub use contact::{Contact, ContactPatch, NewContact};
pub use token::AuthToken;
pub use user::{NewUser, User, UserPatch, UserType, normalize_email};
