//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Response field names follow the wire contract
//! (`Status`, `Token`, `Contacts`, ...).

pub mod contact;
pub mod envelope;
pub mod health;
pub mod login;
pub mod user;
