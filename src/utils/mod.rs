//! Utility functions for validation, credential handling and database errors.
//!
//! - [`validation`] - Field requirement checks and the structured error map
//! - [`password`] - Password hashing and verification (argon2)
//! - [`token_generator`] - Random auth keys and confirmation tokens
//! - [`db_error`] - Constraint-aware inspection of database errors

pub mod db_error;
pub mod password;
pub mod token_generator;
pub mod validation;
