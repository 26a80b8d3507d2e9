//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain and application
//! layers.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`memory`] - In-process repository implementation
//! - [`notifier`] - Confirmation token delivery

pub mod memory;
pub mod notifier;
pub mod persistence;
