//! In-process repository backend.
//!
//! Used when no database is configured and by the integration tests.

pub mod memory_store;

pub use memory_store::MemoryStore;
