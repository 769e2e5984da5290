//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the reconciliation engine to external systems:
//! - `fs` - local-directory object catalog
//! - `memory` - in-memory fakes for tests and development
//! - `postgres` - sqlx-backed audit store

pub mod fs;
pub mod memory;
pub mod postgres;

pub use fs::FsObjectCatalog;
pub use memory::{InMemoryAuditStore, InMemoryObjectCatalog};
pub use postgres::PostgresAuditStore;
