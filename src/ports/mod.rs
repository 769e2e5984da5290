//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the reconciliation engine and the outside world. Adapters implement
//! these ports.

mod audit_store;
mod object_catalog;

pub use audit_store::{AuditStore, StoreError};
pub use object_catalog::{CatalogError, ObjectCatalog, ObjectInfo};
