//! PostgreSQL adapters - database implementations of store ports.

mod audit_store;

pub use audit_store::PostgresAuditStore;
