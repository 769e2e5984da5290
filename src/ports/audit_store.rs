//! Audit store port - relational persistence of summaries and ledgers.
//!
//! The engine supplies fully-formed rows; schema and DDL ownership stays
//! with the store behind this trait.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::DocumentId;
use crate::domain::review::{AttributeRow, DocumentSummary};

/// Errors surfaced by store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),
}

/// Port for the relational store backing the audit tables.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Returns the document ids that already have a summary row.
    ///
    /// # Errors
    ///
    /// - `Database` on query failure; the batch cannot diff the catalog
    ///   without this set, so callers abort the run.
    async fn processed_document_ids(&self) -> Result<HashSet<DocumentId>, StoreError>;

    /// Appends summary rows. Existing rows are never updated.
    async fn append_summaries(&self, summaries: &[DocumentSummary]) -> Result<(), StoreError>;

    /// Appends one document's ledger rows to the action log.
    async fn append_ledger(&self, rows: &[AttributeRow]) -> Result<(), StoreError>;
}
