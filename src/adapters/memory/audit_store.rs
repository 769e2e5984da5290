//! In-memory implementation of AuditStore.
//!
//! Accumulates summaries and ledger rows in vectors. Useful for testing
//! and development.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DocumentId;
use crate::domain::review::{AttributeRow, DocumentSummary};
use crate::ports::{AuditStore, StoreError};

/// Audit store holding everything in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuditStore {
    processed: Arc<RwLock<HashSet<DocumentId>>>,
    summaries: Arc<RwLock<Vec<DocumentSummary>>>,
    ledger: Arc<RwLock<Vec<AttributeRow>>>,
}

impl InMemoryAuditStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a document id as already processed in a prior run.
    pub async fn mark_processed(&self, id: DocumentId) {
        self.processed.write().await.insert(id);
    }

    /// Returns a copy of all stored summaries.
    pub async fn summaries(&self) -> Vec<DocumentSummary> {
        self.summaries.read().await.clone()
    }

    /// Returns a copy of all stored ledger rows.
    pub async fn ledger_rows(&self) -> Vec<AttributeRow> {
        self.ledger.read().await.clone()
    }
}

#[async_trait]
impl AuditStore for InMemoryAuditStore {
    async fn processed_document_ids(&self) -> Result<HashSet<DocumentId>, StoreError> {
        Ok(self.processed.read().await.clone())
    }

    async fn append_summaries(&self, summaries: &[DocumentSummary]) -> Result<(), StoreError> {
        let mut stored = self.summaries.write().await;
        stored.extend_from_slice(summaries);

        let mut processed = self.processed.write().await;
        for summary in summaries {
            processed.insert(summary.document_id);
        }
        Ok(())
    }

    async fn append_ledger(&self, rows: &[AttributeRow]) -> Result<(), StoreError> {
        self.ledger.write().await.extend_from_slice(rows);
        Ok(())
    }
}
