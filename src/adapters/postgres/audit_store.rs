//! PostgreSQL implementation of AuditStore.
//!
//! Appends summary and ledger rows into the audit tables. Table names come
//! from configuration (validated as SQL identifiers there); the tables'
//! schema belongs to the store, not to this crate.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::DocumentId;
use crate::domain::review::{AttributeRow, DocumentSummary};
use crate::ports::{AuditStore, StoreError};

/// PostgreSQL implementation of AuditStore.
#[derive(Clone)]
pub struct PostgresAuditStore {
    pool: PgPool,
    summary_table: String,
    ledger_table: String,
}

impl PostgresAuditStore {
    /// Creates a new PostgresAuditStore over the given pool and tables.
    pub fn new(pool: PgPool, summary_table: impl Into<String>, ledger_table: impl Into<String>) -> Self {
        Self {
            pool,
            summary_table: summary_table.into(),
            ledger_table: ledger_table.into(),
        }
    }
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    async fn processed_document_ids(&self) -> Result<HashSet<DocumentId>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT document_id FROM {}",
            self.summary_table
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(format!("failed to fetch processed ids: {e}")))?;

        Ok(rows
            .iter()
            .map(|row| DocumentId::new(row.get::<i64, _>("document_id")))
            .collect())
    }

    async fn append_summaries(&self, summaries: &[DocumentSummary]) -> Result<(), StoreError> {
        if summaries.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(format!("failed to open transaction: {e}")))?;

        let insert = format!(
            r#"
            INSERT INTO {} (
                document_id, attributes_extracted, attributes_added,
                attributes_edited, attributes_deleted, accuracy,
                s3_doc_reference, processed_date, system_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
            self.summary_table
        );

        for summary in summaries {
            sqlx::query(&insert)
                .bind(summary.document_id.as_i64())
                .bind(summary.attributes_extracted as i64)
                .bind(summary.attributes_added as i64)
                .bind(summary.attributes_edited as i64)
                .bind(summary.attributes_deleted as i64)
                .bind(summary.accuracy.value())
                .bind(&summary.s3_doc_reference)
                .bind(summary.processed_date.as_datetime())
                .bind(summary.system_date.as_datetime())
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    StoreError::Database(format!(
                        "failed to insert summary for document {}: {}",
                        summary.document_id, e
                    ))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(format!("failed to commit summaries: {e}")))
    }

    async fn append_ledger(&self, rows: &[AttributeRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Database(format!("failed to open transaction: {e}")))?;

        let insert = format!(
            r#"
            INSERT INTO {} (
                document_id, attribute_name, user_action,
                old_value, new_value, is_active
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
            self.ledger_table
        );

        for row in rows {
            sqlx::query(&insert)
                .bind(row.document_id.as_i64())
                .bind(&row.attribute_name)
                .bind(row.user_action.as_str())
                .bind(row.old_value.as_deref())
                .bind(row.new_value.as_deref())
                .bind(row.is_active)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    StoreError::Database(format!(
                        "failed to insert ledger row for document {}: {}",
                        row.document_id, e
                    ))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Database(format!("failed to commit ledger rows: {e}")))
    }
}
