//! RunBatchHandler - the sequential batch over unprocessed documents.
//!
//! Lists the catalog, diffs it against the store, runs the engine per
//! document and persists the results. One bad document is skipped with a
//! typed reason; it never aborts the run.

use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::foundation::{DocumentId, RunId, Timestamp};
use crate::domain::review::{
    pending_documents, CatalogEntry, DocumentOutcome, RunReport, SkipReason,
};
use crate::ports::{AuditStore, CatalogError, ObjectCatalog, ObjectInfo, StoreError};

use super::process_document::process_document;

/// Command describing one batch run.
#[derive(Debug, Clone)]
pub struct RunBatchCommand {
    /// Prefix the document catalog is listed under.
    pub search_prefix: String,
    /// Prefix extraction records are fetched under.
    pub data_prefix: String,
}

/// Failures that leave the batch with no work queue at all.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to list catalog: {0}")]
    Listing(#[from] CatalogError),

    #[error("failed to load processed document ids: {0}")]
    ProcessedIds(#[from] StoreError),
}

/// Handler running the full reconciliation batch.
pub struct RunBatchHandler {
    catalog: Arc<dyn ObjectCatalog>,
    store: Arc<dyn AuditStore>,
}

impl RunBatchHandler {
    pub fn new(catalog: Arc<dyn ObjectCatalog>, store: Arc<dyn AuditStore>) -> Self {
        Self { catalog, store }
    }

    /// Runs the batch and returns its report.
    ///
    /// Documents are processed strictly one at a time. Summaries are
    /// flushed once at the end; if that write fails they stay on the
    /// report for the caller to inspect or retry.
    ///
    /// # Errors
    ///
    /// Only listing and processed-id lookup abort the run; everything
    /// after that degrades to per-document skip outcomes.
    pub async fn handle(&self, command: RunBatchCommand) -> Result<RunReport, BatchError> {
        let run_id = RunId::new();
        let started_at = Timestamp::now();

        let objects = self.catalog.list(&command.search_prefix).await?;
        let entries = catalog_entries(objects);
        let processed = self.store.processed_document_ids().await?;
        let pending = pending_documents(entries, &processed);

        for id in &pending.duplicates {
            warn!(document_id = %id, "duplicate catalog entry, keeping latest");
        }
        info!(
            run_id = %run_id,
            pending = pending.entries.len(),
            "starting reconciliation batch"
        );

        let mut outcomes = Vec::new();
        let mut summaries = Vec::new();
        let mut ledger_write_errors = Vec::new();

        for entry in &pending.entries {
            match self.process_entry(entry, &command.data_prefix, started_at).await {
                Ok(doc) => {
                    for action_id in &doc.ledger.dropped_actions {
                        warn!(
                            document_id = %entry.document_id,
                            action_id,
                            "dropped review action without attribute label"
                        );
                    }
                    if let Err(e) = self.store.append_ledger(&doc.ledger.rows).await {
                        warn!(document_id = %entry.document_id, error = %e, "ledger append failed");
                        ledger_write_errors.push((entry.document_id, e.to_string()));
                    }
                    info!(
                        document_id = %entry.document_id,
                        accuracy = %doc.summary.accuracy,
                        rows = doc.ledger.rows.len(),
                        "document reconciled"
                    );
                    outcomes.push(DocumentOutcome::Processed {
                        document_id: entry.document_id,
                        accuracy: doc.summary.accuracy,
                        ledger_rows: doc.ledger.rows.len(),
                    });
                    summaries.push(doc.summary);
                }
                Err(reason) => {
                    warn!(
                        document_id = %entry.document_id,
                        "skipping document: {}",
                        reason.describe()
                    );
                    outcomes.push(DocumentOutcome::Skipped {
                        document_id: entry.document_id,
                        reason,
                    });
                }
            }
        }

        let write_error = match self.store.append_summaries(&summaries).await {
            Ok(()) => None,
            Err(e) => Some(e.to_string()),
        };

        Ok(RunReport {
            run_id,
            started_at,
            outcomes,
            summaries,
            duplicate_documents: pending.duplicates,
            ledger_write_errors,
            write_error,
        })
    }

    async fn process_entry(
        &self,
        entry: &CatalogEntry,
        data_prefix: &str,
        started_at: Timestamp,
    ) -> Result<super::process_document::ProcessedDocument, SkipReason> {
        let key = data_key(data_prefix, entry.document_id);
        let bytes = self.catalog.fetch(&key).await.map_err(|e| match e {
            CatalogError::NotFound(_) => SkipReason::MissingObject,
            CatalogError::Io(msg) => SkipReason::UnreadableObject(msg),
        })?;

        process_document(entry, &bytes, started_at)
    }
}

/// Builds the fetch key for one document's extraction record.
fn data_key(data_prefix: &str, document_id: DocumentId) -> String {
    if data_prefix.is_empty() {
        format!("{document_id}.json")
    } else {
        format!("{}/{}.json", data_prefix.trim_end_matches('/'), document_id)
    }
}

/// Converts raw listings into catalog entries.
///
/// Only `.json` keys whose stem is a numeric document id participate;
/// anything else is logged and ignored.
fn catalog_entries(objects: Vec<ObjectInfo>) -> Vec<CatalogEntry> {
    objects
        .into_iter()
        .filter_map(|object| {
            let Some(stem) = json_stem(&object.key) else {
                return None;
            };
            match DocumentId::from_str(stem) {
                Ok(document_id) => Some(CatalogEntry {
                    document_id,
                    key: object.key,
                    last_modified: object.last_modified,
                }),
                Err(_) => {
                    warn!(key = %object.key, "ignoring catalog key with non-numeric stem");
                    None
                }
            }
        })
        .collect()
}

/// Returns the file stem of a `.json` key, `None` for other extensions.
fn json_stem(key: &str) -> Option<&str> {
    let name = key.rsplit('/').next()?;
    name.strip_suffix(".json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Accuracy;
    use crate::domain::review::{AttributeRow, DocumentSummary};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::RwLock;

    use crate::adapters::memory::InMemoryObjectCatalog;

    // ─────────────────────────────────────────────────────────────────────
    // Mock Implementations
    // ─────────────────────────────────────────────────────────────────────

    struct MockStore {
        processed: HashSet<DocumentId>,
        summaries: RwLock<Vec<DocumentSummary>>,
        ledger: RwLock<Vec<AttributeRow>>,
        fail_summaries: AtomicBool,
        fail_ledger: AtomicBool,
    }

    impl MockStore {
        fn new() -> Self {
            Self {
                processed: HashSet::new(),
                summaries: RwLock::new(Vec::new()),
                ledger: RwLock::new(Vec::new()),
                fail_summaries: AtomicBool::new(false),
                fail_ledger: AtomicBool::new(false),
            }
        }

        fn with_processed(ids: &[i64]) -> Self {
            let mut store = Self::new();
            store.processed = ids.iter().map(|&id| DocumentId::new(id)).collect();
            store
        }

        fn failing_summaries() -> Self {
            let store = Self::new();
            store.fail_summaries.store(true, Ordering::SeqCst);
            store
        }

        fn failing_ledger() -> Self {
            let store = Self::new();
            store.fail_ledger.store(true, Ordering::SeqCst);
            store
        }
    }

    #[async_trait]
    impl AuditStore for MockStore {
        async fn processed_document_ids(&self) -> Result<HashSet<DocumentId>, StoreError> {
            Ok(self.processed.clone())
        }

        async fn append_summaries(&self, summaries: &[DocumentSummary]) -> Result<(), StoreError> {
            if self.fail_summaries.load(Ordering::SeqCst) {
                return Err(StoreError::Database("simulated write failure".to_string()));
            }
            self.summaries.write().await.extend_from_slice(summaries);
            Ok(())
        }

        async fn append_ledger(&self, rows: &[AttributeRow]) -> Result<(), StoreError> {
            if self.fail_ledger.load(Ordering::SeqCst) {
                return Err(StoreError::Database("simulated ledger failure".to_string()));
            }
            self.ledger.write().await.extend_from_slice(rows);
            Ok(())
        }
    }

    const RECORD: &str = r#"{
        "data": {"labels": [{"value": "color"}, {"value": "size"}, {"value": "weight"}]},
        "predictions": [
            {"model_version": "user_review", "action": [
                {"id": 1, "action": "edit", "value": {"labels": ["color"], "text": "red", "editedText": "blue"}}
            ]},
            {"model_version": "old_parser", "result": [
                {"id": 0, "value": {}},
                {"id": 1, "value": {"labels": ["color"], "text": "red"}},
                {"id": 2, "value": {"labels": ["size"], "text": "M"}}
            ]}
        ]
    }"#;

    fn command() -> RunBatchCommand {
        RunBatchCommand {
            search_prefix: "search".to_string(),
            data_prefix: "data".to_string(),
        }
    }

    async fn seed_document(catalog: &InMemoryObjectCatalog, id: i64, modified: u64, body: &str) {
        let ts = Timestamp::from_unix_secs(modified);
        catalog.put(format!("search/{id}.json"), ts, body.as_bytes().to_vec()).await;
        catalog.put(format!("data/{id}.json"), ts, body.as_bytes().to_vec()).await;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tests
    // ─────────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn batch_processes_pending_documents() {
        let catalog = Arc::new(InMemoryObjectCatalog::new());
        seed_document(&catalog, 1, 10, RECORD).await;
        seed_document(&catalog, 2, 10, RECORD).await;
        let store = Arc::new(MockStore::new());
        let handler = RunBatchHandler::new(catalog, store.clone());

        let report = handler.handle(command()).await.unwrap();

        assert_eq!(report.processed_count(), 2);
        assert_eq!(report.skipped_count(), 0);
        assert!(report.fully_persisted());
        assert_eq!(store.summaries.read().await.len(), 2);
        // Three ledger rows per document.
        assert_eq!(store.ledger.read().await.len(), 6);
    }

    #[tokio::test]
    async fn batch_skips_already_processed_documents() {
        let catalog = Arc::new(InMemoryObjectCatalog::new());
        seed_document(&catalog, 1, 10, RECORD).await;
        seed_document(&catalog, 2, 10, RECORD).await;
        let store = Arc::new(MockStore::with_processed(&[1]));
        let handler = RunBatchHandler::new(catalog, store.clone());

        let report = handler.handle(command()).await.unwrap();

        assert_eq!(report.processed_count(), 1);
        let summaries = store.summaries.read().await;
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].document_id, DocumentId::new(2));
    }

    #[tokio::test]
    async fn missing_data_object_skips_without_aborting() {
        let catalog = Arc::new(InMemoryObjectCatalog::new());
        seed_document(&catalog, 1, 10, RECORD).await;
        // Listed under the search prefix but absent from the data prefix.
        catalog
            .put("search/2.json", Timestamp::from_unix_secs(10), RECORD.as_bytes().to_vec())
            .await;
        let store = Arc::new(MockStore::new());
        let handler = RunBatchHandler::new(catalog, store.clone());

        let report = handler.handle(command()).await.unwrap();

        assert_eq!(report.processed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert!(report.outcomes.iter().any(|o| matches!(
            o,
            DocumentOutcome::Skipped { document_id, reason: SkipReason::MissingObject }
                if *document_id == DocumentId::new(2)
        )));
    }

    #[tokio::test]
    async fn malformed_record_skips_without_aborting() {
        let catalog = Arc::new(InMemoryObjectCatalog::new());
        seed_document(&catalog, 1, 10, "{broken").await;
        seed_document(&catalog, 2, 10, RECORD).await;
        let store = Arc::new(MockStore::new());
        let handler = RunBatchHandler::new(catalog, store.clone());

        let report = handler.handle(command()).await.unwrap();

        assert_eq!(report.processed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(store.summaries.read().await.len(), 1);
    }

    #[tokio::test]
    async fn summary_write_failure_retains_summaries_on_report() {
        let catalog = Arc::new(InMemoryObjectCatalog::new());
        seed_document(&catalog, 1, 10, RECORD).await;
        let store = Arc::new(MockStore::failing_summaries());
        let handler = RunBatchHandler::new(catalog, store);

        let report = handler.handle(command()).await.unwrap();

        assert!(report.write_error.is_some());
        assert_eq!(report.summaries.len(), 1);
        assert_eq!(report.summaries[0].accuracy, Accuracy::from_counts(2, 1));
    }

    #[tokio::test]
    async fn ledger_write_failure_is_reported_per_document() {
        let catalog = Arc::new(InMemoryObjectCatalog::new());
        seed_document(&catalog, 1, 10, RECORD).await;
        let store = Arc::new(MockStore::failing_ledger());
        let handler = RunBatchHandler::new(catalog, store);

        let report = handler.handle(command()).await.unwrap();

        assert_eq!(report.processed_count(), 1);
        assert_eq!(report.ledger_write_errors.len(), 1);
        assert_eq!(report.ledger_write_errors[0].0, DocumentId::new(1));
        assert!(!report.fully_persisted());
    }

    #[tokio::test]
    async fn non_json_and_non_numeric_keys_are_ignored() {
        let catalog = Arc::new(InMemoryObjectCatalog::new());
        seed_document(&catalog, 1, 10, RECORD).await;
        let ts = Timestamp::from_unix_secs(10);
        catalog.put("search/readme.txt", ts, b"x".to_vec()).await;
        catalog.put("search/notes.json", ts, b"{}".to_vec()).await;
        let store = Arc::new(MockStore::new());
        let handler = RunBatchHandler::new(catalog, store);

        let report = handler.handle(command()).await.unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.processed_count(), 1);
    }

    #[tokio::test]
    async fn duplicate_catalog_keys_resolve_to_latest() {
        let catalog = Arc::new(InMemoryObjectCatalog::new());
        seed_document(&catalog, 7, 100, RECORD).await;
        catalog
            .put(
                "search/sub/7.json",
                Timestamp::from_unix_secs(200),
                RECORD.as_bytes().to_vec(),
            )
            .await;
        let store = Arc::new(MockStore::new());
        let handler = RunBatchHandler::new(catalog, store);

        let report = handler.handle(command()).await.unwrap();

        assert_eq!(report.duplicate_documents, vec![DocumentId::new(7)]);
        assert_eq!(report.processed_count(), 1);
        assert_eq!(report.summaries[0].s3_doc_reference, "search/sub/7.json");
    }

    #[test]
    fn data_key_handles_empty_prefix() {
        assert_eq!(data_key("", DocumentId::new(5)), "5.json");
        assert_eq!(data_key("data/", DocumentId::new(5)), "data/5.json");
        assert_eq!(data_key("data", DocumentId::new(5)), "data/5.json");
    }

    #[test]
    fn json_stem_extracts_document_stem() {
        assert_eq!(json_stem("a/b/12.json"), Some("12"));
        assert_eq!(json_stem("12.json"), Some("12"));
        assert_eq!(json_stem("a/b/12.txt"), None);
    }
}
