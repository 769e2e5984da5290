//! Document summary aggregation.
//!
//! Reduces a built ledger into the single statistics row persisted per
//! document.

use serde::Serialize;

use crate::domain::foundation::{Accuracy, DocumentId, Timestamp};

use super::ledger::{AttributeRow, UserAction};

/// Per-document change statistics, created once after ledger reduction
/// and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub document_id: DocumentId,
    pub attributes_extracted: u64,
    pub attributes_added: u64,
    pub attributes_edited: u64,
    pub attributes_deleted: u64,
    pub accuracy: Accuracy,
    /// Object key the document record was listed under.
    pub s3_doc_reference: String,
    /// Last-modified time of the source object.
    pub processed_date: Timestamp,
    /// Shared timestamp of the batch run that produced this summary.
    pub system_date: Timestamp,
}

/// Reduces a ledger into one [`DocumentSummary`].
///
/// Accuracy treats every human action as a miss by the automated extractor:
/// the score is the fraction of extracted attributes that needed no
/// correction, and exactly 0 for zero-extraction documents.
pub fn summarize(
    document_id: DocumentId,
    rows: &[AttributeRow],
    extracted_count: u64,
    s3_doc_reference: &str,
    processed_date: Timestamp,
    run_timestamp: Timestamp,
) -> DocumentSummary {
    let count = |action: UserAction| rows.iter().filter(|r| r.user_action == action).count() as u64;

    let attributes_added = count(UserAction::Add);
    let attributes_edited = count(UserAction::Edit);
    let attributes_deleted = count(UserAction::Delete);
    let corrections = attributes_added + attributes_edited + attributes_deleted;

    DocumentSummary {
        document_id,
        attributes_extracted: extracted_count,
        attributes_added,
        attributes_edited,
        attributes_deleted,
        accuracy: Accuracy::from_counts(extracted_count, corrections),
        s3_doc_reference: s3_doc_reference.to_string(),
        processed_date,
        system_date: run_timestamp,
    }
}
