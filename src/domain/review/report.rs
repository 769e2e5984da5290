//! Run report - typed outcome of one batch run.
//!
//! Per-document failures never cross the batch boundary as bare errors;
//! they are collected here as skip outcomes instead.

use serde::Serialize;

use crate::domain::foundation::{Accuracy, DocumentId, RunId, Timestamp};

use super::summary::DocumentSummary;

/// Why a catalog document was skipped instead of summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Listed in the catalog but absent from the extraction store.
    MissingObject,
    /// The object could not be read.
    UnreadableObject(String),
    /// The object's bytes did not parse as an extraction record.
    MalformedRecord(String),
}

impl SkipReason {
    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            SkipReason::MissingObject => "object not found in extraction store".to_string(),
            SkipReason::UnreadableObject(err) => format!("object unreadable: {err}"),
            SkipReason::MalformedRecord(err) => format!("record malformed: {err}"),
        }
    }
}

/// Outcome of processing one catalog document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DocumentOutcome {
    Processed {
        document_id: DocumentId,
        accuracy: Accuracy,
        ledger_rows: usize,
    },
    Skipped {
        document_id: DocumentId,
        reason: SkipReason,
    },
}

/// Everything a batch run produced, including summaries that could not be
/// written: a store failure reports here rather than discarding them.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: Timestamp,
    pub outcomes: Vec<DocumentOutcome>,
    pub summaries: Vec<DocumentSummary>,
    /// Document ids that appeared under more than one catalog key.
    pub duplicate_documents: Vec<DocumentId>,
    /// Ledger appends that failed, by document.
    pub ledger_write_errors: Vec<(DocumentId, String)>,
    /// Failure of the final summary append, if any.
    pub write_error: Option<String>,
}

impl RunReport {
    /// Number of documents fully processed.
    pub fn processed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DocumentOutcome::Processed { .. }))
            .count()
    }

    /// Number of documents skipped.
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, DocumentOutcome::Skipped { .. }))
            .count()
    }

    /// Whether every write reached the store.
    pub fn fully_persisted(&self) -> bool {
        self.write_error.is_none() && self.ledger_write_errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processed(id: i64) -> DocumentOutcome {
        DocumentOutcome::Processed {
            document_id: DocumentId::new(id),
            accuracy: Accuracy::HUNDRED,
            ledger_rows: 3,
        }
    }

    fn skipped(id: i64) -> DocumentOutcome {
        DocumentOutcome::Skipped {
            document_id: DocumentId::new(id),
            reason: SkipReason::MissingObject,
        }
    }

    fn report(outcomes: Vec<DocumentOutcome>) -> RunReport {
        RunReport {
            run_id: RunId::new(),
            started_at: Timestamp::now(),
            outcomes,
            summaries: Vec::new(),
            duplicate_documents: Vec::new(),
            ledger_write_errors: Vec::new(),
            write_error: None,
        }
    }

    #[test]
    fn report_counts_outcomes() {
        let report = report(vec![processed(1), skipped(2), processed(3)]);
        assert_eq!(report.processed_count(), 2);
        assert_eq!(report.skipped_count(), 1);
    }

    #[test]
    fn fully_persisted_requires_no_write_errors() {
        let mut report = report(vec![processed(1)]);
        assert!(report.fully_persisted());

        report.write_error = Some("connection reset".to_string());
        assert!(!report.fully_persisted());

        report.write_error = None;
        report.ledger_write_errors.push((DocumentId::new(1), "constraint".to_string()));
        assert!(!report.fully_persisted());
    }

    #[test]
    fn skip_reason_describes_itself() {
        assert!(SkipReason::MissingObject.describe().contains("not found"));
        assert!(SkipReason::MalformedRecord("eof".to_string()).describe().contains("eof"));
    }
}
