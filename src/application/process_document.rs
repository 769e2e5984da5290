//! Per-document processing - record bytes to ledger and summary.

use crate::domain::foundation::Timestamp;
use crate::domain::review::{
    build_ledger, summarize, CatalogEntry, DocumentSummary, ExtractionRecord, Ledger, SkipReason,
};

/// The ledger and summary built for one document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub summary: DocumentSummary,
    pub ledger: Ledger,
}

/// Runs the reconciliation engine over one fetched extraction record.
///
/// Pure apart from its inputs: fetching the bytes and persisting the
/// outputs belong to the caller.
///
/// # Errors
///
/// Returns a [`SkipReason`] when the bytes do not parse as an extraction
/// record; the caller logs it and moves to the next document.
pub fn process_document(
    entry: &CatalogEntry,
    bytes: &[u8],
    run_timestamp: Timestamp,
) -> Result<ProcessedDocument, SkipReason> {
    let record = ExtractionRecord::parse(bytes)
        .map_err(|e| SkipReason::MalformedRecord(e.to_string()))?;

    let baseline = record.baseline_attributes();
    let extracted = record.extracted_attributes();
    let actions = record.review_actions();

    let ledger = build_ledger(entry.document_id, &baseline, extracted, actions);
    let summary = summarize(
        entry.document_id,
        &ledger.rows,
        extracted.len() as u64,
        &entry.key,
        entry.last_modified,
        run_timestamp,
    );

    Ok(ProcessedDocument { summary, ledger })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DocumentId;
    use crate::domain::review::UserAction;

    fn entry(id: i64) -> CatalogEntry {
        CatalogEntry {
            document_id: DocumentId::new(id),
            key: format!("incoming/{id}.json"),
            last_modified: Timestamp::from_unix_secs(1_000),
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

    #[test]
    fn processes_record_into_ledger_and_summary() {
        let run_ts = Timestamp::from_unix_secs(2_000);
        let doc = process_document(&entry(42), RECORD.as_bytes(), run_ts).unwrap();

        assert_eq!(doc.ledger.rows.len(), 3);
        assert_eq!(doc.summary.attributes_extracted, 2);
        assert_eq!(doc.summary.attributes_edited, 1);
        assert_eq!(doc.summary.accuracy.value(), 50.0);
        assert_eq!(doc.summary.s3_doc_reference, "incoming/42.json");
        assert_eq!(doc.summary.system_date, run_ts);
    }

    #[test]
    fn ledger_rows_carry_the_document_id() {
        let doc = process_document(&entry(42), RECORD.as_bytes(), Timestamp::now()).unwrap();
        assert!(doc
            .ledger
            .rows
            .iter()
            .all(|r| r.document_id == DocumentId::new(42)));
    }

    #[test]
    fn record_with_no_actions_yields_passive_ledger() {
        let record = r#"{
            "data": {"labels": [{"value": "a"}]},
            "predictions": [{"model_version": "old_parser", "result": [{"id": 0, "value": {}}]}]
        }"#;

        let doc = process_document(&entry(1), record.as_bytes(), Timestamp::now()).unwrap();

        assert_eq!(doc.ledger.rows.len(), 1);
        assert_eq!(doc.ledger.rows[0].user_action, UserAction::NotExtracted);
        assert_eq!(doc.summary.accuracy.value(), 0.0);
    }

    #[test]
    fn garbage_bytes_are_a_malformed_record() {
        let err = process_document(&entry(1), b"not json", Timestamp::now()).unwrap_err();
        assert!(matches!(err, SkipReason::MalformedRecord(_)));
    }
}
