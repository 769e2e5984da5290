//! Review module - the reconciliation engine.
//!
//! Pure transformations from a document's extraction record and review
//! actions to its attribute ledger and summary statistics. No I/O here;
//! collaborators live behind the ports.

pub mod action;
pub mod catalog;
pub mod extraction;
pub mod ledger;
pub mod report;
pub mod summary;

pub use action::{classify, ActionKind, ClassifiedAction, MalformedActionError, RawAction};
pub use catalog::{pending_documents, CatalogEntry, PendingDocuments};
pub use extraction::{ExtractedAttribute, ExtractionRecord, ATTENTION_SENTINEL};
pub use ledger::{build_ledger, AttributeRow, Ledger, UserAction};
pub use report::{DocumentOutcome, RunReport, SkipReason};
pub use summary::{summarize, DocumentSummary};
