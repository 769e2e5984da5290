//! Catalog diff - computing the unprocessed work queue.
//!
//! Compares the documents available in the object catalog against the
//! document ids already present in the audit store.

use std::collections::{BTreeMap, HashSet};

use crate::domain::foundation::{DocumentId, Timestamp};

/// One document discovered in the object catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub document_id: DocumentId,
    /// Object key the entry was listed under.
    pub key: String,
    pub last_modified: Timestamp,
}

/// The resolved work queue plus the duplicate ids encountered while
/// building it, kept for caller-side logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDocuments {
    /// Unprocessed entries ordered by document id.
    pub entries: Vec<CatalogEntry>,
    /// Document ids that appeared under more than one catalog key.
    pub duplicates: Vec<DocumentId>,
}

/// Computes the set of catalog entries not yet processed.
///
/// A document id listed under several keys resolves to the most recently
/// modified entry; ties keep the first one seen, so the result is stable.
/// Output is ordered by document id, making the diff idempotent for
/// identical inputs.
pub fn pending_documents(
    entries: Vec<CatalogEntry>,
    processed: &HashSet<DocumentId>,
) -> PendingDocuments {
    let mut resolved: BTreeMap<DocumentId, CatalogEntry> = BTreeMap::new();
    let mut duplicates = Vec::new();

    for entry in entries {
        match resolved.get(&entry.document_id) {
            None => {
                resolved.insert(entry.document_id, entry);
            }
            Some(existing) => {
                if !duplicates.contains(&entry.document_id) {
                    duplicates.push(entry.document_id);
                }
                if entry.last_modified.is_after(&existing.last_modified) {
                    resolved.insert(entry.document_id, entry);
                }
            }
        }
    }

    let entries = resolved
        .into_values()
        .filter(|entry| !processed.contains(&entry.document_id))
        .collect();

    PendingDocuments {
        entries,
        duplicates,
    }
}
