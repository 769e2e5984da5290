//! Attribute ledger construction.
//!
//! Merges a document's review actions with its attribute baseline and the
//! second-pass parser output into one row per attribute name. Row priority
//! on a name collision: acted-on > unchanged-but-extracted > never-extracted.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::domain::foundation::DocumentId;

use super::action::{classify, ActionKind, RawAction};
use super::extraction::{ExtractedAttribute, ATTENTION_SENTINEL};

/// Reviewer-visible disposition of one attribute in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Add,
    Edit,
    Delete,
    NoChanges,
    NotExtracted,
}

impl UserAction {
    /// Returns the snake_case form persisted to the store.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserAction::Add => "add",
            UserAction::Edit => "edit",
            UserAction::Delete => "delete",
            UserAction::NoChanges => "no_changes",
            UserAction::NotExtracted => "not_extracted",
        }
    }
}

impl From<ActionKind> for UserAction {
    fn from(kind: ActionKind) -> Self {
        match kind {
            ActionKind::Add => UserAction::Add,
            ActionKind::Edit => UserAction::Edit,
            ActionKind::Delete => UserAction::Delete,
        }
    }
}

/// One row of the per-document reconciliation ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeRow {
    pub document_id: DocumentId,
    pub attribute_name: String,
    pub user_action: UserAction,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub is_active: bool,
}

/// A freshly built ledger, plus the ids of actions dropped as malformed.
#[derive(Debug, Clone)]
pub struct Ledger {
    /// Rows sorted by attribute name ascending, one per name.
    pub rows: Vec<AttributeRow>,
    /// Ids of review actions that carried no attribute label.
    pub dropped_actions: Vec<i64>,
}

/// Builds the complete attribute ledger for one document.
///
/// 1. Review actions are deduplicated by id (last write wins), classified,
///    and emitted first; a malformed action is dropped, not fatal.
/// 2. Extracted attributes whose region id was never acted on emit
///    `no_changes` rows carrying the extracted text.
/// 3. Baseline names still unseen emit `not_extracted` rows.
///
/// Every attribute name appears exactly once; rows come back sorted by
/// name so output is deterministic for diffing and tests.
pub fn build_ledger(
    document_id: DocumentId,
    baseline: &[String],
    extracted: &[ExtractedAttribute],
    actions: &[RawAction],
) -> Ledger {
    let mut dropped_actions = Vec::new();
    let mut rows_by_name: BTreeMap<String, AttributeRow> = BTreeMap::new();
    let mut acted_ids: HashSet<i64> = HashSet::new();

    for action in dedupe_by_id(actions) {
        match classify(action) {
            Ok(classified) => {
                acted_ids.insert(action.id);
                rows_by_name.insert(
                    classified.attribute_name.clone(),
                    AttributeRow {
                        document_id,
                        attribute_name: classified.attribute_name,
                        user_action: classified.kind.into(),
                        old_value: classified.old_value,
                        new_value: classified.new_value,
                        is_active: true,
                    },
                );
            }
            Err(err) => dropped_actions.push(err.action_id),
        }
    }

    for attrib in extracted {
        if acted_ids.contains(&attrib.id) {
            continue;
        }
        let Some(name) = attrib.value.labels.first() else {
            continue;
        };
        rows_by_name
            .entry(name.clone())
            .or_insert_with(|| AttributeRow {
                document_id,
                attribute_name: name.clone(),
                user_action: UserAction::NoChanges,
                old_value: attrib.value.text.clone(),
                new_value: None,
                is_active: true,
            });
    }

    for name in baseline {
        if name == ATTENTION_SENTINEL || rows_by_name.contains_key(name) {
            continue;
        }
        rows_by_name.insert(
            name.clone(),
            AttributeRow {
                document_id,
                attribute_name: name.clone(),
                user_action: UserAction::NotExtracted,
                old_value: None,
                new_value: None,
                is_active: true,
            },
        );
    }

    Ledger {
        rows: rows_by_name.into_values().collect(),
        dropped_actions,
    }
}

/// Deduplicates actions on id, keeping the last occurrence's payload at the
/// first occurrence's position.
fn dedupe_by_id(actions: &[RawAction]) -> Vec<&RawAction> {
    let mut deduped: Vec<&RawAction> = Vec::with_capacity(actions.len());
    let mut position: HashMap<i64, usize> = HashMap::new();

    for action in actions {
        match position.get(&action.id) {
            Some(&index) => deduped[index] = action,
            None => {
                position.insert(action.id, deduped.len());
                deduped.push(action);
            }
        }
    }

    deduped
}
