//! Review action classification.
//!
//! Maps one raw human review event to the normalized
//! (attribute name, action kind, old value, new value) form consumed by
//! the ledger builder. Classification is a pure function.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The kind of edit a reviewer performed on one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Add,
    Edit,
    Delete,
}

/// Payload of a review action: the attribute labels and texts involved.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionValue {
    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub text: Option<String>,

    /// Replacement text, present on edit actions.
    #[serde(default, rename = "editedText")]
    pub edited_text: Option<String>,
}

/// One human review event as recorded in the extraction store.
///
/// `id` is unique within a document's action set; the ledger builder
/// deduplicates repeated ids last-write-wins rather than assuming the
/// source never repeats one.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAction {
    pub id: i64,

    #[serde(rename = "action")]
    pub kind: ActionKind,

    pub value: ActionValue,
}

/// Error raised for an action that names no attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("review action {action_id} carries no attribute label")]
pub struct MalformedActionError {
    pub action_id: i64,
}

/// A review action normalized to the ledger vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedAction {
    pub attribute_name: String,
    pub kind: ActionKind,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Classifies one raw review action.
///
/// - `delete` keeps the removed text as the old value
/// - `add` keeps the introduced text as the new value
/// - `edit` keeps both sides
///
/// The attribute name is the first entry of `value.labels`.
///
/// # Errors
///
/// Returns [`MalformedActionError`] if the action carries no labels.
pub fn classify(action: &RawAction) -> Result<ClassifiedAction, MalformedActionError> {
    let attribute_name = action
        .value
        .labels
        .first()
        .cloned()
        .ok_or(MalformedActionError {
            action_id: action.id,
        })?;

    let (old_value, new_value) = match action.kind {
        ActionKind::Delete => (action.value.text.clone(), None),
        ActionKind::Add => (None, action.value.text.clone()),
        ActionKind::Edit => (action.value.text.clone(), action.value.edited_text.clone()),
    };

    Ok(ClassifiedAction {
        attribute_name,
        kind: action.kind,
        old_value,
        new_value,
    })
}
