//! Extraction store record - wire format of one document's review data.
//!
//! Each document in the extraction store is a single JSON object holding the
//! annotation baseline (`data.labels`), the human review pass
//! (`predictions[model_version = "user_review"].action`) and the second-pass
//! parser output (`predictions[model_version = "old_parser"].result`).

use serde::Deserialize;

use super::action::RawAction;

/// Label the annotation tool attaches to regions flagged for attention.
/// It names no real attribute and is excluded from the baseline.
pub const ATTENTION_SENTINEL: &str = "!:Attention";

const USER_REVIEW_MODEL: &str = "user_review";
const OLD_PARSER_MODEL: &str = "old_parser";

/// One document's record as fetched from the extraction store.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionRecord {
    pub data: DocumentData,

    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

/// Annotation data attached to the document.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentData {
    #[serde(default)]
    pub labels: Vec<LabelEntry>,
}

/// One baseline label entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LabelEntry {
    pub value: String,
}

/// One prediction pass over the document.
///
/// The `user_review` pass carries actions; parser passes carry results.
/// Both fields default to empty so either shape deserializes.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub model_version: String,

    #[serde(default)]
    pub action: Vec<RawAction>,

    #[serde(default)]
    pub result: Vec<ExtractedAttribute>,
}

/// One attribute the second-pass parser extracted, with its region id.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedAttribute {
    pub id: i64,
    pub value: ExtractedValue,
}

/// Labels and text of an extracted attribute.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedValue {
    #[serde(default)]
    pub labels: Vec<String>,

    #[serde(default)]
    pub text: Option<String>,
}

impl ExtractionRecord {
    /// Parses a record from raw object bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Baseline attribute names in document order, sentinel excluded.
    pub fn baseline_attributes(&self) -> Vec<String> {
        self.data
            .labels
            .iter()
            .filter(|label| label.value != ATTENTION_SENTINEL)
            .map(|label| label.value.clone())
            .collect()
    }

    /// Actions recorded by the human review pass, empty if none ran.
    pub fn review_actions(&self) -> &[RawAction] {
        self.predictions
            .iter()
            .find(|p| p.model_version == USER_REVIEW_MODEL)
            .map(|p| p.action.as_slice())
            .unwrap_or(&[])
    }

    /// Second-pass parser attributes. The leading result entry is a
    /// header carrying no attribute and is skipped.
    pub fn extracted_attributes(&self) -> &[ExtractedAttribute] {
        self.predictions
            .iter()
            .find(|p| p.model_version == OLD_PARSER_MODEL)
            .and_then(|p| p.result.get(1..))
            .unwrap_or(&[])
    }
}
