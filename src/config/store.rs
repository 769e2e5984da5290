//! Audit store configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Audit store configuration
///
/// Table names are interpolated into SQL and therefore validated as plain
/// identifiers rather than bound as parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Table receiving one summary row per document
    #[serde(default = "default_summary_table")]
    pub summary_table: String,

    /// Table receiving the normalized per-attribute action log
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,
}

impl StoreConfig {
    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        for table in [&self.summary_table, &self.ledger_table] {
            if !is_valid_identifier(table) {
                return Err(ValidationError::InvalidTableName(table.clone()));
            }
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            summary_table: default_summary_table(),
            ledger_table: default_ledger_table(),
        }
    }
}

fn default_summary_table() -> String {
    "document_audit".to_string()
}

fn default_ledger_table() -> String {
    "attribute_actions".to_string()
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
