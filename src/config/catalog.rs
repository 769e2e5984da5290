//! Object catalog configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Object catalog configuration
///
/// The catalog is listed under `search_prefix` to discover documents and
/// fetched under `data_prefix` per document; the two may differ when
/// listings and records live in separate areas of the bucket.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// Bucket root (a directory for the filesystem adapter)
    pub root: String,

    /// Key prefix the document catalog is listed under
    #[serde(default)]
    pub search_prefix: String,

    /// Key prefix extraction records are fetched under
    #[serde(default)]
    pub data_prefix: String,
}

impl CatalogConfig {
    /// Validate catalog configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.root.is_empty() {
            return Err(ValidationError::MissingRequired("CATALOG_ROOT"));
        }
        Ok(())
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: String::new(),
            search_prefix: String::new(),
            data_prefix: String::new(),
        }
    }
}
