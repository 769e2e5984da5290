//! Object catalog port - listing and fetching review documents.
//!
//! The engine only ever lists keys under a prefix and fetches raw bytes;
//! whatever backs the bucket (a local directory, an S3-compatible store)
//! stays behind this trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::Timestamp;

/// Errors surfaced by catalog operations.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The requested key does not exist. Callers skip the document and
    /// continue the batch.
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("catalog I/O error: {0}")]
    Io(String),
}

/// One listed object: its key and last-modified time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
    pub key: String,
    pub last_modified: Timestamp,
}

/// Port for the object store holding extraction records.
#[async_trait]
pub trait ObjectCatalog: Send + Sync {
    /// Lists objects whose key starts with `prefix`.
    ///
    /// # Errors
    ///
    /// - `Io` if the listing itself fails; there is no work queue without
    ///   it, so callers abort the run.
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, CatalogError>;

    /// Fetches one object's raw bytes.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the key does not exist
    /// - `Io` on any other read failure
    async fn fetch(&self, key: &str) -> Result<Vec<u8>, CatalogError>;
}
