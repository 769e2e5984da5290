//! In-memory implementation of ObjectCatalog.
//!
//! Holds objects in a map. Useful for testing and development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{CatalogError, ObjectCatalog, ObjectInfo};

/// Object catalog holding everything in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryObjectCatalog {
    objects: Arc<RwLock<HashMap<String, (Timestamp, Vec<u8>)>>>,
}

impl InMemoryObjectCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an object.
    pub async fn put(&self, key: impl Into<String>, last_modified: Timestamp, bytes: impl Into<Vec<u8>>) {
        self.objects
            .write()
            .await
            .insert(key.into(), (last_modified, bytes.into()));
    }

    /// Number of stored objects.
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    /// Whether the catalog holds no objects.
    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait]
impl ObjectCatalog for InMemoryObjectCatalog {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, CatalogError> {
        let objects = self.objects.read().await;
        let mut listed: Vec<ObjectInfo> = objects
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, (last_modified, _))| ObjectInfo {
                key: key.clone(),
                last_modified: *last_modified,
            })
            .collect();
        listed.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(listed)
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, CatalogError> {
        self.objects
            .read()
            .await
            .get(key)
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }
}
