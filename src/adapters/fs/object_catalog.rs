//! Local filesystem implementation of ObjectCatalog.
//!
//! A directory stands in for the bucket: keys are paths relative to the
//! root, and last-modified times come from file metadata. Useful for
//! development and for mirroring a bucket to disk; an S3-backed adapter
//! would implement the same port.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use crate::domain::foundation::Timestamp;
use crate::ports::{CatalogError, ObjectCatalog, ObjectInfo};

/// Object catalog backed by a local directory.
#[derive(Debug, Clone)]
pub struct FsObjectCatalog {
    /// Bucket root directory.
    root: PathBuf,
}

impl FsObjectCatalog {
    /// Creates a catalog rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

#[async_trait]
impl ObjectCatalog for FsObjectCatalog {
    async fn list(&self, prefix: &str) -> Result<Vec<ObjectInfo>, CatalogError> {
        let dir = self.object_path(prefix);

        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            // A prefix nothing was ever written under lists as empty.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CatalogError::Io(format!(
                    "failed to list {}: {}",
                    dir.display(),
                    e
                )))
            }
        };

        let mut objects = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(|e| {
            CatalogError::Io(format!("failed to read entry under {}: {}", dir.display(), e))
        })? {
            let metadata = entry.metadata().await.map_err(|e| {
                CatalogError::Io(format!(
                    "failed to stat {}: {}",
                    entry.path().display(),
                    e
                ))
            })?;
            if !metadata.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix.trim_end_matches('/'), name)
            };

            let modified = metadata
                .modified()
                .map(|t| Timestamp::from_datetime(DateTime::<Utc>::from(t)))
                .unwrap_or_default();

            objects.push(ObjectInfo {
                key,
                last_modified: modified,
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        debug!(prefix, count = objects.len(), "listed catalog objects");
        Ok(objects)
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>, CatalogError> {
        let path = self.object_path(key);

        fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => CatalogError::NotFound(key.to_string()),
            _ => CatalogError::Io(format!("failed to read {}: {}", path.display(), e)),
        })
    }
}
