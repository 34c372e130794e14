//! Object store on the local filesystem
//!
//! Objects live at `{upload_dir}/{bucket}/{path}` and are served from
//! `{public_url}/{bucket}/{path}` by whatever fronts the upload directory.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use arranke_core::error::DomainError;
use arranke_core::traits::{ObjectStore, RepoResult};

/// Local storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub public_url: String,
}

impl From<&arranke_common::StorageConfig> for StorageConfig {
    fn from(config: &arranke_common::StorageConfig) -> Self {
        Self {
            upload_dir: PathBuf::from(&config.upload_dir),
            public_url: config.public_url.clone(),
        }
    }
}

/// Filesystem-backed object store
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_url: String,
}

impl LocalObjectStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.upload_dir.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve `bucket/path` under the root, rejecting anything that escapes it
    fn resolve(&self, bucket: &str, path: &str) -> RepoResult<PathBuf> {
        let relative = Path::new(bucket).join(path);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || bucket.is_empty() || path.is_empty() {
            return Err(DomainError::StorageError(format!(
                "invalid object path: {bucket}/{path}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

fn storage_error(e: std::io::Error) -> DomainError {
    DomainError::StorageError(e.to_string())
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> RepoResult<()> {
        let target = self.resolve(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(storage_error)?;
        }
        tokio::fs::write(&target, bytes)
            .await
            .map_err(storage_error)?;

        debug!(path = %target.display(), "Object stored");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, bucket: &str, paths: &[String]) -> RepoResult<()> {
        for path in paths {
            let target = self.resolve(bucket, path)?;
            match tokio::fs::remove_file(&target).await {
                Ok(()) => debug!(path = %target.display(), "Object removed"),
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(path = %target.display(), "Object already gone");
                }
                Err(e) => return Err(storage_error(e)),
            }
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{bucket}/{path}", self.public_url)
    }
}
