//! In-memory object store

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use arranke_core::traits::{ObjectStore, RepoResult};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    content_type: String,
}

/// Object store keeping uploads in a map keyed by `bucket/path`
#[derive(Debug)]
pub struct MemoryObjectStore {
    base_url: String,
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    pub fn contains(&self, bucket: &str, path: &str) -> bool {
        self.objects.lock().contains_key(&key(bucket, path))
    }

    pub fn content_type(&self, bucket: &str, path: &str) -> Option<String> {
        self.objects
            .lock()
            .get(&key(bucket, path))
            .map(|o| o.content_type.clone())
    }

    pub fn size(&self, bucket: &str, path: &str) -> Option<usize> {
        self.objects
            .lock()
            .get(&key(bucket, path))
            .map(|o| o.bytes.len())
    }

    pub fn len(&self) -> usize {
        self.objects.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new("memory://storage")
    }
}

fn key(bucket: &str, path: &str) -> String {
    format!("{bucket}/{path}")
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> RepoResult<()> {
        self.objects.lock().insert(
            key(bucket, path),
            StoredObject {
                bytes: bytes.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> RepoResult<()> {
        let mut objects = self.objects.lock();
        for path in paths {
            objects.remove(&key(bucket, path));
        }
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{bucket}/{path}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_remove() {
        let store = MemoryObjectStore::new("http://cdn.test/");
        store
            .upload("logos", "u/1.png", b"png", "image/png")
            .await
            .unwrap();

        assert!(store.contains("logos", "u/1.png"));
        assert_eq!(store.public_url("logos", "u/1.png"), "http://cdn.test/logos/u/1.png");

        store
            .remove("logos", &["u/1.png".to_string(), "missing".to_string()])
            .await
            .unwrap();
        assert!(store.is_empty());
    }
}
