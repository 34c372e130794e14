//! Object storage capability for uploaded images

use async_trait::async_trait;

use super::RepoResult;

pub const LOGOS_BUCKET: &str = "logos";
pub const AVATARS_BUCKET: &str = "avatars";

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` at `bucket/path`
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> RepoResult<()>;

    /// Remove objects; missing objects are not an error
    async fn remove(&self, bucket: &str, paths: &[String]) -> RepoResult<()>;

    /// Public URL for `bucket/path`
    fn public_url(&self, bucket: &str, path: &str) -> String;
}
