//! Image uploads for logos and avatars
//!
//! Objects are stored at `{user_id}/{uuid}.{ext}` inside their bucket.

use arranke_core::{DomainError, UserId};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// An uploaded file as received from the caller
#[derive(Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Extension from the file name, else from the content type
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        from_name.unwrap_or_else(|| {
            match self.content_type.as_str() {
                "image/png" => "png",
                "image/jpeg" => "jpg",
                "image/gif" => "gif",
                "image/webp" => "webp",
                "image/svg+xml" => "svg",
                _ => "bin",
            }
            .to_string()
        })
    }
}

impl std::fmt::Debug for Upload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Upload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Reject anything that is not a non-empty image within `max_bytes`
pub fn validate_image(upload: &Upload, max_bytes: u64) -> ServiceResult<()> {
    if !upload.content_type.starts_with("image/") {
        return Err(DomainError::UnsupportedContentType(upload.content_type.clone()).into());
    }
    if upload.bytes.is_empty() {
        return Err(ServiceError::validation("uploaded file is empty"));
    }
    if upload.size() > max_bytes {
        return Err(DomainError::FileTooLarge { max_bytes }.into());
    }
    Ok(())
}

/// Fresh object path for a user's upload
pub fn object_path(user_id: UserId, upload: &Upload) -> String {
    format!("{user_id}/{}.{}", Uuid::new_v4(), upload.extension())
}

/// Object path inside `bucket` recovered from one of its public URLs
pub fn object_path_from_url(bucket: &str, url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let segments: Vec<&str> = path.split('/').collect();
    let start = segments.iter().position(|s| *s == bucket)? + 1;

    let rest = segments.get(start..)?;
    if rest.is_empty() || rest.iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(rest.join("/"))
}

/// Validate and store an image, returning its public URL
#[instrument(skip(ctx, upload), fields(size = upload.bytes.len()))]
pub(crate) async fn store_image(
    ctx: &ServiceContext,
    bucket: &str,
    user_id: UserId,
    upload: &Upload,
) -> ServiceResult<String> {
    validate_image(upload, ctx.storage_config().max_file_size_bytes())?;

    let path = object_path(user_id, upload);
    ctx.objects()
        .upload(bucket, &path, &upload.bytes, &upload.content_type)
        .await?;

    debug!(%bucket, %path, "Image stored");
    Ok(ctx.objects().public_url(bucket, &path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension() {
        assert_eq!(Upload::new("Logo.PNG", "image/png", vec![1]).extension(), "png");
        assert_eq!(Upload::new("logo", "image/jpeg", vec![1]).extension(), "jpg");
        assert_eq!(Upload::new("weird.", "image/webp", vec![1]).extension(), "webp");
        assert_eq!(Upload::new("x", "image/unknown", vec![1]).extension(), "bin");
    }

    #[test]
    fn test_validate_image() {
        let png = Upload::new("a.png", "image/png", vec![0; 10]);
        assert!(validate_image(&png, 10).is_ok());

        let err = validate_image(&png, 9).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::FileTooLarge { max_bytes: 9 })
        ));

        let pdf = Upload::new("a.pdf", "application/pdf", vec![0; 1]);
        assert!(matches!(
            validate_image(&pdf, 10),
            Err(ServiceError::Domain(DomainError::UnsupportedContentType(_)))
        ));

        let empty = Upload::new("a.png", "image/png", Vec::new());
        assert!(matches!(validate_image(&empty, 10), Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_object_path_layout() {
        let user = UserId::generate();
        let path = object_path(user, &Upload::new("me.jpeg", "image/jpeg", vec![1]));

        let (dir, file) = path.split_once('/').unwrap();
        assert_eq!(dir, user.to_string());
        assert!(file.ends_with(".jpeg"));
        assert!(Uuid::parse_str(file.trim_end_matches(".jpeg")).is_ok());
    }

    #[test]
    fn test_object_path_from_url() {
        assert_eq!(
            object_path_from_url(
                "avatars",
                "https://x.supabase.co/storage/v1/object/public/avatars/u1/abc.png?t=1"
            ),
            Some("u1/abc.png".to_string())
        );
        assert_eq!(
            object_path_from_url("avatars", "memory://storage/avatars/u1/abc.png"),
            Some("u1/abc.png".to_string())
        );
        assert_eq!(object_path_from_url("avatars", "https://cdn/logos/u1/abc.png"), None);
        assert_eq!(object_path_from_url("avatars", "https://cdn/avatars/"), None);
    }
}
