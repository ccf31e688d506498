//! Image upload storage.
//!
//! The data layer only stores relative reference paths in `image` columns;
//! bytes go through a [`MediaStorage`] implementation.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::config::AppConfig;
use crate::entities::ContentType;
use crate::errors::ServiceError;

/// Longest reference path that fits the `image` columns.
pub const MAX_IMAGE_PATH_LEN: usize = 100;

/// Numbered variants tried before an upload name is given up on.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Where an upload belongs: `{kind}/{owner}/{file_name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub kind: ContentType,
    pub owner: String,
    pub file_name: String,
}

impl UploadTarget {
    pub fn new(kind: ContentType, owner: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            kind,
            owner: owner.into(),
            file_name: file_name.into(),
        }
    }

    /// Relative reference path, with every segment sanitised.
    pub fn relative_path(&self) -> Result<String, ServiceError> {
        self.candidate_path(0)
    }

    /// Path for the given attempt: `front.jpg`, then `front_1.jpg`,
    /// `front_2.jpg` and so on.
    pub fn candidate_path(&self, attempt: u32) -> Result<String, ServiceError> {
        let owner = sanitize_segment(&self.owner);
        let file_name = sanitize_segment(&self.file_name);

        if owner.is_empty() || file_name.is_empty() {
            return Err(ServiceError::ValidationError(
                "upload target needs a non-empty owner and file name".to_string(),
            ));
        }

        let file_name = if attempt == 0 {
            file_name
        } else {
            numbered(&file_name, attempt)
        };

        let path = format!("{}/{}/{}", self.kind, owner, file_name);
        if path.len() > MAX_IMAGE_PATH_LEN {
            return Err(ServiceError::ValidationError(format!(
                "image path exceeds {} characters",
                MAX_IMAGE_PATH_LEN
            )));
        }
        Ok(path)
    }
}

fn numbered(file_name: &str, n: u32) -> String {
    match file_name.rfind('.') {
        Some(dot) => format!("{}_{}{}", &file_name[..dot], n, &file_name[dot..]),
        None => format!("{}_{}", file_name, n),
    }
}

/// Public URL of a stored reference: `media_url` joined with the path.
pub fn url_for(media_url: &str, reference: &str) -> String {
    format!(
        "{}/{}",
        media_url.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}

/// Keeps ASCII alphanumerics, `-`, `_` and `.`; everything else becomes `_`.
/// Leading dots are dropped so a segment can never be `..`.
pub fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Stores `data` for `target` and returns the retrievable reference path.
    /// An existing file is never overwritten; the returned path is unique.
    async fn store(&self, target: &UploadTarget, data: &[u8]) -> Result<String, ServiceError>;

    /// Removes a previously stored file. Missing files are not an error.
    async fn remove(&self, reference: &str) -> Result<(), ServiceError>;
}

/// Filesystem storage rooted at `media_root`.
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
    root: PathBuf,
}

impl LocalMediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.media_root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, reference: &str) -> Result<PathBuf, ServiceError> {
        let relative = Path::new(reference);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(ServiceError::ValidationError(format!(
                "invalid media reference '{}'",
                reference
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn store(&self, target: &UploadTarget, data: &[u8]) -> Result<String, ServiceError> {
        if data.is_empty() {
            return Err(ServiceError::ValidationError(
                "image payload is empty".to_string(),
            ));
        }

        let first = self.absolute(&target.relative_path()?)?;
        if let Some(parent) = first.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let reference = target.candidate_path(attempt)?;
            let path = self.absolute(&reference)?;

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = write_all(&mut file, data).await {
                if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                    warn!("Failed to remove partial upload {}: {}", reference, cleanup);
                }
                return Err(e.into());
            }

            debug!(reference = %reference, attempt, "Stored media file");
            return Ok(reference);
        }

        Err(ServiceError::Conflict(format!(
            "no free file name left for {}",
            target.file_name
        )))
    }

    #[instrument(skip(self))]
    async fn remove(&self, reference: &str) -> Result<(), ServiceError> {
        let path = self.absolute(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_all(file: &mut tokio::fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    #[test]
    fn sanitize_strips_traversal_and_spaces() {
        assert_eq!(sanitize_segment("../etc/passwd"), "_etc_passwd");
        assert_eq!(sanitize_segment("summer hat.png"), "summer_hat.png");
        assert_eq!(sanitize_segment("..."), "");
    }

    #[test]
    fn relative_path_layout() {
        let target = UploadTarget::new(ContentType::Product, "rain-jacket", "front.jpg");
        assert_eq!(target.relative_path().unwrap(), "product/rain-jacket/front.jpg");
    }

    #[test]
    fn numbered_candidates_keep_the_extension() {
        let target = UploadTarget::new(ContentType::Product, "rain-jacket", "front.jpg");
        assert_eq!(target.candidate_path(2).unwrap(), "product/rain-jacket/front_2.jpg");

        let bare = UploadTarget::new(ContentType::Product, "rain-jacket", "front");
        assert_eq!(bare.candidate_path(1).unwrap(), "product/rain-jacket/front_1");
    }

    #[test]
    fn urls_join_prefix_and_reference() {
        assert_eq!(url_for("/media/", "product/hat/a.png"), "/media/product/hat/a.png");
        assert_eq!(
            url_for("https://cdn.example.com/m", "season/winter/b.png"),
            "https://cdn.example.com/m/season/winter/b.png"
        );
    }

    #[test]
    fn overlong_paths_are_rejected() {
        let target = UploadTarget::new(ContentType::Product, "x".repeat(90), "front.jpg");
        assert_matches!(target.relative_path(), Err(ServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn stores_and_removes_files() {
        let dir = TempDir::new().unwrap();
        let storage = LocalMediaStorage::new(dir.path());
        let target = UploadTarget::new(ContentType::Season, "winter", "banner.png");

        let reference = storage.store(&target, b"png-bytes").await.unwrap();
        assert_eq!(reference, "season/winter/banner.png");

        let written = tokio::fs::read(dir.path().join(&reference)).await.unwrap();
        assert_eq!(written, b"png-bytes");

        storage.remove(&reference).await.unwrap();
        assert!(!dir.path().join(&reference).exists());
        // second removal is a no-op
        storage.remove(&reference).await.unwrap();
    }

    #[tokio::test]
    async fn existing_files_are_never_overwritten() {
        let dir = TempDir::new().unwrap();
        let storage = LocalMediaStorage::new(dir.path());
        let target = UploadTarget::new(ContentType::Product, "rain-jacket", "front.jpg");

        let first = storage.store(&target, b"FIRST").await.unwrap();
        let second = storage.store(&target, b"SECOND").await.unwrap();
        assert_eq!(first, "product/rain-jacket/front.jpg");
        assert_eq!(second, "product/rain-jacket/front_1.jpg");

        assert_eq!(tokio::fs::read(dir.path().join(&first)).await.unwrap(), b"FIRST");
        assert_eq!(tokio::fs::read(dir.path().join(&second)).await.unwrap(), b"SECOND");
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let dir = TempDir::new().unwrap();
        let storage = LocalMediaStorage::new(dir.path());
        let target = UploadTarget::new(ContentType::Product, "hat", "a.png");
        assert_matches!(
            storage.store(&target, b"").await,
            Err(ServiceError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn remove_rejects_escaping_references() {
        let dir = TempDir::new().unwrap();
        let storage = LocalMediaStorage::new(dir.path());
        assert_matches!(
            storage.remove("../outside.png").await,
            Err(ServiceError::ValidationError(_))
        );
    }
}
