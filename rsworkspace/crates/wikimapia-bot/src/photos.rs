//! Photo fetch pipeline
//!
//! Downloads up to `limit` photos of a place into local files. Each file gets
//! the extension of its remote URL because Telegram sniffs the media type
//! from the file name. A failing photo is skipped; the batch never fails.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;
use wikimapia_types::Photo;

use crate::traits::PhotoSource;

/// Default number of photos sent per place
pub const DEFAULT_PHOTO_LIMIT: usize = 3;

const TEMP_PREFIX: &str = "wiki";

/// Why a single photo was skipped
#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("Invalid photo URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Download failed: {0}")]
    Fetch(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to rename downloaded photo: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// A downloaded photo on local disk. The file is removed on drop.
#[derive(Debug)]
pub struct LocalPhoto {
    path: PathBuf,
}

impl LocalPhoto {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LocalPhoto {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!("Failed to remove photo {}: {}", self.path.display(), e);
        }
    }
}

/// Photo fetch pipeline
#[derive(Clone)]
pub struct PhotoPipeline<S> {
    source: S,
    dir: PathBuf,
    limit: usize,
}

impl<S: PhotoSource> PhotoPipeline<S> {
    /// Download into `dir`, at most `limit` photos per call
    pub fn new(source: S, dir: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            source,
            dir: dir.into(),
            limit,
        }
    }

    /// Download photos in order until `limit` succeeded or `photos` ran out.
    pub async fn fetch_up_to(&self, photos: &[Photo]) -> Vec<LocalPhoto> {
        let mut fetched = Vec::with_capacity(self.limit.min(photos.len()));

        for photo in photos {
            if fetched.len() >= self.limit {
                break;
            }
            match self.fetch_one(&photo.big_url).await {
                Ok(local) => fetched.push(local),
                Err(e) => warn!("Skipping photo {}: {}", photo.big_url, e),
            }
        }

        debug!("Fetched {} of {} photos", fetched.len(), photos.len());
        fetched
    }

    async fn fetch_one(&self, remote_url: &str) -> Result<LocalPhoto, PhotoError> {
        let parsed = Url::parse(remote_url)?;
        let extension = extension_of(parsed.path());

        let temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.dir)?;

        let body = self
            .source
            .fetch(remote_url)
            .await
            .map_err(|e| PhotoError::Fetch(e.to_string()))?;
        tokio::fs::write(temp.path(), &body).await?;

        let mut final_name = OsString::from(temp.path().as_os_str());
        final_name.push(&extension);
        let path = PathBuf::from(final_name);

        // Persisting closes the handle and renames; the temp file is gone on error.
        temp.persist(&path)?;

        Ok(LocalPhoto { path })
    }
}

/// Extension of the last path segment, with its leading dot, or "".
pub fn extension_of(url_path: &str) -> String {
    Path::new(url_path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockPhotoSource;

    fn photo(url: &str) -> Photo {
        Photo {
            big_url: url.to_string(),
        }
    }

    fn numbered(n: usize) -> Vec<Photo> {
        (1..=n)
            .map(|i| photo(&format!("http://photos.wikimapia.org/p/{}_big.jpg", i)))
            .collect()
    }

    fn read(local: &LocalPhoto) -> String {
        std::fs::read_to_string(local.path()).unwrap()
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/p/00/01/1_big.jpg"), ".jpg");
        assert_eq!(extension_of("/a/b.c/photo.PNG"), ".PNG");
        assert_eq!(extension_of("/p/noext"), "");
        assert_eq!(extension_of("/"), "");
        assert_eq!(extension_of(""), "");
    }

    #[tokio::test]
    async fn test_skips_failures_and_stops_at_limit() {
        let dir = tempfile::tempdir().unwrap();
        let photos = numbered(5);
        let source = MockPhotoSource::new()
            .failing(&photos[1].big_url)
            .failing(&photos[3].big_url);
        let pipeline = PhotoPipeline::new(source.clone(), dir.path(), 3);

        let fetched = pipeline.fetch_up_to(&photos).await;

        assert_eq!(fetched.len(), 3);
        assert_eq!(read(&fetched[0]), photos[0].big_url);
        assert_eq!(read(&fetched[1]), photos[2].big_url);
        assert_eq!(read(&fetched[2]), photos[4].big_url);
        assert_eq!(source.attempts().len(), 5);
    }

    #[tokio::test]
    async fn test_never_attempts_beyond_limit() {
        let dir = tempfile::tempdir().unwrap();
        let photos = numbered(8);
        let source = MockPhotoSource::new();
        let pipeline = PhotoPipeline::new(source.clone(), dir.path(), 3);

        let fetched = pipeline.fetch_up_to(&photos).await;

        assert_eq!(fetched.len(), 3);
        assert_eq!(
            source.attempts(),
            photos[..3].iter().map(|p| p.big_url.clone()).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_files_carry_remote_extension() {
        let dir = tempfile::tempdir().unwrap();
        let photos = vec![
            photo("http://photos.wikimapia.org/p/1_big.png?x=1"),
            photo("http://photos.wikimapia.org/p/2_big"),
        ];
        let pipeline = PhotoPipeline::new(MockPhotoSource::new(), dir.path(), 3);

        let fetched = pipeline.fetch_up_to(&photos).await;

        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].path().extension().unwrap(), "png");
        assert!(fetched[0].path().starts_with(dir.path()));
        assert!(fetched[1].path().extension().is_none());
    }

    #[tokio::test]
    async fn test_invalid_url_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let photos = vec![photo("not a url"), photo("http://photos.wikimapia.org/p/ok.jpg")];
        let source = MockPhotoSource::new();
        let pipeline = PhotoPipeline::new(source.clone(), dir.path(), 3);

        let fetched = pipeline.fetch_up_to(&photos).await;

        assert_eq!(fetched.len(), 1);
        assert_eq!(source.attempts(), vec!["http://photos.wikimapia.org/p/ok.jpg".to_string()]);
    }

    #[tokio::test]
    async fn test_no_photos() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = PhotoPipeline::new(MockPhotoSource::new(), dir.path(), 3);
        assert!(pipeline.fetch_up_to(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_download_leaves_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let photos = numbered(2);
        let source = MockPhotoSource::new()
            .failing(&photos[0].big_url)
            .failing(&photos[1].big_url);
        let pipeline = PhotoPipeline::new(source, dir.path(), 3);

        assert!(pipeline.fetch_up_to(&photos).await.is_empty());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_dropping_photo_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = PhotoPipeline::new(MockPhotoSource::new(), dir.path(), 3);

        let fetched = pipeline.fetch_up_to(&numbered(1)).await;
        let path = fetched[0].path().to_path_buf();
        assert!(path.exists());

        drop(fetched);
        assert!(!path.exists());
    }
}
