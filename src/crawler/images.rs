//! Entry photo download
//!
//! Listing rows reference a thumbnail; the full-size photo lives at the same
//! path without the thumbnail segment. Photos are written to a per-county
//! directory as `{kno}_{name}.jpg`.

use super::fetcher::PageFetcher;
use crate::{FetchError, FetchResult};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Path segment marking a thumbnail reference
pub const THUMBNAIL_SEGMENT: &str = "/thumbs/";

lazy_static! {
    static ref UNSAFE_FILENAME_CHARS: Regex =
        Regex::new(r"[^\w\-_]").expect("Invalid filename regex");
}

/// Errors acquiring one photo
#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Full-size reference for a thumbnail reference
pub fn full_size_image_path(thumbnail: &str) -> String {
    thumbnail.replace(THUMBNAIL_SEGMENT, "/")
}

/// File name for an entry's photo
///
/// Both parts are reduced to word characters and hyphens, so the result is
/// always a single path component.
///
/// # Example
///
/// ```
/// use sor_crawler::crawler::image_file_name;
///
/// assert_eq!(image_file_name("10001", "ADAMS, ALAN"), "10001_ADAMS__ALAN.jpg");
/// ```
pub fn image_file_name(kno: &str, name: &str) -> String {
    let safe_kno = UNSAFE_FILENAME_CHARS.replace_all(kno, "_");
    let safe_name = UNSAFE_FILENAME_CHARS.replace_all(name, "_");
    format!("{}_{}.jpg", safe_kno, safe_name)
}

/// Downloads photos into one county's image directory
#[derive(Debug, Clone)]
pub struct ImageAcquirer {
    dir: PathBuf,
}

impl ImageAcquirer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute full-size URL for a thumbnail reference
    pub fn full_size_url(&self, fetcher: &PageFetcher, thumbnail: &str) -> FetchResult<Url> {
        fetcher.resolve(&full_size_image_path(thumbnail))
    }

    /// Fetches the full-size photo and saves it
    ///
    /// Returns the saved path. The crawl treats any error as "no photo" for
    /// the entry and carries on.
    pub async fn acquire(
        &self,
        fetcher: &PageFetcher,
        thumbnail: &str,
        name: &str,
        kno: &str,
    ) -> Result<PathBuf, ImageError> {
        let url = self.full_size_url(fetcher, thumbnail)?;
        let bytes = fetcher.fetch_bytes(url.as_str()).await?;

        let path = self.dir.join(image_file_name(kno, name));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|source| ImageError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!("Downloaded image: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_size_image_path() {
        assert_eq!(
            full_size_image_path("/sor_id/photos/thumbs/10001.jpg"),
            "/sor_id/photos/10001.jpg"
        );
        assert_eq!(full_size_image_path("photos/10001.jpg"), "photos/10001.jpg");
    }

    #[test]
    fn test_image_file_name_sanitizes() {
        assert_eq!(image_file_name("123", "DOE, JOHN Q."), "123_DOE__JOHN_Q_.jpg");
        assert_eq!(image_file_name("9", "O'NEIL-SMITH"), "9_O_NEIL-SMITH.jpg");
        assert_eq!(image_file_name("9", "../etc/passwd"), "9____etc_passwd.jpg");
    }

    #[test]
    fn test_image_file_name_sanitizes_identifier() {
        assert_eq!(
            image_file_name("../../../tmp/x", "DOE"),
            "_________tmp_x_DOE.jpg"
        );
        assert_eq!(image_file_name("10/01", "DOE"), "10_01_DOE.jpg");

        let acquirer = ImageAcquirer::new("offender_images/bonner");
        let path = acquirer.dir().join(image_file_name("../../../tmp/x", "DOE"));
        assert_eq!(path.parent(), Some(acquirer.dir()));
    }

    #[test]
    fn test_image_file_name_keeps_unicode_letters() {
        assert_eq!(image_file_name("7", "MUÑOZ JOSÉ"), "7_MUÑOZ_JOSÉ.jpg");
    }
}
