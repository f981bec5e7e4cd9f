//! Favicon persistence helpers
//!
//! Downloading a resolved icon and writing its bytes through a pluggable
//! blob-storage backend. The file extension is guessed from the icon URL's
//! suffix when it is one of the well-known icon formats, otherwise from the
//! response's `content-type` header.

use crate::favicon::Favicon;
use crate::FetchError;
use reqwest::Client;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Extensions that are trusted when they appear as the icon URL's suffix.
const TRUSTED_EXTENSIONS: &[&str] = &["ico", "png", "svg"];

/// Maps a `content-type` header value to a file extension.
fn extension_from_mime(mime: &str) -> Option<&'static str> {
    match mime {
        "image/x-icon" | "image/x-ico" | "image/vnd.microsoft.icon" => Some("ico"),
        "image/jpeg" | "image/pjpeg" => Some("jpeg"),
        "image/png" | "image/x-png" => Some("png"),
        "image/svg+xml" => Some("svg"),
        _ => None,
    }
}

/// Extracts the extension from a URL's path suffix, if any.
fn extension_from_url(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next()?;

    match segment.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// A blob-storage backend that persists icon bytes under a path.
pub trait BlobStorage: Send + Sync {
    /// Writes `contents` under `path`, overwriting any existing blob.
    fn put(&self, path: &str, contents: &[u8]) -> io::Result<()>;
}

/// Blob storage rooted at a local directory.
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BlobStorage for DiskStorage {
    fn put(&self, path: &str, contents: &[u8]) -> io::Result<()> {
        let full = self.root.join(path);

        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full, contents)
    }
}

impl Favicon {
    /// Downloads the favicon file's contents.
    pub async fn content(&self, http: &Client) -> crate::Result<Vec<u8>> {
        let response = http
            .get(self.favicon_url())
            .send()
            .await
            .map_err(|e| FetchError::Connection {
                url: self.favicon_url().to_string(),
                source: e,
            })?;

        Ok(response.bytes().await?.to_vec())
    }

    /// Downloads the favicon and persists it as
    /// `<directory>/<filename>.<ext>` in the given storage backend,
    /// returning the path written.
    pub async fn store_as(
        &self,
        directory: &str,
        filename: &str,
        storage: &dyn BlobStorage,
        http: &Client,
    ) -> crate::Result<String> {
        let extension = self.guess_extension(http).await?;

        let path = if extension.is_empty() {
            format!("{}/{}", directory, filename)
        } else {
            format!("{}/{}.{}", directory, filename, extension)
        };

        let contents = self.content(http).await?;
        storage.put(&path, &contents)?;

        Ok(path)
    }

    /// Guesses the stored file's extension.
    ///
    /// The URL suffix wins when it is a well-known icon format; otherwise the
    /// icon response's `content-type` header is consulted, falling back to
    /// whatever the URL suffix was.
    async fn guess_extension(&self, http: &Client) -> crate::Result<String> {
        let url_extension = extension_from_url(self.favicon_url()).unwrap_or("");

        if TRUSTED_EXTENSIONS.contains(&url_extension) {
            return Ok(url_extension.to_string());
        }

        let response = http
            .get(self.favicon_url())
            .send()
            .await
            .map_err(|e| FetchError::Connection {
                url: self.favicon_url().to_string(),
                source: e,
            })?;

        let mime = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        Ok(extension_from_mime(&mime)
            .map(str::to_string)
            .unwrap_or_else(|| url_extension.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_from_url() {
        assert_eq!(
            extension_from_url("https://example.com/favicon.ico"),
            Some("ico")
        );
        assert_eq!(
            extension_from_url("https://example.com/icon.png?v=2"),
            Some("png")
        );
        assert_eq!(extension_from_url("https://example.com/icon"), None);
        assert_eq!(extension_from_url("https://example.com/"), None);
    }

    #[test]
    fn test_extension_from_mime() {
        assert_eq!(extension_from_mime("image/x-icon"), Some("ico"));
        assert_eq!(extension_from_mime("image/vnd.microsoft.icon"), Some("ico"));
        assert_eq!(extension_from_mime("image/png"), Some("png"));
        assert_eq!(extension_from_mime("image/svg+xml"), Some("svg"));
        assert_eq!(extension_from_mime("text/html"), None);
    }

    #[test]
    fn test_disk_storage_writes_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DiskStorage::new(dir.path());

        storage.put("icons/example.ico", b"icon-bytes").unwrap();

        let written = fs::read(dir.path().join("icons/example.ico")).unwrap();
        assert_eq!(written, b"icon-bytes");
    }
}
