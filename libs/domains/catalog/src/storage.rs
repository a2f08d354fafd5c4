//! Filesystem image store.
//!
//! Uploaded files land in a local directory under generated filenames and
//! are served externally under a fixed base URL prefix. Writing the file
//! and inserting its URL row are two separate steps with separate failure
//! points: a file can exist on disk without a referencing row when the
//! enclosing database transaction rolls back. That leak is accepted and
//! never cleaned up.

use std::path::{Path, PathBuf};

use core_config::{env_or_default, ConfigError, FromEnv};
use uuid::Uuid;

const DEFAULT_DIR: &str = "images";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080/images";

/// Configuration for the image store
#[derive(Debug, Clone)]
pub struct ImageStoreConfig {
    /// Local directory receiving uploaded files
    pub dir: PathBuf,
    /// Base URL under which the directory is served externally
    pub public_url: String,
}

impl Default for ImageStoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_DIR),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }
}

impl FromEnv for ImageStoreConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            dir: PathBuf::from(env_or_default("IMAGES_DIR", DEFAULT_DIR)),
            public_url: env_or_default("IMAGES_PUBLIC_URL", DEFAULT_PUBLIC_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }
}

/// One uploaded image file, as parsed out of a multipart body
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original filename as submitted by the client, if any
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// Filesystem-backed image store with generated filenames.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
    public_url: String,
}

impl ImageStore {
    pub fn new(config: ImageStoreConfig) -> Self {
        Self {
            dir: config.dir,
            public_url: config.public_url,
        }
    }

    /// Write an upload to disk under a fresh filename and return its
    /// public URL.
    ///
    /// The original extension is preserved; uploads without one default
    /// to `.jpg`.
    pub async fn save(&self, upload: &ImageUpload) -> std::io::Result<String> {
        let ext = upload
            .file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .unwrap_or("jpg");

        let file_name = format!("{}.{}", Uuid::new_v4(), ext);
        let path = self.dir.join(&file_name);

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, &upload.data).await?;

        tracing::debug!(path = %path.display(), "Stored uploaded image");
        Ok(format!("{}/{}", self.public_url, file_name))
    }

    /// Delete the local file behind a public URL, if it exists.
    ///
    /// A missing file is not an error; deletion is best-effort.
    pub async fn remove_by_url(&self, url: &str) -> std::io::Result<()> {
        let Some(file_name) = url.rsplit('/').next().filter(|n| !n.is_empty()) else {
            return Ok(());
        };

        let path = self.dir.join(file_name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed image file");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
