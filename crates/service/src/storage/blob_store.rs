use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not allocate a unique file name after {0} attempts")]
    NameExhausted(u32),
}

/// Durable storage for uploaded files. Implementations own file naming and
/// return the path under which the stored file can be fetched.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, BlobError>;
}

const MAX_NAME_ATTEMPTS: u32 = 32;

/// Filesystem blob store. Files are named `<unix-nanos><.ext>` inside `root`
/// and addressed as `<url_prefix>/<file name>`.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalBlobStore {
    /// Create the store, creating `root` when missing.
    pub async fn new<P: Into<PathBuf>>(root: P, url_prefix: &str) -> Result<Self, BlobError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root, url_prefix: url_prefix.trim_end_matches('/').to_string() })
    }

    fn now_nanos() -> u128 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default()
    }
}

/// Extension of the uploaded name including the dot, restricted to ASCII alphanumerics.
pub fn file_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.len() <= 16 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

/// Write `bytes` through `writer`; on failure the empty or partial file at `path` is removed.
async fn write_or_remove<W: AsyncWrite + Unpin>(mut writer: W, path: &Path, bytes: &[u8]) -> Result<(), BlobError> {
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;
    if let Err(e) = written {
        drop(writer);
        if let Err(rm) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %rm, "failed to remove partial blob");
        }
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, BlobError> {
        let ext = file_extension(original_name);
        let mut stamp = Self::now_nanos();
        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = format!("{stamp}{ext}");
            let path = self.root.join(&file_name);
            // create_new 保证并发上传不会覆盖同名文件
            let file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(f) => f,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    stamp += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            write_or_remove(file, &path, &bytes).await?;
            debug!(%file_name, "blob stored");
            return Ok(format!("{}/{}", self.url_prefix, file_name));
        }
        Err(BlobError::NameExhausted(MAX_NAME_ATTEMPTS))
    }
}

/// In-memory blob store for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryBlobStore {
        blobs: Mutex<HashMap<String, Vec<u8>>>,
        fail: bool,
    }

    impl MemoryBlobStore {
        /// A store whose every write fails.
        pub fn failing() -> Self { Self { fail: true, ..Default::default() } }

        pub fn len(&self) -> usize { self.blobs.lock().unwrap().len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        pub fn get(&self, reference: &str) -> Option<Vec<u8>> {
            self.blobs.lock().unwrap().get(reference).cloned()
        }
    }

    #[async_trait]
    impl BlobStore for MemoryBlobStore {
        async fn put(&self, original_name: &str, bytes: Vec<u8>) -> Result<String, BlobError> {
            if self.fail {
                return Err(BlobError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")));
            }
            let mut blobs = self.blobs.lock().unwrap();
            let reference = format!("/uploads/{}{}", blobs.len() + 1, file_extension(original_name));
            blobs.insert(reference.clone(), bytes);
            Ok(reference)
        }
    }
}
