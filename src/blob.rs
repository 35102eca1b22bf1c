//! Blob storage collaborator: named byte blobs that can be stored, streamed
//! back and listed. [`DirBlobStore`] keeps one file per key in a directory.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob '{0}' not found")]
    NotFound(String),
    #[error("invalid blob key '{0}'")]
    InvalidKey(String),
    #[error("blob store i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type BlobReader = Box<dyn Read + Send>;

pub trait BlobStore: Send + Sync {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), BlobError>;
    /// Streams the blob body; the caller reads it forward once.
    fn get(&self, key: &str) -> Result<BlobReader, BlobError>;
    fn list(&self) -> Result<Vec<String>, BlobError>;
}

/// Key for a freshly uploaded file: `<stem>-<uuid><.ext>`, so repeated
/// uploads of the same name never collide.
pub fn object_key(original_name: &str) -> String {
    let path = Path::new(original_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    format!("{stem}-{}{ext}", Uuid::new_v4())
}

fn validate_key(key: &str) -> Result<(), BlobError> {
    let bad = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\', '\0']);
    if bad {
        return Err(BlobError::InvalidKey(key.to_string()));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct DirBlobStore {
    root: PathBuf,
}

impl DirBlobStore {
    /// Opens (creating if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, BlobError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, BlobError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

impl BlobStore for DirBlobStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> Result<(), BlobError> {
        let path = self.path_for(key)?;
        fs::write(&path, bytes)?;
        debug!(key, bytes = bytes.len(), content_type, "blob stored");
        Ok(())
    }

    fn get(&self, key: &str) -> Result<BlobReader, BlobError> {
        let path = self.path_for(key)?;
        match File::open(&path) {
            Ok(f) => {
                debug!(key, "blob opened");
                Ok(Box::new(f))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(BlobError::NotFound(key.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<String>, BlobError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                keys.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }
}
