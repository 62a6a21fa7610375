use crate::models::Document;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("accessing {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("document at {path:?} is malformed: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("encoding document: {0}")]
    Encode(serde_json::Error),
    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// The JSON file holding the whole [`Document`].
///
/// Plain blocking I/O; callers on the async side go through
/// [`super::RecordStore`], which serialises access.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, or the seeded default when the file does not exist yet.
    /// The default is not written back.
    pub fn load(&self) -> Result<Document, StoreError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No document at {:?}, using defaults", self.path);
                return Ok(Document::default());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };
        let doc: Document =
            serde_json::from_slice(&raw).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(
            "Loaded {} shooters and {} ingredients from {:?}",
            doc.shooters.len(),
            doc.ingredients.len(),
            self.path
        );
        Ok(doc)
    }

    /// Overwrite the file with `doc`, pretty-printed.
    ///
    /// The bytes go to a sibling `.tmp` file first and are renamed over the
    /// target, so readers never see a half-written document.
    pub fn save(&self, doc: &Document) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
            }
        }
        let json = serde_json::to_vec_pretty(doc).map_err(StoreError::Encode)?;
        let tmp = self.tmp_path();
        {
            let mut file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
            file.write_all(&json)
                .and_then(|_| file.sync_all())
                .map_err(|e| StoreError::io(&tmp, e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| StoreError::io(&self.path, e))?;
        tracing::debug!("Saved document to {:?} ({} bytes)", self.path, json.len());
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
