//! Document storage
//!
//! The whole recipe book lives in one JSON file. [`RecordStore`] is the single
//! owner of that file: every read and every read-modify-write cycle runs while
//! holding its lock, so overlapping requests cannot lose each other's updates.

mod document_file;

pub use document_file::{DocumentFile, StoreError};

use crate::models::Document;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
pub struct RecordStore {
    file: Arc<DocumentFile>,
    lock: Arc<Mutex<()>>,
}

impl RecordStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            file: Arc::new(DocumentFile::new(path)),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Current document (the seeded default if nothing was saved yet).
    pub async fn load(&self) -> Result<Document, StoreError> {
        let _guard = self.lock.lock().await;
        self.load_blocking().await
    }

    /// Overwrite the persisted document.
    pub async fn save(&self, doc: Document) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        self.save_blocking(doc).await
    }

    /// Run `f` against a freshly loaded document.
    pub async fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Document) -> T,
    {
        let _guard = self.lock.lock().await;
        let doc = self.load_blocking().await?;
        Ok(f(&doc))
    }

    /// Load, mutate and save as one step.
    ///
    /// The document is written back only when `f` succeeds and actually changed it.
    pub async fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Document) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.lock.lock().await;
        let mut doc = self.load_blocking().await?;
        let before = doc.clone();
        let out = f(&mut doc)?;
        if doc != before {
            self.save_blocking(doc).await?;
        } else {
            tracing::debug!("Document unchanged, skipping save");
        }
        Ok(out)
    }

    async fn load_blocking(&self) -> Result<Document, StoreError> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.load()).await?
    }

    async fn save_blocking(&self, doc: Document) -> Result<(), StoreError> {
        let file = Arc::clone(&self.file);
        tokio::task::spawn_blocking(move || file.save(&doc)).await?
    }
}
