//! File-based storage implementation.

use super::{
    BoxFuture, NewSlide, PresentationRecord, SlideRecord, SlideStore, SlideUpdate, StorageError,
    StorageResult, Tables,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Name of the database file inside the storage directory.
pub const DATABASE_FILE: &str = "slides.json";

/// File-based storage.
///
/// Every presentation and slide record lives in one JSON file, read and
/// rewritten whole on each call.
pub struct FileStore {
    /// Base directory for the database file.
    base_path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileStore {
    /// Create a new file store with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self {
            base_path,
            lock: Mutex::new(()),
        })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/slidecraft/`
    /// On Windows: `%LOCALAPPDATA%\slidecraft\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("slidecraft"))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the database file.
    pub fn database_path(&self) -> PathBuf {
        self.base_path.join(DATABASE_FILE)
    }

    fn load_tables(&self, path: &Path) -> StorageResult<Tables> {
        if !path.exists() {
            return Ok(Tables::default());
        }
        let json = fs::read_to_string(path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&json).map_err(|e| {
            StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    fn with_tables<T>(
        &self,
        persist: bool,
        f: impl FnOnce(&mut Tables) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        let path = self.database_path();
        let mut tables = self.load_tables(&path)?;
        let result = f(&mut tables)?;
        if persist {
            let json = serde_json::to_string_pretty(&tables)
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
        }
        Ok(result)
    }
}

impl SlideStore for FileStore {
    fn create_presentation(&self, title: &str) -> BoxFuture<'_, StorageResult<PresentationRecord>> {
        let title = title.to_string();
        Box::pin(async move { self.with_tables(true, |t| Ok(t.create_presentation(&title))) })
    }

    fn update_presentation(&self, id: i64, title: &str) -> BoxFuture<'_, StorageResult<()>> {
        let title = title.to_string();
        Box::pin(async move { self.with_tables(true, |t| t.update_presentation(id, &title)) })
    }

    fn get_presentation(&self, id: i64) -> BoxFuture<'_, StorageResult<PresentationRecord>> {
        Box::pin(async move { self.with_tables(false, |t| t.get_presentation(id)) })
    }

    fn create_slide(&self, slide: NewSlide) -> BoxFuture<'_, StorageResult<SlideRecord>> {
        Box::pin(async move { self.with_tables(true, |t| t.create_slide(slide)) })
    }

    fn update_slide(&self, id: i64, update: SlideUpdate) -> BoxFuture<'_, StorageResult<SlideRecord>> {
        Box::pin(async move { self.with_tables(true, |t| t.update_slide(id, update)) })
    }

    fn delete_slide(&self, id: i64) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move { self.with_tables(true, |t| t.delete_slide(id)) })
    }

    fn list_slides(&self, presentation_id: i64) -> BoxFuture<'_, StorageResult<Vec<SlideRecord>>> {
        Box::pin(async move { self.with_tables(false, |t| Ok(t.list_slides(presentation_id))) })
    }
}
