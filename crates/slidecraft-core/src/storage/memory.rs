//! In-memory storage implementation.

use super::{
    BoxFuture, NewSlide, PresentationRecord, SlideRecord, SlideStore, SlideUpdate, StorageError,
    StorageResult, Tables,
};
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> StorageResult<T>) -> StorageResult<T> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        f(&mut tables)
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> StorageResult<T> {
        let tables = self
            .tables
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(f(&tables))
    }
}

impl SlideStore for MemoryStore {
    fn create_presentation(&self, title: &str) -> BoxFuture<'_, StorageResult<PresentationRecord>> {
        let title = title.to_string();
        Box::pin(async move { self.write(|t| Ok(t.create_presentation(&title))) })
    }

    fn update_presentation(&self, id: i64, title: &str) -> BoxFuture<'_, StorageResult<()>> {
        let title = title.to_string();
        Box::pin(async move { self.write(|t| t.update_presentation(id, &title)) })
    }

    fn get_presentation(&self, id: i64) -> BoxFuture<'_, StorageResult<PresentationRecord>> {
        Box::pin(async move { self.write(|t| t.get_presentation(id)) })
    }

    fn create_slide(&self, slide: NewSlide) -> BoxFuture<'_, StorageResult<SlideRecord>> {
        Box::pin(async move { self.write(|t| t.create_slide(slide)) })
    }

    fn update_slide(&self, id: i64, update: SlideUpdate) -> BoxFuture<'_, StorageResult<SlideRecord>> {
        Box::pin(async move { self.write(|t| t.update_slide(id, update)) })
    }

    fn delete_slide(&self, id: i64) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move { self.write(|t| t.delete_slide(id)) })
    }

    fn list_slides(&self, presentation_id: i64) -> BoxFuture<'_, StorageResult<Vec<SlideRecord>>> {
        Box::pin(async move { self.read(|t| t.list_slides(presentation_id)) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;

    #[test]
    fn test_presentation_roundtrip() {
        let store = MemoryStore::new();
        let created = block_on(store.create_presentation("Deck")).unwrap();
        block_on(store.update_presentation(created.id, "Renamed")).unwrap();
        let loaded = block_on(store.get_presentation(created.id)).unwrap();
        assert_eq!(loaded.title, "Renamed");
    }

    #[test]
    fn test_not_found() {
        let store = MemoryStore::new();
        let result = block_on(store.get_presentation(12));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_slide_lifecycle() {
        let store = MemoryStore::new();
        let deck = block_on(store.create_presentation("Deck")).unwrap();
        let slide = block_on(store.create_slide(NewSlide {
            presentation_id: deck.id,
            slide_number: 1,
            content: "hello".into(),
            background_color: "#ffffff".into(),
        }))
        .unwrap();

        let updated = block_on(store.update_slide(
            slide.id,
            SlideUpdate {
                slide_number: 2,
                content: "bye".into(),
                background_color: "#000000".into(),
            },
        ))
        .unwrap();
        assert_eq!(updated.content, "bye");

        let listed = block_on(store.list_slides(deck.id)).unwrap();
        assert_eq!(listed, vec![updated]);

        block_on(store.delete_slide(slide.id)).unwrap();
        assert!(block_on(store.list_slides(deck.id)).unwrap().is_empty());
        assert!(block_on(store.delete_slide(slide.id)).is_err());
    }
}
