//! Storage abstraction for slide persistence.
//!
//! The store knows nothing about elements: a slide is a flat record with a
//! text `content` column (written by [`crate::bridge`]) and a redundant
//! `background_color` column for consumers that only read colors.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A stored slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideRecord {
    pub id: i64,
    pub presentation_id: i64,
    /// 1-based position within the presentation.
    pub slide_number: u32,
    pub content: String,
    pub background_color: String,
}

/// Fields for creating a slide record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSlide {
    pub presentation_id: i64,
    pub slide_number: u32,
    pub content: String,
    pub background_color: String,
}

/// Fields for updating a slide record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideUpdate {
    pub slide_number: u32,
    pub content: String,
    pub background_color: String,
}

/// A stored presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationRecord {
    pub id: i64,
    pub title: String,
}

/// Persistence collaborator for presentations and their slide records.
///
/// Implementations must be Send + Sync; calls are issued one at a time by
/// the editor's save and load flows.
pub trait SlideStore: Send + Sync {
    fn create_presentation(&self, title: &str) -> BoxFuture<'_, StorageResult<PresentationRecord>>;

    fn update_presentation(&self, id: i64, title: &str) -> BoxFuture<'_, StorageResult<()>>;

    fn get_presentation(&self, id: i64) -> BoxFuture<'_, StorageResult<PresentationRecord>>;

    fn create_slide(&self, slide: NewSlide) -> BoxFuture<'_, StorageResult<SlideRecord>>;

    fn update_slide(&self, id: i64, update: SlideUpdate) -> BoxFuture<'_, StorageResult<SlideRecord>>;

    fn delete_slide(&self, id: i64) -> BoxFuture<'_, StorageResult<()>>;

    /// Slides of a presentation ordered by slide number.
    fn list_slides(&self, presentation_id: i64) -> BoxFuture<'_, StorageResult<Vec<SlideRecord>>>;
}

/// Record tables shared by the built-in backends.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    next_id: i64,
    presentations: BTreeMap<i64, PresentationRecord>,
    slides: BTreeMap<i64, SlideRecord>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn create_presentation(&mut self, title: &str) -> PresentationRecord {
        let record = PresentationRecord {
            id: self.allocate_id(),
            title: title.to_string(),
        };
        self.presentations.insert(record.id, record.clone());
        record
    }

    fn presentation_mut(&mut self, id: i64) -> StorageResult<&mut PresentationRecord> {
        self.presentations
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("presentation {id}")))
    }

    fn update_presentation(&mut self, id: i64, title: &str) -> StorageResult<()> {
        self.presentation_mut(id)?.title = title.to_string();
        Ok(())
    }

    fn get_presentation(&mut self, id: i64) -> StorageResult<PresentationRecord> {
        self.presentation_mut(id).map(|p| p.clone())
    }

    fn create_slide(&mut self, slide: NewSlide) -> StorageResult<SlideRecord> {
        self.presentation_mut(slide.presentation_id)?;
        let record = SlideRecord {
            id: self.allocate_id(),
            presentation_id: slide.presentation_id,
            slide_number: slide.slide_number,
            content: slide.content,
            background_color: slide.background_color,
        };
        self.slides.insert(record.id, record.clone());
        Ok(record)
    }

    fn update_slide(&mut self, id: i64, update: SlideUpdate) -> StorageResult<SlideRecord> {
        let record = self
            .slides
            .get_mut(&id)
            .ok_or_else(|| StorageError::NotFound(format!("slide {id}")))?;
        record.slide_number = update.slide_number;
        record.content = update.content;
        record.background_color = update.background_color;
        Ok(record.clone())
    }

    fn delete_slide(&mut self, id: i64) -> StorageResult<()> {
        self.slides
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(format!("slide {id}")))
    }

    fn list_slides(&self, presentation_id: i64) -> Vec<SlideRecord> {
        let mut slides: Vec<SlideRecord> = self
            .slides
            .values()
            .filter(|s| s.presentation_id == presentation_id)
            .cloned()
            .collect();
        slides.sort_by_key(|s| (s.slide_number, s.id));
        slides
    }
}

/// Simple blocking executor for tests.
#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        match f.as_mut().poll(&mut cx) {
            Poll::Ready(result) => return result,
            Poll::Pending => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_slide(presentation_id: i64, slide_number: u32) -> NewSlide {
        NewSlide {
            presentation_id,
            slide_number,
            content: format!("slide {slide_number}"),
            background_color: "#ffffff".into(),
        }
    }

    #[test]
    fn test_tables_assign_increasing_ids() {
        let mut tables = Tables::default();
        let p = tables.create_presentation("Deck");
        let a = tables.create_slide(new_slide(p.id, 1)).unwrap();
        let b = tables.create_slide(new_slide(p.id, 2)).unwrap();
        assert!(a.id > p.id);
        assert!(b.id > a.id);
    }

    #[test]
    fn test_slide_needs_presentation() {
        let mut tables = Tables::default();
        assert!(matches!(
            tables.create_slide(new_slide(99, 1)),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_is_ordered_by_slide_number() {
        let mut tables = Tables::default();
        let p = tables.create_presentation("Deck");
        let other = tables.create_presentation("Other");
        tables.create_slide(new_slide(p.id, 2)).unwrap();
        tables.create_slide(new_slide(p.id, 1)).unwrap();
        tables.create_slide(new_slide(other.id, 1)).unwrap();
        let numbers: Vec<_> = tables.list_slides(p.id).iter().map(|s| s.slide_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_update_and_delete_missing_slide() {
        let mut tables = Tables::default();
        let update = SlideUpdate {
            slide_number: 1,
            content: String::new(),
            background_color: String::new(),
        };
        assert!(matches!(tables.update_slide(5, update), Err(StorageError::NotFound(_))));
        assert!(matches!(tables.delete_slide(5), Err(StorageError::NotFound(_))));
    }
}
