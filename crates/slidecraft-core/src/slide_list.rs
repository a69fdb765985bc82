//! Ordered slide collection with a current-slide cursor.

use crate::elements::{Element, ElementKind};
use crate::slide::{CANVAS_SIZE, Slide, SlideId, default_slides};
use kurbo::{Affine, Rect, Size};
use std::collections::HashSet;
use thiserror::Error;

/// Thumbnail colors keyed by element type.
pub const THUMB_TEXT_COLOR: &str = "#3b82f6";
pub const THUMB_IMAGE_COLOR: &str = "#10b981";
pub const THUMB_SHAPE_COLOR: &str = "#8b5cf6";
pub const THUMB_CHART_COLOR: &str = "#f59e0b";

/// Slide list errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlideListError {
    #[error("Cannot delete the last slide")]
    LastSlide,
    #[error("Slide index {index} out of range ({len} slides)")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Reordered list does not hold the same slides")]
    ReorderMismatch,
    #[error("No slide reorder in progress")]
    NoReorder,
}

pub type SlideListResult<T> = Result<T, SlideListError>;

/// One block in a thumbnail, already scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailItem {
    pub rect: Rect,
    pub color: String,
}

/// Simplified projection of a slide for the slide strip.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub slide_id: SlideId,
    pub title: String,
    pub size: Size,
    pub background: String,
    pub is_current: bool,
    pub items: Vec<ThumbnailItem>,
}

/// Ordered, never-empty list of slides plus the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideList {
    slides: Vec<Slide>,
    cursor: usize,
    /// Source index of a drag-reorder in progress.
    reorder_source: Option<usize>,
}

impl Default for SlideList {
    fn default() -> Self {
        Self::new(default_slides())
    }
}

impl SlideList {
    /// Wrap a slide vector; an empty one is seeded with the default slides.
    pub fn new(slides: Vec<Slide>) -> Self {
        let slides = if slides.is_empty() {
            default_slides()
        } else {
            slides
        };
        Self {
            slides,
            cursor: 0,
            reorder_source: None,
        }
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Mutable access to the slides; the count cannot change through it.
    pub fn slides_mut(&mut self) -> &mut [Slide] {
        &mut self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> &Slide {
        &self.slides[self.cursor]
    }

    pub fn current_mut(&mut self) -> &mut Slide {
        &mut self.slides[self.cursor]
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Slide> {
        self.slides.get_mut(index)
    }

    pub fn position(&self, id: SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    pub fn into_slides(self) -> Vec<Slide> {
        self.slides
    }

    fn check(&self, index: usize) -> SlideListResult<()> {
        if index < self.slides.len() {
            Ok(())
        } else {
            Err(SlideListError::IndexOutOfRange {
                index,
                len: self.slides.len(),
            })
        }
    }

    /// Move the cursor.
    pub fn select(&mut self, index: usize) -> SlideListResult<()> {
        self.check(index)?;
        self.cursor = index;
        Ok(())
    }

    /// Replace the whole collection (load, generation, undo). Cursor is
    /// clamped into range.
    pub fn replace(&mut self, slides: Vec<Slide>, cursor: usize) {
        *self = Self::new(slides);
        self.cursor = cursor.min(self.slides.len() - 1);
    }

    /// Append a default content slide and select it.
    pub fn add_slide(&mut self) -> usize {
        self.push(Slide::default_content())
    }

    /// Append a slide and select it.
    pub fn push(&mut self, slide: Slide) -> usize {
        self.slides.push(slide);
        self.cursor = self.slides.len() - 1;
        self.cursor
    }

    /// Deep-copy the slide at `index` right after it and select the copy.
    pub fn duplicate_slide(&mut self, index: usize) -> SlideListResult<usize> {
        self.check(index)?;
        let copy = self.slides[index].duplicate();
        self.slides.insert(index + 1, copy);
        self.cursor = index + 1;
        Ok(self.cursor)
    }

    /// Remove the slide at `index`. The last remaining slide cannot be deleted.
    ///
    /// If the cursor was on the deleted slide it moves to the previous one;
    /// otherwise it is only clamped back into range.
    pub fn delete_slide(&mut self, index: usize) -> SlideListResult<Slide> {
        if self.slides.len() <= 1 {
            log::warn!("Refusing to delete the last slide");
            return Err(SlideListError::LastSlide);
        }
        self.check(index)?;
        let removed = self.slides.remove(index);
        if self.cursor == index {
            self.cursor = index.saturating_sub(1);
        } else if self.cursor >= self.slides.len() {
            self.cursor = self.slides.len() - 1;
        }
        Ok(removed)
    }

    /// Replace the collection with a reordering of the same slides. The
    /// cursor keeps pointing at the same slide.
    pub fn reorder_slides(&mut self, new_order: Vec<Slide>) -> SlideListResult<()> {
        let current_ids: HashSet<SlideId> = self.slides.iter().map(|s| s.id).collect();
        let new_ids: HashSet<SlideId> = new_order.iter().map(|s| s.id).collect();
        let same_slides = new_order.len() == self.slides.len() && new_ids == current_ids;
        if !same_slides {
            return Err(SlideListError::ReorderMismatch);
        }
        let current = self.current().id;
        self.slides = new_order;
        self.cursor = self.position(current).unwrap_or(0);
        Ok(())
    }

    fn swap_keeping_cursor(&mut self, a: usize, b: usize) {
        let current = self.current().id;
        self.slides.swap(a, b);
        self.cursor = self.position(current).unwrap_or(self.cursor);
    }

    /// Swap with the previous slide. No-op on the first slide.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.slides.len() {
            return false;
        }
        self.swap_keeping_cursor(index, index - 1);
        true
    }

    /// Swap with the next slide. No-op on the last slide.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.slides.len() {
            return false;
        }
        self.swap_keeping_cursor(index, index + 1);
        true
    }

    /// Begin dragging the slide at `source`.
    pub fn start_reorder(&mut self, source: usize) -> SlideListResult<()> {
        self.check(source)?;
        self.reorder_source = Some(source);
        Ok(())
    }

    pub fn reorder_source(&self) -> Option<usize> {
        self.reorder_source
    }

    /// Drop the dragged slide at `dest`. Returns whether the order changed.
    pub fn commit_reorder(&mut self, dest: usize) -> SlideListResult<bool> {
        let source = self.reorder_source.take().ok_or(SlideListError::NoReorder)?;
        self.check(dest)?;
        if source == dest {
            return Ok(false);
        }
        let mut order = self.slides.clone();
        let moved = order.remove(source);
        order.insert(dest, moved);
        self.reorder_slides(order)?;
        Ok(true)
    }

    pub fn cancel_reorder(&mut self) {
        self.reorder_source = None;
    }

    /// Thumbnails `width` units wide, preserving the canvas aspect ratio.
    pub fn thumbnails(&self, width: f64) -> Vec<Thumbnail> {
        let scale = width / CANVAS_SIZE.width;
        let transform = Affine::scale(scale);
        self.slides
            .iter()
            .enumerate()
            .map(|(index, slide)| Thumbnail {
                slide_id: slide.id,
                title: slide.title.clone(),
                size: CANVAS_SIZE * scale,
                background: slide.background.flat_color().to_string(),
                is_current: index == self.cursor,
                items: slide
                    .elements
                    .iter()
                    .map(|el| ThumbnailItem {
                        rect: transform.transform_rect_bbox(el.bounds()),
                        color: thumbnail_color(el).to_string(),
                    })
                    .collect(),
            })
            .collect()
    }
}

fn thumbnail_color(element: &Element) -> &str {
    match &element.kind {
        ElementKind::Text(_) => THUMB_TEXT_COLOR,
        ElementKind::Image(_) => THUMB_IMAGE_COLOR,
        ElementKind::Shape(shape) if !shape.fill.is_empty() => shape.fill.as_str(),
        ElementKind::Shape(_) => THUMB_SHAPE_COLOR,
        ElementKind::Chart(_) => THUMB_CHART_COLOR,
    }
}
