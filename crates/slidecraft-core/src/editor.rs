//! Editor controller.
//!
//! [`Editor`] owns the whole document (presentation, slides, cursor), the
//! canvas interaction state and the undo history. The canvas engine and the
//! slide list operate on slices of it; every change they report flows back
//! through here so history, the unsaved-changes flag and notices stay in
//! step.
//!
//! Saving is split in three so editing can continue while I/O is in flight:
//! [`Editor::prepare_save`] snapshots the document, [`SavePlan::execute`]
//! runs the per-slide store calls one after another, and
//! [`Editor::finish_save`] applies the outcome. The batch is not atomic:
//! every call is attempted, failures are collected, and a retry only redoes
//! what is still outstanding.

use crate::bridge::{self, EncodedSlide};
use crate::canvas::{CanvasInteraction, RenderItem};
use crate::config::EditorConfig;
use crate::elements::{Element, ElementId, ElementStyle};
use crate::generate::{GenerationError, GenerationRequest, OutlineGenerator, outlines_to_slides};
use crate::history::History;
use crate::presentation::Presentation;
use crate::selection::Handle;
use crate::slide::{Background, Slide, SlideId, Transition};
use crate::slide_list::{SlideListError, Thumbnail};
use crate::storage::{NewSlide, SlideStore, SlideUpdate, StorageError};
use crate::theme::find_theme;
use crate::tools::ToolKind;
use kurbo::{Point, Vec2};
use std::collections::BTreeSet;
use thiserror::Error;

/// Editor errors.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    SlideList(#[from] SlideListError),
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
    #[error("No element selected")]
    NoSelection,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("Save incomplete: {failed} of {attempted} operations failed")]
    PartialSave { failed: usize, attempted: usize },
}

pub type EditorResult<T> = Result<T, EditorError>;

/// Severity of a user-visible notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A message the UI should show once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Undoable document state.
#[derive(Debug, Clone)]
struct Snapshot {
    title: String,
    slides: Vec<Slide>,
    cursor: usize,
}

/// The editor root.
pub struct Editor {
    config: EditorConfig,
    presentation: Presentation,
    canvas: CanvasInteraction,
    history: History<Snapshot>,
    /// Slide ids the store is known to hold for this presentation.
    persisted_ids: BTreeSet<i64>,
    dirty: bool,
    /// Bumped on every change; lets a finished save tell whether it is stale.
    revision: u64,
    notices: Vec<Notice>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// A new, unsaved presentation with the two default slides.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            canvas: CanvasInteraction::new(&config),
            history: History::new(config.undo_depth),
            presentation: Presentation::default(),
            persisted_ids: BTreeSet::new(),
            dirty: false,
            revision: 0,
            notices: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn slides(&self) -> &[Slide] {
        self.presentation.slides.slides()
    }

    pub fn current_slide(&self) -> &Slide {
        self.presentation.slides.current()
    }

    pub fn cursor(&self) -> usize {
        self.presentation.slides.cursor()
    }

    pub fn canvas(&self) -> &CanvasInteraction {
        &self.canvas
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Drain queued notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn notify(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    fn mark_changed(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            title: self.presentation.title.clone(),
            slides: self.slides().to_vec(),
            cursor: self.cursor(),
        }
    }

    fn record_undo(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    fn restore(&mut self, snapshot: Snapshot) {
        let mut slides = snapshot.slides;
        // A slide whose record was deleted by a save must be created again.
        for slide in &mut slides {
            if let SlideId::Persisted(id) = slide.id {
                if !self.persisted_ids.contains(&id) {
                    log::debug!("Restored slide {id} is no longer stored; saving it as new");
                    slide.id = SlideId::new_local();
                }
            }
        }
        self.presentation.title = snapshot.title;
        self.presentation.slides.replace(slides, snapshot.cursor);
        let elements = &self.presentation.slides.current().elements;
        self.canvas.sync(elements);
        self.mark_changed();
    }

    /// Store an element list reported by the canvas.
    fn apply_elements(&mut self, update: Option<Vec<Element>>, record: bool) -> bool {
        let Some(elements) = update else {
            return false;
        };
        if record {
            self.record_undo();
        }
        self.presentation.slides.current_mut().elements = elements;
        self.mark_changed();
        true
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.record_undo();
        self.presentation.title = title.into();
        self.mark_changed();
    }

    // --- Undo / redo ---

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> bool {
        self.finish_text_edit();
        let current = self.snapshot();
        match self.history.undo(current) {
            Some(previous) => {
                self.restore(previous);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.finish_text_edit();
        let current = self.snapshot();
        match self.history.redo(current) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    // --- Zoom ---

    pub fn zoom(&self) -> f64 {
        self.canvas.camera.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.canvas.camera.set_zoom(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.canvas.camera.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.canvas.camera.zoom_out();
    }

    pub fn reset_zoom(&mut self) {
        self.canvas.camera.reset();
    }

    pub fn set_snap_rotation(&mut self, snap: bool) {
        self.canvas.snap_rotation = snap;
    }

    // --- Canvas ---

    pub fn pointer_down(&mut self, screen: Point) {
        let update = self
            .canvas
            .pointer_down(&self.presentation.slides.current().elements, screen);
        self.apply_elements(update, true);
        if self.canvas.state().is_gesture() {
            let snapshot = self.snapshot();
            self.history.begin(snapshot);
        }
    }

    pub fn pointer_move(&mut self, screen: Point) -> bool {
        let update = self
            .canvas
            .pointer_move(&self.presentation.slides.current().elements, screen);
        if update.is_some() {
            self.history.commit_pending();
        }
        self.apply_elements(update, false)
    }

    pub fn pointer_up(&mut self, screen: Point) -> bool {
        let update = self
            .canvas
            .pointer_up(&self.presentation.slides.current().elements, screen);
        if update.is_some() {
            self.history.commit_pending();
        }
        self.history.discard_pending();
        self.apply_elements(update, false)
    }

    /// Abort the active gesture (Escape).
    pub fn cancel_gesture(&mut self) -> bool {
        let update = self
            .canvas
            .cancel_gesture(&self.presentation.slides.current().elements);
        self.history.discard_pending();
        self.apply_elements(update, false)
    }

    pub fn double_click(&mut self, screen: Point) -> bool {
        self.canvas
            .double_click(&self.presentation.slides.current().elements, screen)
    }

    pub fn edit_text(&mut self, text: impl Into<String>) -> bool {
        self.canvas.edit_text(text)
    }

    /// Text editor lost focus.
    pub fn blur(&mut self) -> bool {
        self.finish_text_edit()
    }

    fn finish_text_edit(&mut self) -> bool {
        let update = self
            .canvas
            .blur(&self.presentation.slides.current().elements);
        self.apply_elements(update, true)
    }

    /// Drop a toolbar tool onto the canvas. Returns the new element's id.
    pub fn drop_tool(&mut self, tool: ToolKind, screen: Point) -> ElementId {
        self.record_undo();
        let elements = self
            .canvas
            .drop_tool(&self.presentation.slides.current().elements, tool, screen);
        let id = elements.last().map(|e| e.id.clone()).unwrap_or_default();
        self.presentation.slides.current_mut().elements = elements;
        self.mark_changed();
        id
    }

    pub fn select_element(&mut self, id: &str) -> bool {
        self.finish_text_edit();
        self.canvas
            .select(&self.presentation.slides.current().elements, id)
    }

    pub fn deselect(&mut self) {
        self.finish_text_edit();
        self.canvas.deselect();
    }

    pub fn selected_element(&self) -> Option<&Element> {
        self.canvas
            .selected_id()
            .and_then(|id| self.current_slide().element(id))
    }

    fn selected_id_owned(&self) -> EditorResult<ElementId> {
        self.selected_element()
            .map(|e| e.id.clone())
            .ok_or(EditorError::NoSelection)
    }

    pub fn delete_selected(&mut self) -> EditorResult<()> {
        self.selected_id_owned()?;
        let update = self
            .canvas
            .delete_selected(&self.presentation.slides.current().elements);
        self.apply_elements(update, true);
        Ok(())
    }

    /// Clone the selected element, offset it and select the clone.
    pub fn duplicate_selected(&mut self) -> EditorResult<ElementId> {
        self.finish_text_edit();
        let original = self.selected_element().ok_or(EditorError::NoSelection)?;
        let mut copy = original.clone_with_new_id();
        let offset = self.config.duplicate_offset;
        copy.translate(Vec2::new(offset, offset));
        let id = copy.id.clone();
        self.record_undo();
        self.presentation.slides.current_mut().elements.push(copy);
        self.canvas
            .select(&self.presentation.slides.current().elements, &id);
        self.mark_changed();
        Ok(id)
    }

    fn reorder_selected(&mut self, op: fn(&mut Slide, &str) -> bool) -> EditorResult<bool> {
        let id = self.selected_id_owned()?;
        let before = self.snapshot();
        let moved = op(self.presentation.slides.current_mut(), &id);
        if moved {
            self.history.record(before);
            self.mark_changed();
        }
        Ok(moved)
    }

    pub fn bring_to_front(&mut self) -> EditorResult<bool> {
        self.reorder_selected(Slide::bring_to_front)
    }

    pub fn send_to_back(&mut self) -> EditorResult<bool> {
        self.reorder_selected(Slide::send_to_back)
    }

    pub fn bring_forward(&mut self) -> EditorResult<bool> {
        self.reorder_selected(Slide::bring_forward)
    }

    pub fn send_backward(&mut self) -> EditorResult<bool> {
        self.reorder_selected(Slide::send_backward)
    }

    /// Edit the selected element's style bag.
    pub fn update_selected_style(&mut self, edit: impl FnOnce(&mut ElementStyle)) -> EditorResult<()> {
        let id = self.selected_id_owned()?;
        self.record_undo();
        if let Some(element) = self.presentation.slides.current_mut().element_mut(&id) {
            edit(element.style.get_or_insert_with(ElementStyle::default));
        }
        self.mark_changed();
        Ok(())
    }

    pub fn set_selected_background(&mut self, color: impl Into<String>) -> EditorResult<()> {
        let color = color.into();
        self.update_selected_style(|style| style.background_color = Some(color))
    }

    /// Screen-space display list of the current slide.
    pub fn display_list(&self) -> Vec<RenderItem> {
        self.canvas.display_list(&self.current_slide().elements)
    }

    /// Screen-space handles of the selected element.
    pub fn handles(&self) -> Vec<Handle> {
        self.canvas.handles(&self.current_slide().elements)
    }

    // --- Slides ---

    pub fn set_slide_background(&mut self, background: Background) {
        self.record_undo();
        self.presentation.slides.current_mut().background = background;
        self.mark_changed();
    }

    pub fn set_slide_transition(&mut self, transition: Transition) {
        self.record_undo();
        self.presentation.slides.current_mut().transition = transition;
        self.mark_changed();
    }

    pub fn set_slide_title(&mut self, title: impl Into<String>) {
        self.record_undo();
        self.presentation.slides.current_mut().title = title.into();
        self.mark_changed();
    }

    pub fn select_slide(&mut self, index: usize) -> EditorResult<()> {
        self.finish_text_edit();
        self.presentation.slides.select(index)?;
        self.canvas.deselect();
        Ok(())
    }

    pub fn add_slide(&mut self) -> usize {
        self.finish_text_edit();
        self.record_undo();
        let index = self.presentation.slides.add_slide();
        self.canvas.deselect();
        self.mark_changed();
        index
    }

    pub fn duplicate_slide(&mut self, index: usize) -> EditorResult<usize> {
        self.finish_text_edit();
        let before = self.snapshot();
        let new_index = self.presentation.slides.duplicate_slide(index)?;
        self.history.record(before);
        self.canvas.deselect();
        self.mark_changed();
        Ok(new_index)
    }

    /// Delete a slide. Deleting the last one is refused with a warning notice.
    pub fn delete_slide(&mut self, index: usize) -> EditorResult<()> {
        self.finish_text_edit();
        let before = self.snapshot();
        match self.presentation.slides.delete_slide(index) {
            Ok(_) => {
                self.history.record(before);
                self.canvas.deselect();
                self.mark_changed();
                Ok(())
            }
            Err(err) => {
                if err == SlideListError::LastSlide {
                    self.notify(NoticeLevel::Warning, "A presentation needs at least one slide");
                }
                Err(err.into())
            }
        }
    }

    pub fn reorder_slides(&mut self, new_order: Vec<Slide>) -> EditorResult<()> {
        let before = self.snapshot();
        self.presentation.slides.reorder_slides(new_order)?;
        self.history.record(before);
        self.mark_changed();
        Ok(())
    }

    pub fn move_slide_up(&mut self, index: usize) -> bool {
        let before = self.snapshot();
        let moved = self.presentation.slides.move_up(index);
        if moved {
            self.history.record(before);
            self.mark_changed();
        }
        moved
    }

    pub fn move_slide_down(&mut self, index: usize) -> bool {
        let before = self.snapshot();
        let moved = self.presentation.slides.move_down(index);
        if moved {
            self.history.record(before);
            self.mark_changed();
        }
        moved
    }

    pub fn start_reorder(&mut self, source: usize) -> EditorResult<()> {
        Ok(self.presentation.slides.start_reorder(source)?)
    }

    pub fn commit_reorder(&mut self, dest: usize) -> EditorResult<bool> {
        let before = self.snapshot();
        let moved = self.presentation.slides.commit_reorder(dest)?;
        if moved {
            self.history.record(before);
            self.mark_changed();
        }
        Ok(moved)
    }

    pub fn cancel_reorder(&mut self) {
        self.presentation.slides.cancel_reorder();
    }

    pub fn thumbnails(&self, width: f64) -> Vec<Thumbnail> {
        self.presentation.slides.thumbnails(width)
    }

    // --- Theme ---

    /// Restyle every slide with a catalog theme. Not reversible except by undo.
    pub fn apply_theme(&mut self, theme_id: &str) -> EditorResult<()> {
        if find_theme(theme_id).is_none() {
            return Err(EditorError::UnknownTheme(theme_id.to_string()));
        }
        self.finish_text_edit();
        self.record_undo();
        self.presentation.apply_theme(theme_id);
        log::info!(
            "Applied theme {} to {} slides",
            theme_id,
            self.presentation.slides.len()
        );
        self.mark_changed();
        Ok(())
    }

    // --- Generation ---

    /// Replace the slides with generated ones. The requested count is
    /// clamped to the configured bounds.
    pub async fn generate<G: OutlineGenerator + ?Sized>(
        &mut self,
        generator: &G,
        prompt: &str,
        slide_count: usize,
    ) -> EditorResult<usize> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::EmptyPrompt.into());
        }
        let request = GenerationRequest {
            prompt: prompt.to_string(),
            slide_count: self.config.clamp_slide_count(slide_count),
        };
        log::info!("Generating {} slides", request.slide_count);
        let outlines = match generator.generate(&request).await {
            Ok(outlines) if outlines.is_empty() => Err(GenerationError::Empty),
            other => other,
        };
        let outlines = match outlines {
            Ok(outlines) => outlines,
            Err(err) => {
                log::error!("Outline generation failed: {err}");
                self.notify(NoticeLevel::Error, format!("Could not generate slides: {err}"));
                return Err(err.into());
            }
        };

        self.finish_text_edit();
        self.record_undo();
        let slides = outlines_to_slides(&outlines);
        let count = slides.len();
        self.presentation.slides.replace(slides, 0);
        if self.presentation.is_untitled() {
            if let Some(first) = outlines.first() {
                self.presentation.title = first.title.trim().to_string();
            }
        }
        self.canvas.deselect();
        self.mark_changed();
        Ok(count)
    }

    // --- Persistence ---

    /// Replace the document with a stored presentation.
    pub async fn load<S: SlideStore + ?Sized>(
        &mut self,
        store: &S,
        presentation_id: i64,
    ) -> EditorResult<()> {
        let loaded = async {
            let record = store.get_presentation(presentation_id).await?;
            let slides = store.list_slides(presentation_id).await?;
            Ok::<_, StorageError>((record, slides))
        }
        .await;
        let (record, records) = match loaded {
            Ok(loaded) => loaded,
            Err(err) => {
                log::error!("Failed to load presentation {presentation_id}: {err}");
                self.notify(NoticeLevel::Error, format!("Could not load presentation: {err}"));
                return Err(err.into());
            }
        };

        self.persisted_ids = records.iter().map(|r| r.id).collect();
        let slides: Vec<Slide> = records.iter().map(bridge::deserialize).collect();
        log::info!("Loaded presentation {} with {} slides", record.id, slides.len());

        self.presentation.id = Some(record.id);
        self.presentation.title = record.title;
        self.presentation.slides.replace(slides, 0);
        self.canvas.deselect();
        self.history.clear();
        self.dirty = false;
        self.revision += 1;
        Ok(())
    }

    /// Snapshot the document for saving.
    pub fn prepare_save(&mut self) -> SavePlan {
        self.finish_text_edit();
        let slides: Vec<PlannedSlide> = self
            .slides()
            .iter()
            .enumerate()
            .map(|(index, slide)| PlannedSlide {
                id: slide.id,
                slide_number: index as u32 + 1,
                encoded: bridge::serialize(slide)
                    .map_err(|e| StorageError::Serialization(e.to_string())),
            })
            .collect();
        let kept: BTreeSet<i64> = slides.iter().filter_map(|s| s.id.persisted()).collect();
        SavePlan {
            presentation_id: self.presentation.id,
            title: self.presentation.title.clone(),
            deletions: self.persisted_ids.difference(&kept).copied().collect(),
            slides,
            revision: self.revision,
        }
    }

    /// Apply the result of an executed save plan.
    pub fn finish_save(&mut self, outcome: SaveOutcome) -> SaveReport {
        if let Some(id) = outcome.presentation_id {
            self.presentation.id = Some(id);
        }
        for &(local, persisted) in &outcome.created {
            if let Some(index) = self.presentation.slides.position(local) {
                if let Some(slide) = self.presentation.slides.get_mut(index) {
                    slide.id = SlideId::Persisted(persisted);
                }
            }
            self.history.for_each_mut(|snapshot| {
                for slide in snapshot.slides.iter_mut().filter(|s| s.id == local) {
                    slide.id = SlideId::Persisted(persisted);
                }
            });
            self.persisted_ids.insert(persisted);
        }
        for id in &outcome.deleted {
            self.persisted_ids.remove(id);
        }

        let report = SaveReport {
            presentation_id: outcome.presentation_id,
            created: outcome.created.len(),
            updated: outcome.updated.len(),
            deleted: outcome.deleted.len(),
            attempted: outcome.attempted,
            failures: outcome.failures,
        };
        if report.is_complete() {
            if outcome.revision == self.revision {
                self.dirty = false;
            }
            log::info!(
                "Saved presentation {:?}: {} created, {} updated, {} deleted",
                report.presentation_id,
                report.created,
                report.updated,
                report.deleted
            );
        } else {
            self.dirty = true;
            log::error!(
                "Save incomplete: {} of {} operations failed",
                report.failures.len(),
                report.attempted
            );
            self.notify(
                NoticeLevel::Error,
                format!(
                    "Save failed for {} of {} changes; your edits are kept, try saving again",
                    report.failures.len(),
                    report.attempted
                ),
            );
        }
        report
    }

    /// Snapshot, execute and apply a save.
    pub async fn save<S: SlideStore + ?Sized>(&mut self, store: &S) -> EditorResult<SaveReport> {
        let outcome = self.prepare_save().execute(store).await;
        let report = self.finish_save(outcome);
        if report.is_complete() {
            Ok(report)
        } else {
            Err(EditorError::PartialSave {
                failed: report.failures.len(),
                attempted: report.attempted,
            })
        }
    }
}

/// One store call of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOperation {
    CreatePresentation,
    UpdatePresentation(i64),
    /// By 1-based slide number.
    CreateSlide(u32),
    UpdateSlide(i64),
    DeleteSlide(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub operation: SaveOperation,
    pub error: StorageError,
}

#[derive(Debug, Clone)]
struct PlannedSlide {
    id: SlideId,
    slide_number: u32,
    encoded: Result<EncodedSlide, StorageError>,
}

/// Document snapshot taken by [`Editor::prepare_save`].
#[derive(Debug, Clone)]
pub struct SavePlan {
    presentation_id: Option<i64>,
    title: String,
    slides: Vec<PlannedSlide>,
    deletions: Vec<i64>,
    revision: u64,
}

/// Raw result of [`SavePlan::execute`], to be handed to [`Editor::finish_save`].
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    revision: u64,
    presentation_id: Option<i64>,
    created: Vec<(SlideId, i64)>,
    updated: Vec<i64>,
    deleted: Vec<i64>,
    failures: Vec<SaveFailure>,
    attempted: usize,
}

impl SaveOutcome {
    fn fail(&mut self, operation: SaveOperation, error: StorageError) {
        log::error!("{operation:?} failed: {error}");
        self.failures.push(SaveFailure { operation, error });
    }
}

/// Summary of a finished save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub presentation_id: Option<i64>,
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
    pub attempted: usize,
    pub failures: Vec<SaveFailure>,
}

impl SaveReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl SavePlan {
    /// Number of slides that will be created.
    pub fn new_slides(&self) -> usize {
        self.slides.iter().filter(|s| s.id.is_new()).count()
    }

    /// Store ids of slides that will be deleted.
    pub fn deletions(&self) -> &[i64] {
        &self.deletions
    }

    /// Issue the store calls in order: presentation, slides, deletions.
    /// Failures are collected; only a failed presentation create stops early.
    pub async fn execute<S: SlideStore + ?Sized>(self, store: &S) -> SaveOutcome {
        let mut outcome = SaveOutcome {
            revision: self.revision,
            presentation_id: self.presentation_id,
            created: Vec::new(),
            updated: Vec::new(),
            deleted: Vec::new(),
            failures: Vec::new(),
            attempted: 1,
        };

        let presentation_id = match self.presentation_id {
            Some(id) => {
                if let Err(err) = store.update_presentation(id, &self.title).await {
                    outcome.fail(SaveOperation::UpdatePresentation(id), err);
                }
                id
            }
            None => match store.create_presentation(&self.title).await {
                Ok(record) => {
                    outcome.presentation_id = Some(record.id);
                    record.id
                }
                Err(err) => {
                    outcome.fail(SaveOperation::CreatePresentation, err);
                    return outcome;
                }
            },
        };

        for slide in self.slides {
            outcome.attempted += 1;
            let operation = match slide.id {
                SlideId::Persisted(id) => SaveOperation::UpdateSlide(id),
                SlideId::Local(_) => SaveOperation::CreateSlide(slide.slide_number),
            };
            let encoded = match slide.encoded {
                Ok(encoded) => encoded,
                Err(err) => {
                    outcome.fail(operation, err);
                    continue;
                }
            };
            match slide.id {
                SlideId::Persisted(id) => {
                    let update = SlideUpdate {
                        slide_number: slide.slide_number,
                        content: encoded.content,
                        background_color: encoded.background_color,
                    };
                    match store.update_slide(id, update).await {
                        Ok(_) => outcome.updated.push(id),
                        Err(err) => outcome.fail(operation, err),
                    }
                }
                SlideId::Local(_) => {
                    let new_slide = NewSlide {
                        presentation_id,
                        slide_number: slide.slide_number,
                        content: encoded.content,
                        background_color: encoded.background_color,
                    };
                    match store.create_slide(new_slide).await {
                        Ok(record) => outcome.created.push((slide.id, record.id)),
                        Err(err) => outcome.fail(operation, err),
                    }
                }
            }
        }

        for id in self.deletions {
            outcome.attempted += 1;
            match store.delete_slide(id).await {
                // Already gone counts as deleted so a retry converges.
                Ok(()) | Err(StorageError::NotFound(_)) => outcome.deleted.push(id),
                Err(err) => outcome.fail(SaveOperation::DeleteSlide(id), err),
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementKind, ShapeKind};
    use crate::generate::SlideOutline;
    use crate::storage::{BoxFuture, MemoryStore, PresentationRecord, SlideRecord, StorageResult, block_on};
    use crate::widget::WidgetState;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Memory store that fails creates and updates for one slide number.
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryStore,
        failing_slide_number: AtomicU32,
    }

    impl FlakyStore {
        fn fail_slide(&self, number: u32) {
            self.failing_slide_number.store(number, Ordering::SeqCst);
        }

        fn check(&self, number: u32) -> StorageResult<()> {
            if self.failing_slide_number.load(Ordering::SeqCst) == number {
                Err(StorageError::Io("connection reset".into()))
            } else {
                Ok(())
            }
        }
    }

    impl SlideStore for FlakyStore {
        fn create_presentation(&self, title: &str) -> BoxFuture<'_, StorageResult<PresentationRecord>> {
            self.inner.create_presentation(title)
        }

        fn update_presentation(&self, id: i64, title: &str) -> BoxFuture<'_, StorageResult<()>> {
            self.inner.update_presentation(id, title)
        }

        fn get_presentation(&self, id: i64) -> BoxFuture<'_, StorageResult<PresentationRecord>> {
            self.inner.get_presentation(id)
        }

        fn create_slide(&self, slide: NewSlide) -> BoxFuture<'_, StorageResult<SlideRecord>> {
            if let Err(err) = self.check(slide.slide_number) {
                return Box::pin(async move { Err(err) });
            }
            self.inner.create_slide(slide)
        }

        fn update_slide(&self, id: i64, update: SlideUpdate) -> BoxFuture<'_, StorageResult<SlideRecord>> {
            if let Err(err) = self.check(update.slide_number) {
                return Box::pin(async move { Err(err) });
            }
            self.inner.update_slide(id, update)
        }

        fn delete_slide(&self, id: i64) -> BoxFuture<'_, StorageResult<()>> {
            self.inner.delete_slide(id)
        }

        fn list_slides(&self, presentation_id: i64) -> BoxFuture<'_, StorageResult<Vec<SlideRecord>>> {
            self.inner.list_slides(presentation_id)
        }
    }

    struct CannedGenerator {
        outlines: Vec<SlideOutline>,
        seen: Mutex<Option<GenerationRequest>>,
    }

    impl CannedGenerator {
        fn new(outlines: Vec<SlideOutline>) -> Self {
            Self {
                outlines,
                seen: Mutex::new(None),
            }
        }
    }

    impl OutlineGenerator for CannedGenerator {
        fn generate(
            &self,
            request: &GenerationRequest,
        ) -> BoxFuture<'_, Result<Vec<SlideOutline>, GenerationError>> {
            *self.seen.lock().unwrap() = Some(request.clone());
            let outlines = self.outlines.clone();
            Box::pin(async move { Ok(outlines) })
        }
    }

    fn texts(slide: &Slide) -> Vec<&str> {
        slide.text_contents().collect()
    }

    #[test]
    fn test_default_presentation() {
        let editor = Editor::default();
        assert_eq!(editor.slides().len(), 2);
        assert_eq!(
            texts(&editor.slides()[0]),
            vec!["PRESENTATION TITLE", "Subtitle or Author Name"]
        );
        let content = &editor.slides()[1];
        assert_eq!(content.elements.len(), 2);
        assert_eq!(content.elements[1].text_content().unwrap().lines().count(), 4);
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn test_drop_rectangle_and_undo() {
        let mut editor = Editor::default();
        let before = editor.current_slide().elements.len();
        let id = editor.drop_tool(ToolKind::Rectangle, Point::new(400.0, 300.0));

        let element = editor.current_slide().element(&id).unwrap();
        assert_eq!(element.position(), Point::new(325.0, 250.0));
        match &element.kind {
            ElementKind::Shape(shape) => {
                assert_eq!(shape.shape_type, ShapeKind::Rectangle);
                assert_eq!(shape.fill, "#4f46e5");
            }
            other => panic!("expected shape, got {other:?}"),
        }
        assert_eq!(editor.canvas().widget_state(&id), WidgetState::Selected);
        assert!(editor.has_unsaved_changes());

        assert!(editor.undo());
        assert_eq!(editor.current_slide().elements.len(), before);
        assert!(editor.selected_element().is_none());
        assert!(editor.redo());
        assert!(editor.current_slide().element(&id).is_some());
    }

    #[test]
    fn test_drag_is_one_undo_step() {
        let mut editor = Editor::default();
        let id = editor.drop_tool(ToolKind::Rectangle, Point::new(400.0, 300.0));
        editor.deselect();

        // A click without movement records nothing.
        editor.pointer_down(Point::new(400.0, 300.0));
        editor.pointer_up(Point::new(400.0, 300.0));
        editor.undo();
        assert!(editor.current_slide().element(&id).is_none());
        editor.redo();

        editor.pointer_down(Point::new(400.0, 300.0));
        assert!(editor.pointer_move(Point::new(420.0, 300.0)));
        assert!(editor.pointer_move(Point::new(450.0, 310.0)));
        assert!(editor.pointer_up(Point::new(500.0, 320.0)));
        assert_eq!(
            editor.current_slide().element(&id).unwrap().position(),
            Point::new(425.0, 270.0)
        );

        assert!(editor.undo());
        assert_eq!(
            editor.current_slide().element(&id).unwrap().position(),
            Point::new(325.0, 250.0)
        );
    }

    #[test]
    fn test_text_edit_flow() {
        let mut editor = Editor::default();
        let id = editor.drop_tool(ToolKind::Text, Point::new(640.0, 600.0));
        assert_eq!(editor.canvas().widget_state(&id), WidgetState::EditingText);
        assert!(editor.edit_text("Closing words\n"));
        assert!(editor.blur());
        assert_eq!(
            editor.current_slide().element(&id).unwrap().text_content(),
            Some("Closing words\n")
        );
    }

    #[test]
    fn test_apply_minimal_theme() {
        let mut editor = Editor::default();
        editor.apply_theme("minimal").unwrap();
        let theme = find_theme("minimal").unwrap();

        // The title slide's heading is bold.
        let title = &editor.slides()[0].elements[0];
        let style = title.style.as_ref().unwrap();
        assert_eq!(style.color.as_deref(), Some(theme.primary_color));
        assert_eq!(style.font_family.as_deref(), Some(theme.heading_font));
        for slide in editor.slides() {
            assert_eq!(slide.background, Background::Color(theme.background_color.into()));
        }
        assert_eq!(editor.presentation().theme_id, "minimal");
        assert!(matches!(
            editor.apply_theme("neon"),
            Err(EditorError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_delete_last_slide_warns() {
        let mut editor = Editor::default();
        editor.delete_slide(1).unwrap();
        let result = editor.delete_slide(0);
        assert!(matches!(
            result,
            Err(EditorError::SlideList(SlideListError::LastSlide))
        ));
        assert_eq!(editor.slides().len(), 1);
        let notices = editor.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(editor.take_notices().is_empty());
    }

    #[test]
    fn test_element_operations_need_selection() {
        let mut editor = Editor::default();
        assert!(matches!(editor.delete_selected(), Err(EditorError::NoSelection)));
        assert!(matches!(editor.duplicate_selected(), Err(EditorError::NoSelection)));

        let id = editor.drop_tool(ToolKind::Star, Point::new(200.0, 200.0));
        let copy = editor.duplicate_selected().unwrap();
        assert_ne!(copy, id);
        let original = editor.current_slide().element(&id).unwrap().position();
        let dup = editor.current_slide().element(&copy).unwrap().position();
        assert_eq!(dup - original, Vec2::new(20.0, 20.0));

        assert!(editor.send_to_back().unwrap());
        assert_eq!(editor.current_slide().index_of(&copy), Some(0));
        editor.set_selected_background("#ff0000").unwrap();
        let style = editor.selected_element().unwrap().style.clone().unwrap();
        assert_eq!(style.background_color.as_deref(), Some("#ff0000"));

        editor.delete_selected().unwrap();
        assert!(editor.current_slide().element(&copy).is_none());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let store = MemoryStore::new();
        let mut editor = Editor::default();
        editor.set_title("Launch");
        editor.drop_tool(ToolKind::Chart, Point::new(640.0, 360.0));
        editor.set_slide_transition(Transition::Zoom);

        let report = block_on(editor.save(&store)).unwrap();
        assert_eq!(report.created, 2);
        assert!(!editor.has_unsaved_changes());
        assert!(editor.slides().iter().all(|s| !s.id.is_new()));
        let presentation_id = editor.presentation().id.unwrap();

        let mut reopened = Editor::default();
        block_on(reopened.load(&store, presentation_id)).unwrap();
        assert_eq!(reopened.presentation().title, "Launch");
        assert_eq!(reopened.slides().len(), 2);
        for (a, b) in editor.slides().iter().zip(reopened.slides()) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.elements, b.elements);
            assert_eq!(a.transition, b.transition);
        }
        assert!(!reopened.can_undo());
    }

    #[test]
    fn test_second_save_updates_and_deletes() {
        let store = MemoryStore::new();
        let mut editor = Editor::default();
        block_on(editor.save(&store)).unwrap();
        let presentation_id = editor.presentation().id.unwrap();

        editor.add_slide();
        editor.delete_slide(0).unwrap();
        let plan = editor.prepare_save();
        assert_eq!(plan.new_slides(), 1);
        assert_eq!(plan.deletions().len(), 1);

        let report = block_on(editor.save(&store)).unwrap();
        assert_eq!((report.created, report.updated, report.deleted), (1, 1, 1));
        let records = block_on(store.list_slides(presentation_id)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records.iter().map(|r| r.slide_number).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn test_partial_save_keeps_edits_and_retries() {
        let store = FlakyStore::default();
        let mut editor = Editor::default();
        store.fail_slide(2);

        let result = block_on(editor.save(&store));
        assert!(matches!(
            result,
            Err(EditorError::PartialSave { failed: 1, attempted: 3 })
        ));
        assert!(editor.has_unsaved_changes());
        assert!(!editor.slides()[0].id.is_new());
        assert!(editor.slides()[1].id.is_new());
        let notices = editor.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Error);

        store.fail_slide(0);
        let report = block_on(editor.save(&store)).unwrap();
        assert_eq!((report.created, report.updated), (1, 1));
        assert!(!editor.has_unsaved_changes());
        let records = block_on(store.list_slides(editor.presentation().id.unwrap())).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_undo_saved_delete_recreates_slide() {
        let store = MemoryStore::new();
        let mut editor = Editor::default();
        block_on(editor.save(&store)).unwrap();
        let presentation_id = editor.presentation().id.unwrap();

        editor.delete_slide(1).unwrap();
        block_on(editor.save(&store)).unwrap();
        assert_eq!(block_on(store.list_slides(presentation_id)).unwrap().len(), 1);

        assert!(editor.undo());
        assert_eq!(editor.slides().len(), 2);
        assert!(editor.slides()[1].id.is_new());
        let report = block_on(editor.save(&store)).unwrap();
        assert_eq!((report.created, report.updated), (1, 1));
        assert!(!editor.has_unsaved_changes());
        assert_eq!(block_on(store.list_slides(presentation_id)).unwrap().len(), 2);

        // The next save only updates.
        let report = block_on(editor.save(&store)).unwrap();
        assert_eq!((report.created, report.updated), (0, 2));
    }

    #[test]
    fn test_title_edits_are_undoable() {
        let mut editor = Editor::default();
        editor.set_title("Quarterly review");
        editor.set_slide_title("Opening");
        assert!(editor.undo());
        assert_eq!(editor.current_slide().title, "PRESENTATION TITLE");
        assert_eq!(editor.presentation().title, "Quarterly review");
        assert!(editor.undo());
        assert!(editor.presentation().is_untitled());
        assert!(editor.redo());
        assert_eq!(editor.presentation().title, "Quarterly review");
    }

    #[test]
    fn test_edits_during_save_stay_dirty() {
        let store = MemoryStore::new();
        let mut editor = Editor::default();
        let plan = editor.prepare_save();
        editor.add_slide();
        let outcome = block_on(plan.execute(&store));
        let report = editor.finish_save(outcome);
        assert!(report.is_complete());
        assert!(editor.has_unsaved_changes());
        assert!(editor.slides()[2].id.is_new());

        block_on(editor.save(&store)).unwrap();
        assert!(!editor.has_unsaved_changes());
        let records = block_on(store.list_slides(editor.presentation().id.unwrap())).unwrap();
        assert_eq!(records.len(), 3);
    }

    #[test]
    fn test_load_empty_presentation_seeds_defaults() {
        let store = MemoryStore::new();
        let record = block_on(store.create_presentation("Empty")).unwrap();
        let mut editor = Editor::default();
        block_on(editor.load(&store, record.id)).unwrap();
        assert_eq!(editor.slides().len(), 2);
        assert!(matches!(
            block_on(editor.load(&store, 999)),
            Err(EditorError::Storage(StorageError::NotFound(_)))
        ));
        assert_eq!(editor.take_notices()[0].level, NoticeLevel::Error);
    }

    #[test]
    fn test_generate_replaces_slides() {
        let generator = CannedGenerator::new(vec![
            SlideOutline::new("Rust in production", "Safety\nSpeed"),
            SlideOutline::new("Adoption", "Start small"),
            SlideOutline::new("Next steps", ""),
        ]);
        let mut editor = Editor::default();
        let count = block_on(editor.generate(&generator, "rust adoption", 100)).unwrap();
        assert_eq!(count, 3);
        assert_eq!(generator.seen.lock().unwrap().as_ref().unwrap().slide_count, 30);
        assert_eq!(editor.presentation().title, "Rust in production");
        assert_eq!(editor.cursor(), 0);
        assert_eq!(texts(&editor.slides()[1]), vec!["Adoption", "• Start small"]);
        assert!(editor.undo());
        assert_eq!(editor.slides().len(), 2);
    }

    #[test]
    fn test_generate_errors() {
        let mut editor = Editor::default();
        let empty = CannedGenerator::new(Vec::new());
        assert!(matches!(
            block_on(editor.generate(&empty, "topic", 5)),
            Err(EditorError::Generation(GenerationError::Empty))
        ));
        assert_eq!(editor.take_notices().len(), 1);
        assert!(matches!(
            block_on(editor.generate(&empty, "   ", 5)),
            Err(EditorError::Generation(GenerationError::EmptyPrompt))
        ));
        assert_eq!(editor.slides().len(), 2);
    }

    #[test]
    fn test_slide_reorder_through_editor() {
        let mut editor = Editor::default();
        editor.add_slide();
        editor.select_slide(2).unwrap();
        let current = editor.current_slide().id;
        editor.start_reorder(2).unwrap();
        assert!(editor.commit_reorder(0).unwrap());
        assert_eq!(editor.cursor(), 0);
        assert_eq!(editor.current_slide().id, current);
        assert!(editor.move_slide_down(0));
        assert_eq!(editor.current_slide().id, current);
        assert_eq!(editor.thumbnails(160.0).len(), 3);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut editor = Editor::default();
        editor.set_zoom(10.0);
        assert_eq!(editor.zoom(), editor.config().max_zoom);
        editor.reset_zoom();
        editor.zoom_out();
        assert!((editor.zoom() - 0.9).abs() < 1e-9);
    }
}
