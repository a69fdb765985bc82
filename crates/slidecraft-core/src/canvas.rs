//! Canvas interaction engine.
//!
//! [`CanvasInteraction`] mediates pointer editing of one slide. It never owns
//! the element list: every operation takes the slide's current elements and,
//! when something changed, returns the full updated list for the caller to
//! store. The only state kept here is transient (selection, the active
//! gesture and its grab offset, an in-progress text draft) plus the zoom.

use crate::camera::Camera;
use crate::config::EditorConfig;
use crate::elements::{Element, ElementId, ElementKind, topmost_at};
use crate::selection::{self, Handle, HandleKind};
use crate::tools::ToolKind;
use crate::widget::{Gesture, InteractionState, WidgetState};
use kurbo::{Point, Rect};

/// One element as it should be drawn, in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderItem {
    pub id: ElementId,
    pub type_name: &'static str,
    /// Unrotated frame on screen.
    pub frame: Rect,
    /// Rotation in degrees about the frame center.
    pub rotation: f64,
    pub state: WidgetState,
}

/// Pointer-driven editing of one slide's elements.
#[derive(Debug, Clone)]
pub struct CanvasInteraction {
    pub camera: Camera,
    state: InteractionState,
    min_element_size: f64,
    /// Handle hit radius in screen pixels.
    handle_tolerance: f64,
    /// Snap rotation to 15° steps.
    pub snap_rotation: bool,
}

impl Default for CanvasInteraction {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl CanvasInteraction {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            camera: config.camera(),
            state: InteractionState::Idle,
            min_element_size: config.min_element_size,
            handle_tolerance: config.handle_tolerance,
            snap_rotation: false,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.state.selected_id()
    }

    pub fn widget_state(&self, element_id: &str) -> WidgetState {
        self.state.widget_state(element_id)
    }

    /// Select an element programmatically. Returns false if it does not exist.
    pub fn select(&mut self, elements: &[Element], id: &str) -> bool {
        if elements.iter().any(|e| e.id == id) {
            self.state = InteractionState::Selected { id: id.to_string() };
            true
        } else {
            false
        }
    }

    /// Drop any selection, discarding an uncommitted draft or gesture.
    pub fn deselect(&mut self) {
        self.state = InteractionState::Idle;
    }

    /// Forget the selection if its element is no longer in `elements`
    /// (after undo, slide switch or an external edit).
    pub fn sync(&mut self, elements: &[Element]) {
        if let Some(id) = self.state.selected_id() {
            if !elements.iter().any(|e| e.id == id) {
                self.state = InteractionState::Idle;
            }
        }
    }

    /// Pointer pressed at a screen point.
    ///
    /// Commits a pending text edit (unless the press lands inside the
    /// element being edited), then starts a resize or rotate gesture if a
    /// handle of the selected element was hit, otherwise selects the
    /// topmost element under the pointer and starts dragging it. Pressing
    /// empty canvas deselects.
    pub fn pointer_down(&mut self, elements: &[Element], screen: Point) -> Option<Vec<Element>> {
        let point = self.camera.screen_to_canvas(screen);

        if let InteractionState::EditingText { id, .. } = &self.state {
            if elements.iter().any(|e| &e.id == id && e.hit_test(point, 0.0)) {
                return None;
            }
        }
        let committed = self.commit_text(elements);
        let current = committed.as_deref().unwrap_or(elements);

        let tolerance = self.handle_tolerance / self.camera.zoom;
        let handle_hit = self
            .selected_id()
            .and_then(|id| current.iter().find(|e| e.id == id))
            .and_then(|el| {
                selection::hit_test_handles(el, point, tolerance).map(|handle| (el, handle))
            });
        if let Some((el, handle)) = handle_hit {
            let gesture = if handle.is_resize() {
                Gesture::Resize { handle }
            } else {
                Gesture::Rotate
            };
            self.state = InteractionState::Active {
                id: el.id.clone(),
                gesture,
                original: el.clone(),
            };
            return committed;
        }

        self.state = match topmost_at(current, point, 0.0) {
            Some(el) => InteractionState::Active {
                id: el.id.clone(),
                gesture: Gesture::Drag {
                    grab_offset: point - el.position(),
                },
                original: el.clone(),
            },
            None => InteractionState::Idle,
        };
        committed
    }

    /// Pointer moved. Applies the active gesture, if any.
    pub fn pointer_move(&mut self, elements: &[Element], screen: Point) -> Option<Vec<Element>> {
        let point = self.camera.screen_to_canvas(screen);
        let InteractionState::Active { id, gesture, .. } = &self.state else {
            return None;
        };
        let index = elements.iter().position(|e| &e.id == id)?;
        let mut updated = elements[index].clone();
        let changed = match gesture {
            Gesture::Drag { grab_offset } => {
                let position = point - *grab_offset;
                updated.set_position(position);
                position != elements[index].position()
            }
            Gesture::Resize { handle } => {
                selection::apply_resize(&mut updated, *handle, point, self.min_element_size)
                    && updated.frame() != elements[index].frame()
            }
            Gesture::Rotate => {
                selection::apply_rotation(&mut updated, point, self.snap_rotation);
                updated.rotation != elements[index].rotation
            }
        };
        if !changed {
            return None;
        }
        let mut list = elements.to_vec();
        list[index] = updated;
        Some(list)
    }

    /// Pointer released. Applies the final sample and ends the gesture.
    pub fn pointer_up(&mut self, elements: &[Element], screen: Point) -> Option<Vec<Element>> {
        let update = self.pointer_move(elements, screen);
        self.state = match std::mem::take(&mut self.state) {
            InteractionState::Active { id, .. } => InteractionState::Selected { id },
            other => other,
        };
        update
    }

    /// Abort the active gesture, restoring the element as it was at pointer-down.
    pub fn cancel_gesture(&mut self, elements: &[Element]) -> Option<Vec<Element>> {
        match std::mem::take(&mut self.state) {
            InteractionState::Active { id, original, .. } => {
                let index = elements.iter().position(|e| e.id == id);
                self.state = InteractionState::Selected { id };
                let index = index?;
                if elements[index] == original {
                    return None;
                }
                let mut list = elements.to_vec();
                list[index] = original;
                Some(list)
            }
            InteractionState::EditingText { id, .. } => {
                self.state = InteractionState::Selected { id };
                None
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Double-click at a screen point. Enters text editing on a text
    /// element; every other variant ignores it. Returns whether editing began.
    pub fn double_click(&mut self, elements: &[Element], screen: Point) -> bool {
        let point = self.camera.screen_to_canvas(screen);
        let Some(el) = topmost_at(elements, point, 0.0) else {
            return false;
        };
        match &el.kind {
            ElementKind::Text(text) => {
                self.state = InteractionState::EditingText {
                    id: el.id.clone(),
                    draft: text.content.clone(),
                };
                true
            }
            _ => false,
        }
    }

    /// Replace the draft of the in-progress text edit.
    pub fn edit_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.state {
            InteractionState::EditingText { draft, .. } => {
                *draft = text.into();
                true
            }
            _ => false,
        }
    }

    /// Current text draft, if editing.
    pub fn draft(&self) -> Option<&str> {
        match &self.state {
            InteractionState::EditingText { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Focus left the text editor: write the draft back verbatim.
    pub fn blur(&mut self, elements: &[Element]) -> Option<Vec<Element>> {
        self.commit_text(elements)
    }

    fn commit_text(&mut self, elements: &[Element]) -> Option<Vec<Element>> {
        let (id, draft) = match std::mem::take(&mut self.state) {
            InteractionState::EditingText { id, draft } => (id, draft),
            other => {
                self.state = other;
                return None;
            }
        };
        let index = elements.iter().position(|e| e.id == id)?;
        self.state = InteractionState::Selected { id };
        match &elements[index].kind {
            ElementKind::Text(text) if text.content != draft => {
                let mut list = elements.to_vec();
                if let ElementKind::Text(text) = &mut list[index].kind {
                    text.content = draft;
                }
                Some(list)
            }
            _ => None,
        }
    }

    /// Drop a tool token at a screen point: create the element centered
    /// there and select it. A text tool enters editing straight away.
    pub fn drop_tool(&mut self, elements: &[Element], tool: ToolKind, screen: Point) -> Vec<Element> {
        let mut list = self.commit_text(elements).unwrap_or_else(|| elements.to_vec());
        let element = tool.create_at(self.camera.screen_to_canvas(screen));
        log::debug!("Dropped {} tool as {}", tool.name(), element.id);
        self.state = match &element.kind {
            ElementKind::Text(text) if tool.edits_on_drop() => InteractionState::EditingText {
                id: element.id.clone(),
                draft: text.content.clone(),
            },
            _ => InteractionState::Selected {
                id: element.id.clone(),
            },
        };
        list.push(element);
        list
    }

    /// Remove the selected element and return to idle.
    pub fn delete_selected(&mut self, elements: &[Element]) -> Option<Vec<Element>> {
        let id = self.selected_id()?.to_string();
        self.state = InteractionState::Idle;
        let index = elements.iter().position(|e| e.id == id)?;
        let mut list = elements.to_vec();
        list.remove(index);
        Some(list)
    }

    /// Handles of the selected element in screen coordinates.
    /// None are shown while text is being edited.
    pub fn handles(&self, elements: &[Element]) -> Vec<Handle> {
        if self.state.is_editing_text() {
            return Vec::new();
        }
        self.selected_id()
            .and_then(|id| elements.iter().find(|e| e.id == id))
            .map(|el| {
                selection::get_handles(el)
                    .into_iter()
                    .map(|h| Handle::new(self.camera.canvas_to_screen(h.position), h.kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Handle under a screen point, for cursor feedback.
    pub fn handle_at(&self, elements: &[Element], screen: Point) -> Option<HandleKind> {
        let tolerance = self.handle_tolerance;
        self.handles(elements)
            .into_iter()
            .find(|h| h.hit_test(screen, tolerance))
            .map(|h| h.kind)
    }

    /// Elements back to front, scaled to the screen.
    pub fn display_list(&self, elements: &[Element]) -> Vec<RenderItem> {
        let transform = self.camera.transform();
        elements
            .iter()
            .map(|el| RenderItem {
                id: el.id.clone(),
                type_name: el.type_name(),
                frame: transform.transform_rect_bbox(el.frame()),
                rotation: el.rotation,
                state: self.state.widget_state(&el.id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{ElementTemplate, ShapeKind, TextElement};

    fn rect_at(x: f64, y: f64) -> Element {
        Element::create(ElementTemplate::Shape(ShapeKind::Rectangle), Point::new(x, y))
    }

    fn click(canvas: &mut CanvasInteraction, elements: &[Element], p: Point) {
        canvas.pointer_down(elements, p);
        canvas.pointer_up(elements, p);
    }

    #[test]
    fn test_click_selects_and_empty_click_deselects() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![rect_at(100.0, 100.0)];
        click(&mut canvas, &elements, Point::new(150.0, 150.0));
        assert_eq!(canvas.selected_id(), Some(elements[0].id.as_str()));
        assert_eq!(canvas.widget_state(&elements[0].id), WidgetState::Selected);

        click(&mut canvas, &elements, Point::new(900.0, 600.0));
        assert_eq!(canvas.selected_id(), None);
    }

    #[test]
    fn test_click_picks_topmost() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![rect_at(100.0, 100.0), rect_at(120.0, 120.0)];
        click(&mut canvas, &elements, Point::new(130.0, 130.0));
        assert_eq!(canvas.selected_id(), Some(elements[1].id.as_str()));
    }

    #[test]
    fn test_drag_is_one_to_one_under_zoom() {
        let mut canvas = CanvasInteraction::default();
        canvas.camera.set_zoom(2.0);
        let mut elements = vec![rect_at(100.0, 100.0)];

        // Canvas (125, 125): grab offset (25, 25).
        assert!(canvas.pointer_down(&elements, Point::new(250.0, 250.0)).is_none());
        assert_eq!(canvas.widget_state(&elements[0].id), WidgetState::Dragging);

        elements = canvas.pointer_move(&elements, Point::new(450.0, 250.0)).unwrap();
        assert_eq!(elements[0].position(), Point::new(200.0, 100.0));

        elements = canvas.pointer_up(&elements, Point::new(450.0, 290.0)).unwrap();
        assert_eq!(elements[0].position(), Point::new(200.0, 120.0));
        assert_eq!(canvas.widget_state(&elements[0].id), WidgetState::Selected);
    }

    #[test]
    fn test_move_without_gesture_is_ignored() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![rect_at(100.0, 100.0)];
        assert!(canvas.pointer_move(&elements, Point::new(300.0, 300.0)).is_none());
    }

    #[test]
    fn test_resize_through_handle() {
        let mut canvas = CanvasInteraction::default();
        let mut elements = vec![rect_at(100.0, 100.0)];
        click(&mut canvas, &elements, Point::new(150.0, 150.0));

        // Rectangle is 150x100, so the se handle sits at (250, 200).
        canvas.pointer_down(&elements, Point::new(252.0, 201.0));
        assert!(matches!(
            canvas.widget_state(&elements[0].id),
            WidgetState::Resizing(h) if h.name() == "se"
        ));
        elements = canvas.pointer_move(&elements, Point::new(300.0, 260.0)).unwrap();
        assert_eq!(elements[0].frame(), Rect::new(100.0, 100.0, 300.0, 260.0));

        // Below the floor: rejected, geometry kept.
        assert!(canvas.pointer_move(&elements, Point::new(105.0, 105.0)).is_none());
        assert!(canvas.pointer_up(&elements, Point::new(105.0, 105.0)).is_none());
        assert_eq!(elements[0].frame(), Rect::new(100.0, 100.0, 300.0, 260.0));
        assert_eq!(canvas.widget_state(&elements[0].id), WidgetState::Selected);
    }

    #[test]
    fn test_rotate_through_handle() {
        let mut canvas = CanvasInteraction::default();
        let mut elements = vec![rect_at(100.0, 100.0)];
        click(&mut canvas, &elements, Point::new(150.0, 150.0));

        // Rotate handle: top-center minus the offset.
        canvas.pointer_down(&elements, Point::new(175.0, 70.0));
        assert_eq!(canvas.widget_state(&elements[0].id), WidgetState::Rotating);
        elements = canvas.pointer_up(&elements, Point::new(400.0, 150.0)).unwrap();
        assert!((elements[0].rotation - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_gesture_restores_original() {
        let mut canvas = CanvasInteraction::default();
        let original = vec![rect_at(100.0, 100.0)];
        canvas.pointer_down(&original, Point::new(150.0, 150.0));
        let moved = canvas.pointer_move(&original, Point::new(400.0, 400.0)).unwrap();
        let restored = canvas.cancel_gesture(&moved).unwrap();
        assert_eq!(restored, original);
        assert_eq!(canvas.widget_state(&original[0].id), WidgetState::Selected);
    }

    #[test]
    fn test_double_click_edit_and_blur() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![Element::create(ElementTemplate::Text, Point::new(0.0, 0.0))];
        assert!(canvas.double_click(&elements, Point::new(50.0, 50.0)));
        assert_eq!(canvas.draft(), Some(TextElement::PLACEHOLDER));

        assert!(canvas.edit_text("  Hello\nworld  "));
        let updated = canvas.blur(&elements).unwrap();
        assert_eq!(updated[0].text_content(), Some("  Hello\nworld  "));
        assert_eq!(canvas.widget_state(&elements[0].id), WidgetState::Selected);
    }

    #[test]
    fn test_double_click_ignored_on_non_text() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![Element::create(ElementTemplate::Image, Point::ZERO)];
        click(&mut canvas, &elements, Point::new(10.0, 10.0));
        assert!(!canvas.double_click(&elements, Point::new(10.0, 10.0)));
        assert!(!canvas.state().is_editing_text());
        assert!(!canvas.edit_text("nope"));
    }

    #[test]
    fn test_click_elsewhere_commits_text() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![Element::create(ElementTemplate::Text, Point::new(0.0, 0.0))];
        canvas.double_click(&elements, Point::new(50.0, 50.0));
        canvas.edit_text("done");

        // Click inside the editor keeps editing.
        assert!(canvas.pointer_down(&elements, Point::new(60.0, 60.0)).is_none());
        assert!(canvas.state().is_editing_text());

        let updated = canvas.pointer_down(&elements, Point::new(900.0, 600.0)).unwrap();
        assert_eq!(updated[0].text_content(), Some("done"));
        assert_eq!(canvas.selected_id(), None);
    }

    #[test]
    fn test_blur_without_change_is_silent() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![Element::create(ElementTemplate::Text, Point::ZERO)];
        canvas.double_click(&elements, Point::new(5.0, 5.0));
        assert!(canvas.blur(&elements).is_none());
    }

    #[test]
    fn test_drop_rectangle_centers_and_selects() {
        let mut canvas = CanvasInteraction::default();
        let elements = canvas.drop_tool(&[], ToolKind::Rectangle, Point::new(400.0, 300.0));
        assert_eq!(elements.len(), 1);
        let el = &elements[0];
        assert_eq!(el.type_name(), "shape");
        assert_eq!(el.center(), Point::new(400.0, 300.0));
        match &el.kind {
            ElementKind::Shape(shape) => {
                assert_eq!(shape.shape_type, ShapeKind::Rectangle);
                assert_eq!(shape.fill, "#4f46e5");
            }
            other => panic!("expected shape, got {other:?}"),
        }
        assert_eq!(canvas.widget_state(&el.id), WidgetState::Selected);
    }

    #[test]
    fn test_drop_under_zoom_uses_canvas_point() {
        let mut canvas = CanvasInteraction::default();
        canvas.camera.set_zoom(0.5);
        let elements = canvas.drop_tool(&[], ToolKind::Circle, Point::new(200.0, 150.0));
        assert_eq!(elements[0].center(), Point::new(400.0, 300.0));
    }

    #[test]
    fn test_drop_text_enters_editing() {
        let mut canvas = CanvasInteraction::default();
        let elements = canvas.drop_tool(&[], ToolKind::Text, Point::new(640.0, 360.0));
        assert_eq!(canvas.widget_state(&elements[0].id), WidgetState::EditingText);
        assert!(canvas.handles(&elements).is_empty());
    }

    #[test]
    fn test_delete_selected() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![rect_at(0.0, 0.0), rect_at(500.0, 500.0)];
        assert!(canvas.delete_selected(&elements).is_none());
        click(&mut canvas, &elements, Point::new(10.0, 10.0));
        let remaining = canvas.delete_selected(&elements).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, elements[1].id);
        assert_eq!(canvas.selected_id(), None);
    }

    #[test]
    fn test_handles_and_display_list_are_screen_space() {
        let mut canvas = CanvasInteraction::default();
        canvas.camera.set_zoom(2.0);
        let elements = vec![rect_at(100.0, 100.0)];
        assert!(canvas.handles(&elements).is_empty());
        click(&mut canvas, &elements, Point::new(250.0, 250.0));

        let handles = canvas.handles(&elements);
        assert_eq!(handles.len(), 9);
        let se = handles.iter().find(|h| h.kind.name() == "se").unwrap();
        assert_eq!(se.position, Point::new(500.0, 400.0));
        assert_eq!(
            canvas.handle_at(&elements, Point::new(503.0, 398.0)).map(|h| h.name()),
            Some("se")
        );

        let items = canvas.display_list(&elements);
        assert_eq!(items[0].frame, Rect::new(200.0, 200.0, 500.0, 400.0));
        assert_eq!(items[0].state, WidgetState::Selected);
    }

    #[test]
    fn test_sync_drops_stale_selection() {
        let mut canvas = CanvasInteraction::default();
        let elements = vec![rect_at(0.0, 0.0)];
        assert!(canvas.select(&elements, &elements[0].id));
        canvas.sync(&[]);
        assert_eq!(canvas.selected_id(), None);
        assert!(!canvas.select(&elements, "missing"));
    }
}
