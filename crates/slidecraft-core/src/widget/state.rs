//! Widget state definitions.

use crate::elements::{Element, ElementId};
use crate::selection::HandleKind;
use kurbo::Vec2;

/// The UI state of a single element, as seen by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// Normal display state - no interaction.
    #[default]
    Idle,
    /// Element is selected (shows handles, can be moved/resized).
    Selected,
    /// Element follows the pointer.
    Dragging,
    /// A resize handle is being dragged.
    Resizing(HandleKind),
    /// The rotate handle is being dragged.
    Rotating,
    /// Text is being edited in place.
    EditingText,
}

impl WidgetState {
    /// Check if widget is selected (any state other than idle).
    pub fn is_selected(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Check if a pointer gesture is in progress.
    pub fn is_gesture(&self) -> bool {
        matches!(self, Self::Dragging | Self::Resizing(_) | Self::Rotating)
    }
}

/// Transient data for an in-progress pointer gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Offset from the element's top-left to the grab point, in canvas units.
    Drag { grab_offset: Vec2 },
    Resize { handle: HandleKind },
    Rotate,
}

/// Interaction state of the canvas as a whole.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionState {
    /// Nothing selected.
    #[default]
    Idle,
    Selected { id: ElementId },
    /// A gesture is in progress. `original` is the element as it was at
    /// pointer-down, used to cancel the gesture.
    Active {
        id: ElementId,
        gesture: Gesture,
        original: Element,
    },
    /// In-place text edit with the current draft.
    EditingText { id: ElementId, draft: String },
}

impl InteractionState {
    /// Id of the selected element, whatever the phase.
    pub fn selected_id(&self) -> Option<&str> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Selected { id }
            | InteractionState::Active { id, .. }
            | InteractionState::EditingText { id, .. } => Some(id),
        }
    }

    /// State of one element.
    pub fn widget_state(&self, element_id: &str) -> WidgetState {
        if self.selected_id() != Some(element_id) {
            return WidgetState::Idle;
        }
        match self {
            InteractionState::Idle => WidgetState::Idle,
            InteractionState::Selected { .. } => WidgetState::Selected,
            InteractionState::Active { gesture, .. } => match gesture {
                Gesture::Drag { .. } => WidgetState::Dragging,
                Gesture::Resize { handle } => WidgetState::Resizing(*handle),
                Gesture::Rotate => WidgetState::Rotating,
            },
            InteractionState::EditingText { .. } => WidgetState::EditingText,
        }
    }

    pub fn is_editing_text(&self) -> bool {
        matches!(self, InteractionState::EditingText { .. })
    }

    pub fn is_gesture(&self) -> bool {
        matches!(self, InteractionState::Active { .. })
    }
}
