//! Interaction state for elements on the canvas.
//!
//! Elements remain pure data; this module tracks which element the pointer
//! is working on and how. Only one element is active at a time.

mod state;

pub use state::{Gesture, InteractionState, WidgetState};
