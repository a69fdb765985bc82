//! Slidecraft Core Library
//!
//! Platform-agnostic core of the Slidecraft presentation editor: the slide
//! document model, the canvas interaction engine, the slide list, themes,
//! the persistence bridge and the editor controller tying them together.

pub mod bridge;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod editor;
pub mod elements;
pub mod generate;
pub mod history;
pub mod presentation;
pub mod selection;
pub mod slide;
pub mod slide_list;
pub mod storage;
pub mod theme;
pub mod tools;
pub mod widget;

pub use camera::Camera;
pub use canvas::{CanvasInteraction, RenderItem};
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, EditorError, EditorResult, Notice, NoticeLevel, SaveReport};
pub use elements::{Element, ElementId, ElementKind, ElementStyle, ElementTemplate, ShapeKind};
pub use generate::{GenerationError, GenerationRequest, OutlineGenerator, SlideOutline};
pub use presentation::Presentation;
pub use selection::{Handle, HandleKind};
pub use slide::{Background, Slide, SlideId, Transition};
pub use slide_list::{SlideList, SlideListError, Thumbnail};
pub use storage::{FileStore, MemoryStore, SlideRecord, SlideStore, StorageError};
pub use theme::{Theme, catalog, find_theme};
pub use tools::ToolKind;
pub use widget::{InteractionState, WidgetState};
