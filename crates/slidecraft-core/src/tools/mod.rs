//! Toolbar tools that can be dragged onto the canvas.

use crate::elements::{Element, ElementTemplate, ShapeKind};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Available tool tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Text,
    Image,
    Rectangle,
    Circle,
    Triangle,
    Star,
    Arrow,
    Chart,
}

impl ToolKind {
    /// Tools in toolbar order.
    pub fn all() -> &'static [ToolKind] {
        &[
            ToolKind::Text,
            ToolKind::Image,
            ToolKind::Rectangle,
            ToolKind::Circle,
            ToolKind::Triangle,
            ToolKind::Star,
            ToolKind::Arrow,
            ToolKind::Chart,
        ]
    }

    /// Drag payload name.
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Text => "text",
            ToolKind::Image => "image",
            ToolKind::Rectangle => "rectangle",
            ToolKind::Circle => "circle",
            ToolKind::Triangle => "triangle",
            ToolKind::Star => "star",
            ToolKind::Arrow => "arrow",
            ToolKind::Chart => "chart",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.name() == name)
    }

    /// Element template this tool places.
    pub fn template(&self) -> ElementTemplate {
        match self {
            ToolKind::Text => ElementTemplate::Text,
            ToolKind::Image => ElementTemplate::Image,
            ToolKind::Rectangle => ElementTemplate::Shape(ShapeKind::Rectangle),
            ToolKind::Circle => ElementTemplate::Shape(ShapeKind::Circle),
            ToolKind::Triangle => ElementTemplate::Shape(ShapeKind::Triangle),
            ToolKind::Star => ElementTemplate::Shape(ShapeKind::Star),
            ToolKind::Arrow => ElementTemplate::Shape(ShapeKind::Arrow),
            ToolKind::Chart => ElementTemplate::Chart,
        }
    }

    /// Whether dropping this tool opens the new element for text editing.
    pub fn edits_on_drop(&self) -> bool {
        matches!(self, ToolKind::Text)
    }

    /// Build the element dropped at `canvas_point`. The element is centered
    /// on the drop point.
    pub fn create_at(&self, canvas_point: Point) -> Element {
        let template = self.template();
        let size = template.default_size();
        let top_left = canvas_point - Vec2::new(size.width / 2.0, size.height / 2.0);
        Element::create(template, top_left)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::ElementKind;

    #[test]
    fn test_names_roundtrip() {
        for tool in ToolKind::all() {
            assert_eq!(ToolKind::from_name(tool.name()), Some(*tool));
        }
        assert_eq!(ToolKind::from_name("pen"), None);
    }

    #[test]
    fn test_rectangle_drop_is_centered() {
        let el = ToolKind::Rectangle.create_at(Point::new(400.0, 300.0));
        match &el.kind {
            ElementKind::Shape(shape) => {
                assert_eq!(shape.shape_type, ShapeKind::Rectangle);
                assert_eq!(shape.fill, "#4f46e5");
            }
            other => panic!("expected shape, got {other:?}"),
        }
        assert_eq!(el.center(), Point::new(400.0, 300.0));
        assert_eq!(el.position(), Point::new(325.0, 250.0));
    }

    #[test]
    fn test_only_text_edits_on_drop() {
        assert!(ToolKind::Text.edits_on_drop());
        assert!(ToolKind::all().iter().filter(|t| t.edits_on_drop()).count() == 1);
    }
}
