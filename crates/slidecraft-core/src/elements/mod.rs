//! Slide element definitions.
//!
//! An [`Element`] is one positioned, typed visual object on a slide. The
//! common geometry (frame, rotation) and the optional style bag live on the
//! element itself; variant data lives in [`ElementKind`].

mod chart;
mod image;
mod shape;
mod text;

pub use chart::{ChartData, ChartDataset, ChartElement, ChartKind};
pub use image::ImageElement;
pub use shape::{ShapeElement, ShapeKind};
pub use text::TextElement;

use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for elements within a slide.
pub type ElementId = String;

/// Generate a fresh element identifier.
pub fn new_element_id() -> ElementId {
    format!("el-{}", Uuid::new_v4().simple())
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Optional style bag shared by every element variant.
///
/// Every attribute is optional so that a style written by an older editor
/// round-trips without gaining fields it never had.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
}

impl ElementStyle {
    /// Style used for slide titles.
    pub fn title(font_size: f64) -> Self {
        Self {
            font_size: Some(font_size),
            font_weight: Some("bold".to_string()),
            color: Some(DEFAULT_TEXT_COLOR.to_string()),
            text_align: Some(TextAlign::Center),
            ..Self::default()
        }
    }

    /// Style used for body and bullet text.
    pub fn body(font_size: f64) -> Self {
        Self {
            font_size: Some(font_size),
            font_weight: Some("normal".to_string()),
            color: Some(DEFAULT_BODY_COLOR.to_string()),
            text_align: Some(TextAlign::Left),
            ..Self::default()
        }
    }

    /// Whether the font weight reads as bold (`bold`, `bolder` or a numeric weight >= 600).
    pub fn is_bold(&self) -> bool {
        match self.font_weight.as_deref() {
            Some("bold") | Some("bolder") => true,
            Some(weight) => weight.parse::<u32>().map(|w| w >= 600).unwrap_or(false),
            None => false,
        }
    }
}

/// Default color for headings.
pub const DEFAULT_TEXT_COLOR: &str = "#1f2937";
/// Default color for body text.
pub const DEFAULT_BODY_COLOR: &str = "#374151";

/// Variant-specific element data, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextElement),
    Image(ImageElement),
    Shape(ShapeElement),
    Chart(ChartElement),
}

/// What to build when creating a new element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementTemplate {
    Text,
    Image,
    Shape(ShapeKind),
    Chart,
}

impl ElementTemplate {
    /// Default box size for elements built from this template.
    pub fn default_size(&self) -> Size {
        match self {
            ElementTemplate::Text => TextElement::DEFAULT_SIZE,
            ElementTemplate::Image => ImageElement::DEFAULT_SIZE,
            ElementTemplate::Shape(kind) => kind.default_size(),
            ElementTemplate::Chart => ChartElement::DEFAULT_SIZE,
        }
    }
}

/// A positioned, typed visual element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Identifier, unique within its slide. Empty only for records written
    /// by a buggy upstream; the bridge patches those on decode.
    #[serde(default)]
    pub id: ElementId,
    /// Left edge in canvas units.
    pub x: f64,
    /// Top edge in canvas units.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees about the element center.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ElementStyle>,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create a new element with kind-appropriate defaults, top-left at `position`.
    pub fn create(template: ElementTemplate, position: Point) -> Self {
        let size = template.default_size();
        let (kind, style) = match template {
            ElementTemplate::Text => (
                ElementKind::Text(TextElement::new(TextElement::PLACEHOLDER)),
                Some(ElementStyle::body(24.0)),
            ),
            ElementTemplate::Image => (ElementKind::Image(ImageElement::placeholder()), None),
            ElementTemplate::Shape(shape_kind) => {
                (ElementKind::Shape(ShapeElement::new(shape_kind)), None)
            }
            ElementTemplate::Chart => (ElementKind::Chart(ChartElement::default()), None),
        };
        Self {
            id: new_element_id(),
            x: position.x,
            y: position.y,
            width: size.width,
            height: size.height,
            rotation: 0.0,
            style,
            kind,
        }
    }

    /// Create a text element with the given content, frame and style.
    pub fn text(content: impl Into<String>, frame: Rect, style: ElementStyle) -> Self {
        Self {
            id: new_element_id(),
            x: frame.x0,
            y: frame.y0,
            width: frame.width(),
            height: frame.height(),
            rotation: 0.0,
            style: Some(style),
            kind: ElementKind::Text(TextElement::new(content)),
        }
    }

    /// Deep copy with a freshly generated id.
    pub fn clone_with_new_id(&self) -> Self {
        let mut clone = self.clone();
        clone.regenerate_id();
        clone
    }

    /// Replace the id with a fresh one.
    pub fn regenerate_id(&mut self) {
        self.id = new_element_id();
    }

    /// Assign an id if the element has none. Returns true if one was assigned.
    pub fn ensure_id(&mut self) -> bool {
        if self.id.trim().is_empty() {
            self.regenerate_id();
            true
        } else {
            false
        }
    }

    /// Wire name of the element type.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Text(_) => "text",
            ElementKind::Image(_) => "image",
            ElementKind::Shape(_) => "shape",
            ElementKind::Chart(_) => "chart",
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, ElementKind::Text(_))
    }

    /// Text content, if this is a text element.
    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text(t) => Some(&t.content),
            _ => None,
        }
    }

    /// Top-left corner.
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, position: Point) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Unrotated frame in canvas coordinates.
    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    pub fn set_frame(&mut self, frame: Rect) {
        self.x = frame.x0;
        self.y = frame.y0;
        self.width = frame.width();
        self.height = frame.height();
    }

    pub fn center(&self) -> Point {
        self.frame().center()
    }

    /// Translate by a delta in canvas units.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Transform from element-local (unrotated) space to canvas space.
    pub fn rotation_transform(&self) -> Affine {
        Affine::rotate_about(self.rotation.to_radians(), self.center())
    }

    /// Map a canvas point into the element's unrotated frame.
    pub fn to_local(&self, point: Point) -> Point {
        if self.rotation.abs() < f64::EPSILON {
            return point;
        }
        self.rotation_transform().inverse() * point
    }

    /// Axis-aligned bounding box of the rotated frame.
    pub fn bounds(&self) -> Rect {
        let frame = self.frame();
        if self.rotation.abs() < f64::EPSILON {
            return frame;
        }
        let rot = self.rotation_transform();
        let corners = [
            Point::new(frame.x0, frame.y0),
            Point::new(frame.x1, frame.y0),
            Point::new(frame.x1, frame.y1),
            Point::new(frame.x0, frame.y1),
        ];
        let rotated: Vec<Point> = corners.iter().map(|&p| rot * p).collect();
        let min_x = rotated.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = rotated.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = rotated.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = rotated.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rect::new(min_x, min_y, max_x, max_y)
    }

    /// Check if a canvas point hits this element.
    ///
    /// Shapes test against their outline; every other variant hits anywhere
    /// inside its frame.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.to_local(point);
        let frame = self.frame();
        match &self.kind {
            ElementKind::Shape(shape) if tolerance <= 0.0 => shape.contains(frame, local),
            ElementKind::Shape(shape) => {
                shape.contains(frame, local) || {
                    frame.inflate(tolerance, tolerance).contains(local)
                        && !frame.contains(local)
                }
            }
            _ => frame.inflate(tolerance, tolerance).contains(local),
        }
    }
}

/// Topmost element of a z-ordered list hit by a canvas point.
pub fn topmost_at(elements: &[Element], point: Point, tolerance: f64) -> Option<&Element> {
    elements.iter().rev().find(|e| e.hit_test(point, tolerance))
}
