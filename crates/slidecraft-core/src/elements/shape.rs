//! Shape elements: rectangles, circles, triangles, stars and arrows.

use kurbo::{BezPath, Ellipse, Point, Rect, Shape as KurboShape, Size};
use serde::{Deserialize, Serialize};

/// Geometric kind of a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Star,
    Arrow,
}

impl ShapeKind {
    /// Get all shape kinds.
    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Triangle,
            ShapeKind::Star,
            ShapeKind::Arrow,
        ]
    }

    /// Parse a wire name, returning `None` for anything unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rectangle" => Some(ShapeKind::Rectangle),
            "circle" => Some(ShapeKind::Circle),
            "triangle" => Some(ShapeKind::Triangle),
            "star" => Some(ShapeKind::Star),
            "arrow" => Some(ShapeKind::Arrow),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Circle => "circle",
            ShapeKind::Triangle => "triangle",
            ShapeKind::Star => "star",
            ShapeKind::Arrow => "arrow",
        }
    }

    /// Default (fill, stroke) colors.
    pub fn default_colors(&self) -> (&'static str, &'static str) {
        match self {
            ShapeKind::Rectangle => ("#4f46e5", "#3730a3"),
            ShapeKind::Circle => ("#10b981", "#047857"),
            ShapeKind::Triangle => ("#f59e0b", "#b45309"),
            ShapeKind::Star => ("#ec4899", "#be185d"),
            ShapeKind::Arrow => ("#6366f1", "#4338ca"),
        }
    }

    pub fn default_size(&self) -> Size {
        match self {
            ShapeKind::Rectangle => Size::new(150.0, 100.0),
            ShapeKind::Arrow => Size::new(150.0, 80.0),
            ShapeKind::Circle | ShapeKind::Triangle | ShapeKind::Star => Size::new(100.0, 100.0),
        }
    }

    /// Outline of this shape filling `frame`.
    pub fn path(&self, frame: Rect) -> BezPath {
        match self {
            ShapeKind::Rectangle => frame.to_path(0.1),
            ShapeKind::Circle => Ellipse::from_rect(frame).to_path(0.1),
            ShapeKind::Triangle => polygon(&[
                Point::new(frame.center().x, frame.y0),
                Point::new(frame.x1, frame.y1),
                Point::new(frame.x0, frame.y1),
            ]),
            ShapeKind::Star => {
                let center = frame.center();
                let (rx, ry) = (frame.width() / 2.0, frame.height() / 2.0);
                let points: Vec<Point> = (0..10)
                    .map(|i| {
                        let angle = -std::f64::consts::FRAC_PI_2
                            + i as f64 * std::f64::consts::PI / 5.0;
                        let scale = if i % 2 == 0 { 1.0 } else { STAR_INNER_RATIO };
                        Point::new(
                            center.x + rx * scale * angle.cos(),
                            center.y + ry * scale * angle.sin(),
                        )
                    })
                    .collect();
                polygon(&points)
            }
            ShapeKind::Arrow => {
                // Shaft occupies the middle 40% of the height, head the last 35% of the width.
                let head_x = frame.x0 + frame.width() * 0.65;
                let shaft_top = frame.y0 + frame.height() * 0.3;
                let shaft_bottom = frame.y0 + frame.height() * 0.7;
                polygon(&[
                    Point::new(frame.x0, shaft_top),
                    Point::new(head_x, shaft_top),
                    Point::new(head_x, frame.y0),
                    Point::new(frame.x1, frame.center().y),
                    Point::new(head_x, frame.y1),
                    Point::new(head_x, shaft_bottom),
                    Point::new(frame.x0, shaft_bottom),
                ])
            }
        }
    }
}

const STAR_INNER_RATIO: f64 = 0.4;

fn polygon(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for &p in rest {
            path.line_to(p);
        }
        path.close_path();
    }
    path
}

/// Variant data of a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeElement {
    pub shape_type: ShapeKind,
    pub fill: String,
    pub stroke: String,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
    /// Optional caption drawn inside the shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

fn default_stroke_width() -> f64 {
    ShapeElement::DEFAULT_STROKE_WIDTH
}

impl ShapeElement {
    pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

    /// Create a shape with the kind's default colors.
    pub fn new(kind: ShapeKind) -> Self {
        let (fill, stroke) = kind.default_colors();
        Self {
            shape_type: kind,
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            stroke_width: Self::DEFAULT_STROKE_WIDTH,
            content: None,
        }
    }

    /// Check whether a point in the element's unrotated space lies inside the outline.
    pub fn contains(&self, frame: Rect, point: Point) -> bool {
        match self.shape_type {
            ShapeKind::Rectangle => frame.contains(point),
            ShapeKind::Circle => Ellipse::from_rect(frame).contains(point),
            _ => self.shape_type.path(frame).contains(point),
        }
    }
}
