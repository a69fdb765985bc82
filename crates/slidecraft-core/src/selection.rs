//! Selection handles and the resize/rotate geometry behind them.

use crate::elements::Element;
use kurbo::{Affine, Point, Rect};
use serde::{Deserialize, Serialize};

/// Distance from the top edge to the rotation handle (in canvas units).
pub const ROTATE_HANDLE_OFFSET: f64 = 30.0;

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Edge positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner handle, resizes both dimensions.
    Corner(Corner),
    /// Edge midpoint handle, resizes one dimension.
    Edge(Edge),
    /// Rotation handle (positioned above the element).
    Rotate,
}

impl HandleKind {
    /// The eight resize handles, corners first.
    pub const RESIZE: [HandleKind; 8] = [
        HandleKind::Corner(Corner::TopLeft),
        HandleKind::Corner(Corner::TopRight),
        HandleKind::Corner(Corner::BottomLeft),
        HandleKind::Corner(Corner::BottomRight),
        HandleKind::Edge(Edge::Top),
        HandleKind::Edge(Edge::Bottom),
        HandleKind::Edge(Edge::Right),
        HandleKind::Edge(Edge::Left),
    ];

    /// Compass name (`nw`, `n`, ...), or `rotate`.
    pub fn name(&self) -> &'static str {
        match self {
            HandleKind::Corner(Corner::TopLeft) => "nw",
            HandleKind::Corner(Corner::TopRight) => "ne",
            HandleKind::Corner(Corner::BottomLeft) => "sw",
            HandleKind::Corner(Corner::BottomRight) => "se",
            HandleKind::Edge(Edge::Top) => "n",
            HandleKind::Edge(Edge::Bottom) => "s",
            HandleKind::Edge(Edge::Right) => "e",
            HandleKind::Edge(Edge::Left) => "w",
            HandleKind::Rotate => "rotate",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::RESIZE
            .iter()
            .copied()
            .chain(std::iter::once(HandleKind::Rotate))
            .find(|h| h.name() == name)
    }

    pub fn is_resize(&self) -> bool {
        !matches!(self, HandleKind::Rotate)
    }

    /// Position of this handle on an unrotated frame.
    fn anchor(&self, frame: Rect) -> Point {
        let center = frame.center();
        match self {
            HandleKind::Corner(Corner::TopLeft) => Point::new(frame.x0, frame.y0),
            HandleKind::Corner(Corner::TopRight) => Point::new(frame.x1, frame.y0),
            HandleKind::Corner(Corner::BottomLeft) => Point::new(frame.x0, frame.y1),
            HandleKind::Corner(Corner::BottomRight) => Point::new(frame.x1, frame.y1),
            HandleKind::Edge(Edge::Top) => Point::new(center.x, frame.y0),
            HandleKind::Edge(Edge::Bottom) => Point::new(center.x, frame.y1),
            HandleKind::Edge(Edge::Right) => Point::new(frame.x1, center.y),
            HandleKind::Edge(Edge::Left) => Point::new(frame.x0, center.y),
            HandleKind::Rotate => Point::new(center.x, frame.y0 - ROTATE_HANDLE_OFFSET),
        }
    }
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in canvas coordinates.
    pub position: Point,
    pub kind: HandleKind,
}

impl Handle {
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Check if a point (in canvas coordinates) hits this handle.
    /// `tolerance` should already be divided by the zoom.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let dx = point.x - self.position.x;
        let dy = point.y - self.position.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }
}

/// Handles for a selected element, rotated with it.
pub fn get_handles(element: &Element) -> Vec<Handle> {
    let frame = element.frame();
    let rot = element.rotation_transform();
    HandleKind::RESIZE
        .iter()
        .chain(std::iter::once(&HandleKind::Rotate))
        .map(|kind| Handle::new(rot * kind.anchor(frame), *kind))
        .collect()
}

/// Find which handle (if any) is hit at the given point.
/// The rotate handle is checked last so corner handles win on tiny elements.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(element)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// Compute the frame produced by dragging `handle` to `pointer`.
///
/// `pointer` is in canvas space; it is mapped into the element's unrotated
/// frame first. The edges opposite the handle stay fixed. Returns `None`
/// when the result would not be strictly larger than `min_size` in both
/// dimensions, in which case the caller keeps the previous geometry.
pub fn resize_frame(
    element: &Element,
    handle: HandleKind,
    pointer: Point,
    min_size: f64,
) -> Option<Rect> {
    let frame = element.frame();
    let p = element.to_local(pointer);
    let (mut x0, mut y0, mut x1, mut y1) = (frame.x0, frame.y0, frame.x1, frame.y1);
    match handle {
        HandleKind::Corner(Corner::TopLeft) => {
            x0 = p.x;
            y0 = p.y;
        }
        HandleKind::Corner(Corner::TopRight) => {
            x1 = p.x;
            y0 = p.y;
        }
        HandleKind::Corner(Corner::BottomLeft) => {
            x0 = p.x;
            y1 = p.y;
        }
        HandleKind::Corner(Corner::BottomRight) => {
            x1 = p.x;
            y1 = p.y;
        }
        HandleKind::Edge(Edge::Top) => y0 = p.y,
        HandleKind::Edge(Edge::Bottom) => y1 = p.y,
        HandleKind::Edge(Edge::Left) => x0 = p.x,
        HandleKind::Edge(Edge::Right) => x1 = p.x,
        HandleKind::Rotate => return None,
    }
    let (width, height) = (x1 - x0, y1 - y0);
    if width <= min_size || height <= min_size {
        return None;
    }
    let resized = Rect::new(x0, y0, x1, y1);
    if element.rotation.abs() < f64::EPSILON {
        return Some(resized);
    }
    // Rotation is about the frame center, which moves with the resize.
    // Shift the frame so the fixed edges keep their canvas position.
    let drift = frame.center() - resized.center();
    let rotated = (Affine::rotate(element.rotation.to_radians()) * drift.to_point()).to_vec2();
    Some(resized + (drift - rotated))
}

/// Apply a resize in place. Returns false (and leaves the element untouched)
/// if the result would violate the minimum size.
pub fn apply_resize(element: &mut Element, handle: HandleKind, pointer: Point, min_size: f64) -> bool {
    match resize_frame(element, handle, pointer, min_size) {
        Some(frame) => {
            element.set_frame(frame);
            true
        }
        None => {
            log::debug!(
                "Rejected {} resize of {}: below minimum size {}",
                handle.name(),
                element.id,
                min_size
            );
            false
        }
    }
}

/// Rotation (degrees, 0 = handle straight up, clockwise, normalised to [0, 360))
/// that points the rotate handle at `pointer`.
pub fn rotation_towards(element: &Element, pointer: Point, snap_to_15deg: bool) -> f64 {
    let center = element.center();
    let dx = pointer.x - center.x;
    let dy = pointer.y - center.y;
    let mut angle = (dy.atan2(dx) + std::f64::consts::FRAC_PI_2).to_degrees();
    if snap_to_15deg {
        angle = (angle / 15.0).round() * 15.0;
    }
    angle.rem_euclid(360.0)
}

/// Apply rotation to an element. Returns the new rotation in degrees.
pub fn apply_rotation(element: &mut Element, pointer: Point, snap_to_15deg: bool) -> f64 {
    let angle = rotation_towards(element, pointer, snap_to_15deg);
    element.rotation = angle;
    angle
}
