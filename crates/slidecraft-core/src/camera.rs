//! Zoom transform between screen space and the logical slide canvas.

use crate::slide::CANVAS_SIZE;
use kurbo::{Affine, Point, Size, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level that corresponds to "100%" in the UI.
pub const BASE_ZOOM: f64 = 1.0;

/// Camera maps the fixed 1280×720 canvas onto the screen.
///
/// Screen points are relative to the canvas origin on screen, so the only
/// transform is a uniform scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// Current zoom level (BASE_ZOOM = 100% in UI)
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
    /// Increment used by zoom in/out.
    pub zoom_step: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: BASE_ZOOM,
            min_zoom: 0.25,
            max_zoom: 3.0,
            zoom_step: 0.1,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with explicit bounds; the initial zoom is clamped into them.
    pub fn with_bounds(zoom: f64, min_zoom: f64, max_zoom: f64, zoom_step: f64) -> Self {
        let mut camera = Self {
            zoom: BASE_ZOOM,
            min_zoom,
            max_zoom,
            zoom_step,
        };
        camera.set_zoom(zoom);
        camera
    }

    /// Canvas → screen transform.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.zoom)
    }

    /// Screen → canvas transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom)
    }

    pub fn screen_to_canvas(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn canvas_to_screen(&self, canvas_point: Point) -> Point {
        self.transform() * canvas_point
    }

    /// Convert a raw screen delta to canvas units.
    pub fn screen_delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        delta / self.zoom
    }

    /// On-screen size of the whole canvas.
    pub fn screen_size(&self) -> Size {
        CANVAS_SIZE * self.zoom
    }

    /// Set the zoom, clamped to the allowed range.
    pub fn set_zoom(&mut self, zoom: f64) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        }
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + self.zoom_step);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - self.zoom_step);
    }

    /// Reset to 100%.
    pub fn reset(&mut self) {
        self.set_zoom(BASE_ZOOM);
    }

    /// Pick the largest zoom at which the canvas fits the viewport with padding.
    pub fn fit_to_viewport(&mut self, viewport: Size, padding: f64) {
        let available = Size::new(
            (viewport.width - padding * 2.0).max(1.0),
            (viewport.height - padding * 2.0).max(1.0),
        );
        let scale_x = available.width / CANVAS_SIZE.width;
        let scale_y = available.height / CANVAS_SIZE.height;
        self.set_zoom(scale_x.min(scale_y));
    }
}
