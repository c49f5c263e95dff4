use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};
use serde::{Deserialize, Serialize};

/// Smallest allowed zoom factor.
pub const ZOOM_MIN: f32 = 0.05;
/// Largest allowed zoom factor.
pub const ZOOM_MAX: f32 = 100.0;

/// Orthographic camera with pan and zoom.
///
/// The world is y-up. `position` is the world-space corner of the viewport at
/// the smallest x and y (the screen's bottom-left). Screen coordinates are
/// pixels with the same orientation, origin at that corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec2,
    zoom: f32,
    viewport: Vec2,
}

/// GPU-side uniform data for the camera.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub projection: [[f32; 4]; 4],
}

/// Serialized camera, as stored in scene files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub pos: Vec2,
    pub zoom: f32,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            zoom: 1.0,
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    /// Resize the viewport (e.g. on window resize). Position and zoom are kept.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Set the zoom factor, clamped to [`ZOOM_MIN`, `ZOOM_MAX`].
    /// Non-finite values are ignored so zoom always stays positive.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }

    /// Move the camera by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.position += delta / self.zoom;
    }

    /// Multiply the zoom by `factor`, keeping the world point under
    /// `screen_point` fixed on screen.
    pub fn zoom_at_screen(&mut self, factor: f32, screen_point: Vec2) {
        let before = self.screen_to_world(screen_point);
        self.set_zoom(self.zoom * factor);
        let after = self.screen_to_world(screen_point);
        self.position += before - after;
    }

    /// Build an orthographic projection matrix over the visible world rectangle.
    pub fn projection_matrix(&self) -> Mat4 {
        let visible = self.viewport / self.zoom;
        let left = self.position.x;
        let right = self.position.x + visible.x;
        let bottom = self.position.y;
        let top = self.position.y + visible.y;
        Mat4::orthographic_rh_gl(left, right, bottom, top, -1.0, 1.0)
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            projection: self.projection_matrix().to_cols_array_2d(),
        }
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        self.position + screen / self.zoom
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        (world - self.position) * self.zoom
    }

    /// Visible world rectangle as (min, max).
    pub fn visible_rect(&self) -> (Vec2, Vec2) {
        (self.position, self.position + self.viewport / self.zoom)
    }

    /// Check if a world-space point is visible in the viewport.
    pub fn is_visible(&self, point: Vec2) -> bool {
        let (min, max) = self.visible_rect();
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Check if a world-space rectangle overlaps the viewport.
    pub fn is_rect_visible(&self, rect_center: Vec2, rect_half_size: Vec2) -> bool {
        let (min, max) = self.visible_rect();
        let rect_min = rect_center - rect_half_size;
        let rect_max = rect_center + rect_half_size;
        rect_max.x >= min.x && rect_min.x <= max.x && rect_max.y >= min.y && rect_min.y <= max.y
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            pos: self.position,
            zoom: self.zoom,
        }
    }

    /// Restore position and zoom from a scene file. The zoom is clamped.
    pub fn apply_state(&mut self, state: CameraState) {
        self.set_position(state.pos);
        self.set_zoom(state.zoom);
    }
}
