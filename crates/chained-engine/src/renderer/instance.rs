use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};

use crate::assets::atlas::AtlasFrame;

/// Per-instance sprite data handed to the host renderer.
/// 13 floats = 52 bytes stride. Position is the sprite center in world pixels.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SpriteInstance {
    pub x: f32,
    pub y: f32,
    /// Rendered width in world pixels.
    pub width: f32,
    /// Rendered height in world pixels.
    pub height: f32,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    /// UV rect, bottom-left origin.
    pub u: f32,
    pub v: f32,
    pub uw: f32,
    pub vh: f32,
}

impl SpriteInstance {
    pub const FLOATS: usize = 13;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// A white, opaque sprite showing `frame` at `size` pixels.
    pub fn new(center: Vec2, size: Vec2, rotation: f32, frame: &AtlasFrame) -> Self {
        let uv = frame.uv_rect;
        Self {
            x: center.x,
            y: center.y,
            width: size.x,
            height: size.y,
            rotation,
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
            u: uv.x,
            v: uv.y,
            uw: uv.z,
            vh: uv.w,
        }
    }

    /// Multiply the sprite color by `tint` (rgba).
    pub fn with_tint(mut self, tint: Vec4) -> Self {
        self.r = tint.x;
        self.g = tint.y;
        self.b = tint.z;
        self.a = tint.w;
        self
    }

    pub fn tint(&self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }
}

/// A debug polyline in world pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugLine {
    pub points: Vec<Vec2>,
    /// RGBA color.
    pub color: Vec4,
}

/// Everything the host renderer needs to draw one frame.
/// Sprites are drawn in push order, debug lines on top.
pub struct FrameBuffer {
    pub sprites: Vec<SpriteInstance>,
    pub debug_lines: Vec<DebugLine>,
    pub projection: Mat4,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            sprites: Vec::with_capacity(256),
            debug_lines: Vec::new(),
            projection: Mat4::IDENTITY,
        }
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
        self.debug_lines.clear();
        self.projection = Mat4::IDENTITY;
    }

    pub fn push_sprite(&mut self, sprite: SpriteInstance) {
        self.sprites.push(sprite);
    }

    pub fn push_line(&mut self, points: Vec<Vec2>, color: Vec4) {
        if points.len() >= 2 {
            self.debug_lines.push(DebugLine { points, color });
        }
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Sprite data as raw floats, ready for a vertex buffer upload.
    pub fn sprite_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.sprites)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> AtlasFrame {
        AtlasFrame {
            uv_rect: Vec4::new(0.25, 0.5, 0.25, 0.5),
            size_px: Vec2::new(32.0, 32.0),
            duration: 0,
        }
    }

    #[test]
    fn instance_size_matches_stride() {
        assert_eq!(std::mem::size_of::<SpriteInstance>(), SpriteInstance::STRIDE_BYTES);
    }

    #[test]
    fn new_copies_uv_and_is_white() {
        let s = SpriteInstance::new(Vec2::new(1.0, 2.0), Vec2::new(64.0, 32.0), 0.5, &frame());
        assert_eq!((s.u, s.v, s.uw, s.vh), (0.25, 0.5, 0.25, 0.5));
        assert_eq!(s.tint(), Vec4::ONE);
        assert_eq!(s.width, 64.0);
    }

    #[test]
    fn floats_view_covers_all_sprites() {
        let mut fb = FrameBuffer::new();
        fb.push_sprite(SpriteInstance::new(Vec2::ZERO, Vec2::ONE, 0.0, &frame()));
        fb.push_sprite(
            SpriteInstance::new(Vec2::new(7.0, 8.0), Vec2::ONE, 0.0, &frame())
                .with_tint(Vec4::new(1.0, 1.0, 0.0, 1.0)),
        );
        let floats = fb.sprite_floats();
        assert_eq!(floats.len(), 2 * SpriteInstance::FLOATS);
        assert_eq!(floats[SpriteInstance::FLOATS], 7.0);
        assert_eq!(floats[SpriteInstance::FLOATS + 7], 0.0);
    }

    #[test]
    fn degenerate_lines_dropped_and_clear_resets() {
        let mut fb = FrameBuffer::new();
        fb.push_line(vec![Vec2::ZERO], Vec4::ONE);
        assert!(fb.debug_lines.is_empty());
        fb.push_line(vec![Vec2::ZERO, Vec2::X], Vec4::ONE);
        fb.set_projection(Mat4::from_scale(glam::Vec3::splat(2.0)));
        fb.clear();
        assert!(fb.debug_lines.is_empty());
        assert_eq!(fb.projection, Mat4::IDENTITY);
    }
}
