//! Contract for host renderers.
//!
//! The engine never touches a GPU. Each frame it fills a [`FrameBuffer`] and
//! hands it to whatever implements [`Renderer`]: an OpenGL or wgpu backend in
//! a windowed host, or the headless renderer the CLI runner uses.

use super::instance::FrameBuffer;

/// Timing information from a draw call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawTiming {
    /// Time spent submitting draw calls (microseconds)
    pub draw_us: u32,
    /// Time spent in GPU rasterization (microseconds, if measurable)
    pub raster_us: u32,
}

/// Renderer trait for host backends.
///
/// # Example Implementation
///
/// ```ignore
/// struct GlRenderer {
///     sprite_vbo: glow::Buffer,
///     atlas: glow::Texture,
///     // ...
/// }
///
/// impl Renderer for GlRenderer {
///     fn backend(&self) -> &'static str { "opengl" }
///
///     fn draw(&mut self, frame: &FrameBuffer) -> DrawTiming {
///         // Upload frame.sprite_floats(), set frame.projection, draw quads...
///     }
///
///     fn resize(&mut self, width: u32, height: u32) {
///         // Update the viewport...
///     }
/// }
/// ```
pub trait Renderer {
    /// Backend identifier (e.g., "opengl", "wgpu", "headless")
    fn backend(&self) -> &'static str;

    /// Draw a complete frame. Returns timing information for profiling.
    fn draw(&mut self, frame: &FrameBuffer) -> DrawTiming;

    /// Handle window resize.
    fn resize(&mut self, width: u32, height: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counting {
        sprites: usize,
        size: (u32, u32),
    }

    impl Renderer for Counting {
        fn backend(&self) -> &'static str {
            "counting"
        }
        fn draw(&mut self, frame: &FrameBuffer) -> DrawTiming {
            self.sprites += frame.sprite_count();
            DrawTiming::default()
        }
        fn resize(&mut self, width: u32, height: u32) {
            self.size = (width, height);
        }
    }

    #[test]
    fn renderer_is_object_safe() {
        let mut r = Counting { sprites: 0, size: (0, 0) };
        let dyn_r: &mut dyn Renderer = &mut r;
        assert_eq!(dyn_r.draw(&FrameBuffer::new()), DrawTiming::default());
        dyn_r.resize(640, 480);
        assert_eq!(dyn_r.backend(), "counting");
        assert_eq!(r.size, (640, 480));
    }
}
