use chained_engine::{DrawTiming, FrameBuffer, Renderer};

/// Renderer that draws nothing and keeps counts, for headless runs and tests.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub frames: u64,
    pub last_sprites: usize,
    pub last_lines: usize,
    pub size: (u32, u32),
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }
}

impl Renderer for HeadlessRenderer {
    fn backend(&self) -> &'static str {
        "headless"
    }

    fn draw(&mut self, frame: &FrameBuffer) -> DrawTiming {
        self.frames += 1;
        self.last_sprites = frame.sprite_count();
        self.last_lines = frame.debug_lines.len();
        log::trace!(
            "frame {}: {} sprites, {} debug lines",
            self.frames,
            self.last_sprites,
            self.last_lines
        );
        DrawTiming::default()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec4};

    #[test]
    fn counts_frames_and_contents() {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut frame = FrameBuffer::new();
        frame.push_line(vec![Vec2::ZERO, Vec2::ONE], Vec4::ONE);
        r.draw(&frame);
        r.draw(&frame);
        assert_eq!(r.frames, 2);
        assert_eq!(r.last_lines, 1);
        assert_eq!(r.last_sprites, 0);
        r.resize(1024, 768);
        assert_eq!(r.size, (1024, 768));
    }
}
