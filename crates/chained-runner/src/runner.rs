use chained_engine::{
    AssetPalette, DrawTiming, EngineConfig, EngineContext, FixedTimestep, FrameBuffer,
    GameState, InputEvent, InputQueue, MainMenu, Renderer, SpriteAtlas, StateStack,
};

const FALLBACK_DT: f32 = 1.0 / 60.0;

/// Drives the state stack at a fixed rate and keeps the latest frame.
///
/// The host pushes input as it arrives, calls `tick` with the real frame time,
/// then hands `frame()` to its renderer.
pub struct Runner {
    ctx: EngineContext,
    stack: StateStack,
    input: InputQueue,
    frame: FrameBuffer,
    timestep: FixedTimestep,
}

impl Runner {
    pub fn new(mut ctx: EngineContext, initial: Box<dyn GameState>) -> Self {
        let dt = ctx.config.fixed_dt;
        let dt = if dt.is_finite() && dt > 0.0 {
            dt
        } else {
            log::warn!("invalid fixed_dt {}, using {}", dt, FALLBACK_DT);
            FALLBACK_DT
        };

        let mut stack = StateStack::new();
        stack.push(initial, &mut ctx);

        Self {
            ctx,
            stack,
            input: InputQueue::new(),
            frame: FrameBuffer::new(),
            timestep: FixedTimestep::new(dt),
        }
    }

    /// Start at the main menu, with the palette built from the configured atlas.
    pub fn with_main_menu(config: EngineConfig) -> Self {
        let palette = load_palette(&config);
        Self::new(EngineContext::new(config, palette), Box::new(MainMenu::new()))
    }

    /// Queue an input event for the next update. The context's held-input
    /// state and screen size catch up once that update has run.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance by `dt` seconds of real time and rebuild the frame.
    /// Returns the number of fixed updates that ran.
    pub fn tick(&mut self, dt: f32) -> u32 {
        if !self.stack.is_running() {
            return 0;
        }

        let steps = self.timestep.accumulate(dt);
        let transitions = self.stack.transition_count();
        let mut ran = 0;
        for _ in 0..steps {
            self.ctx.advance_frame();
            let running = self.stack.update(&mut self.ctx, &self.input, self.timestep.dt());
            ran += 1;
            // Each event is seen by exactly one update.
            self.input.drain();
            if !running {
                break;
            }
        }

        // A new state starts on a whole step.
        if self.stack.transition_count() != transitions {
            self.timestep.reset();
        }

        self.frame.clear();
        self.stack.render(&self.ctx, &mut self.frame);
        ran
    }

    /// Fraction of a fixed step left in the accumulator, for interpolation.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Hand the latest frame to a renderer.
    pub fn render_to(&self, renderer: &mut dyn Renderer) -> DrawTiming {
        renderer.draw(&self.frame)
    }

    pub fn is_running(&self) -> bool {
        self.stack.is_running()
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn stack(&self) -> &StateStack {
        &self.stack
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}

/// Build the asset palette from the configured atlas. A missing or broken
/// atlas is logged and yields an empty palette.
pub fn load_palette(config: &EngineConfig) -> AssetPalette {
    match SpriteAtlas::load(&config.atlas_path) {
        Ok(atlas) => AssetPalette::from_atlas(&atlas),
        Err(e) => {
            log::warn!("no sprite atlas: {}", e);
            AssetPalette::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chained_engine::{Key, MouseButton, PlayState, Scene};
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn menu_runner() -> Runner {
        let config = EngineConfig {
            atlas_path: "no/such/atlas.json".into(),
            scenes_dir: "no/such/scenes".into(),
            ..Default::default()
        };
        Runner::with_main_menu(config)
    }

    #[test]
    fn starts_in_menu_with_empty_palette() {
        let runner = menu_runner();
        assert!(runner.is_running());
        assert_eq!(runner.stack().top_name(), Some("menu"));
        assert!(runner.context().palette.is_empty());
    }

    #[test]
    fn input_waits_for_a_fixed_step() {
        let mut runner = menu_runner();
        runner.push_input(InputEvent::KeyDown { key: Key::E });
        assert_eq!(runner.tick(DT * 0.25), 0);
        assert_eq!(runner.pending_input(), 1);
        assert_eq!(runner.stack().top_name(), Some("menu"));

        assert_eq!(runner.tick(DT), 1);
        assert_eq!(runner.pending_input(), 0);
        assert_eq!(runner.stack().names(), vec!["menu", "editor"]);
    }

    #[test]
    fn event_seen_once_across_catch_up_steps() {
        let mut runner = menu_runner();
        runner.push_input(InputEvent::KeyDown { key: Key::E });
        assert_eq!(runner.tick(DT * 3.0), 3);
        // A second E would have pushed another editor on top.
        assert_eq!(runner.stack().len(), 2);
        assert_eq!(runner.context().frame_count(), 3);
    }

    #[test]
    fn escape_from_editor_then_exit_button_quits() {
        let mut runner = menu_runner();
        runner.push_input(InputEvent::KeyDown { key: Key::E });
        runner.tick(DT);
        runner.push_input(InputEvent::KeyDown { key: Key::Escape });
        runner.tick(DT);
        assert_eq!(runner.stack().names(), vec!["menu"]);

        // Exit button: third button, 30% height + 240 px, centered.
        let p = Vec2::new(400.0, 600.0 * 0.3 + 240.0 + 40.0);
        runner.push_input(InputEvent::PointerDown { x: p.x, y: p.y, button: MouseButton::Left });
        runner.push_input(InputEvent::PointerUp { x: p.x, y: p.y, button: MouseButton::Left });
        runner.tick(DT);
        assert!(!runner.is_running());
        assert_eq!(runner.tick(DT), 0);
    }

    #[test]
    fn state_change_drops_partial_step() {
        let mut runner = menu_runner();
        runner.tick(DT * 0.5);
        assert!(runner.alpha() > 0.4);

        runner.push_input(InputEvent::KeyDown { key: Key::E });
        assert_eq!(runner.tick(DT * 0.75), 1);
        assert_eq!(runner.stack().top_name(), Some("editor"));
        assert_eq!(runner.alpha(), 0.0);
    }

    #[test]
    fn switch_drops_partial_step() {
        let mut runner = menu_runner();
        runner.tick(DT * 0.5);

        // Play button: first button, 30% of the height, centered.
        let p = Vec2::new(400.0, 600.0 * 0.3 + 40.0);
        runner.push_input(InputEvent::PointerDown { x: p.x, y: p.y, button: MouseButton::Left });
        runner.push_input(InputEvent::PointerUp { x: p.x, y: p.y, button: MouseButton::Left });
        assert_eq!(runner.tick(DT * 0.75), 1);
        assert_eq!(runner.stack().names(), vec!["play"]);
        assert_eq!(runner.alpha(), 0.0);
    }

    #[test]
    fn resize_reaches_context_after_update() {
        let mut runner = menu_runner();
        runner.push_input(InputEvent::Resize { width: 1280.0, height: 720.0 });
        assert_eq!(runner.context().screen(), Vec2::new(800.0, 600.0));
        runner.tick(DT);
        assert_eq!(runner.context().screen(), Vec2::new(1280.0, 720.0));
    }

    #[test]
    fn invalid_fixed_dt_falls_back() {
        let config = EngineConfig { fixed_dt: 0.0, ..Default::default() };
        let ctx = EngineContext::new(config, AssetPalette::new());
        let play = PlayState::from_scene(&ctx, Scene::new(), None, "empty.json".into());
        let mut runner = Runner::new(ctx, Box::new(play));
        assert_eq!(runner.tick(FALLBACK_DT), 1);
    }
}
