use glam::Vec2;

use crate::api::state::{EngineContext, GameState, Transition};
use crate::core::scene::Scene;
use crate::editor::Editor;
use crate::input::queue::{InputEvent, InputQueue, Key, MouseButton};
use crate::renderer::instance::FrameBuffer;
use crate::states::play::PlayState;

/// Scene file the Test action writes before launching play mode.
pub const TEST_SCENE: &str = "temp_test.json";

/// Editor screen: maps window input onto [`Editor`] operations.
///
/// Left click selects or places (holding Control places even over existing
/// objects), right drag pans, the wheel zooms at the cursor, Escape cancels
/// and leaves the editor when there is nothing to cancel, Delete removes the
/// selection and Enter saves a test scene and plays it.
pub struct EditorState {
    editor: Editor,
    pointer: Vec2,
    dragging: bool,
}

impl EditorState {
    pub fn new(ctx: &EngineContext) -> Self {
        let editor = Editor::new(ctx.palette.clone(), ctx.config.scenes_dir.clone(), ctx.screen());
        Self::with_editor(editor)
    }

    pub fn with_editor(editor: Editor) -> Self {
        Self {
            editor,
            pointer: Vec2::ZERO,
            dragging: false,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Save the current objects to the test scene and start playing it.
    fn launch_test(&self, ctx: &EngineContext) -> Transition {
        let path = ctx.config.scene_path(TEST_SCENE);
        match self.editor.save_to(&path) {
            Ok(written) => Transition::Push(Box::new(PlayState::load(ctx, written))),
            Err(e) => {
                log::error!("could not save test scene: {}", e);
                Transition::None
            }
        }
    }

    /// `control` is whether Control is held at this point of the batch.
    fn handle(&mut self, ctx: &EngineContext, event: &InputEvent, control: bool) -> Transition {
        match *event {
            InputEvent::PointerDown { x, y, button } => {
                self.pointer = Vec2::new(x, y);
                match button {
                    MouseButton::Left => {
                        let force_place = control && self.editor.placement_mode();
                        if force_place {
                            let world = self.editor.window_to_world(self.pointer);
                            self.editor.place_at(world);
                        } else {
                            self.editor.click(self.pointer);
                        }
                    }
                    MouseButton::Right => self.dragging = true,
                    MouseButton::Middle => {}
                }
            }
            InputEvent::PointerUp { x, y, button } => {
                self.pointer = Vec2::new(x, y);
                if button == MouseButton::Right {
                    self.dragging = false;
                }
            }
            InputEvent::PointerMove { x, y } => {
                let pos = Vec2::new(x, y);
                if self.dragging {
                    self.editor.pan_by_drag(pos - self.pointer);
                }
                self.pointer = pos;
                self.editor.move_pointer(pos);
            }
            InputEvent::Wheel { delta } => self.editor.zoom_wheel(delta, self.pointer),
            InputEvent::KeyDown { key } => match key {
                Key::Escape if !self.editor.cancel() => return Transition::Pop,
                Key::Delete => {
                    self.editor.delete_selected();
                }
                Key::Enter => return self.launch_test(ctx),
                _ => {}
            },
            InputEvent::KeyUp { .. } => {}
            InputEvent::Resize { width, height } => self.editor.set_viewport(width, height),
        }
        Transition::None
    }
}

impl GameState for EditorState {
    fn name(&self) -> &str {
        "editor"
    }

    fn on_resume(&mut self, _ctx: &mut EngineContext) {
        self.dragging = false;
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, _dt: f32) -> Transition {
        let mut control = ctx.input.is_key_down(Key::Control);
        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { key: Key::Control } => control = true,
                InputEvent::KeyUp { key: Key::Control } => control = false,
                _ => {}
            }
            let transition = self.handle(ctx, event, control);
            if !matches!(transition, Transition::None) {
                return transition;
            }
        }
        Transition::None
    }

    fn render(&self, _ctx: &EngineContext, frame: &mut FrameBuffer) {
        self.editor.render(frame);
    }

    fn scene(&self) -> Option<&Scene> {
        Some(self.editor.scene())
    }
}
