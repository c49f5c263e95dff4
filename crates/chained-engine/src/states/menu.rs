use glam::{Mat4, Vec2, Vec4};

use crate::api::state::{EngineContext, GameState, Transition};
use crate::editor::state::EditorState;
use crate::input::queue::{InputEvent, InputQueue, Key, MouseButton};
use crate::renderer::instance::{FrameBuffer, SpriteInstance};
use crate::states::play::PlayState;

const IDLE_TINT: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
const HOVER_TINT: Vec4 = Vec4::new(0.7, 0.7, 0.7, 1.0);
const PRESSED_TINT: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);
const OUTLINE_TINT: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
const OUTLINE_PX: f32 = 3.0;

/// Vertical position of the first button, as a fraction of screen height.
const FIRST_BUTTON_Y: f32 = 0.3;
const BUTTON_SPACING: f32 = 120.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    Settings,
    Exit,
}

#[derive(Debug, Clone)]
pub struct MenuButton {
    pub action: MenuAction,
    /// Atlas slice drawn for the button.
    pub slice: &'static str,
    /// Top-left corner in window pixels (y-down).
    pub pos: Vec2,
    pub size: Vec2,
    pub hovered: bool,
    pub pressed: bool,
}

impl MenuButton {
    fn new(action: MenuAction, slice: &'static str, size: Vec2) -> Self {
        Self {
            action,
            slice,
            pos: Vec2::ZERO,
            size,
            hovered: false,
            pressed: false,
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.pos.x
            && p.x <= self.pos.x + self.size.x
            && p.y >= self.pos.y
            && p.y <= self.pos.y + self.size.y
    }

    fn tint(&self) -> Vec4 {
        if self.pressed {
            PRESSED_TINT
        } else if self.hovered {
            HOVER_TINT
        } else {
            IDLE_TINT
        }
    }
}

/// Title screen with Play, Settings and Exit. `E` opens the editor.
pub struct MainMenu {
    buttons: Vec<MenuButton>,
    screen: Vec2,
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            buttons: vec![
                MenuButton::new(MenuAction::Play, "play_btn", Vec2::new(183.0, 93.0)),
                MenuButton::new(MenuAction::Settings, "settings_btn", Vec2::new(179.0, 87.0)),
                MenuButton::new(MenuAction::Exit, "exit_btn", Vec2::new(175.0, 81.0)),
            ],
            screen: Vec2::ZERO,
        }
    }

    pub fn buttons(&self) -> &[MenuButton] {
        &self.buttons
    }

    /// Center buttons horizontally, stacked from 30% of the screen height.
    fn layout(&mut self, screen: Vec2) {
        self.screen = screen;
        for (i, btn) in self.buttons.iter_mut().enumerate() {
            btn.pos = Vec2::new(
                (screen.x - btn.size.x) * 0.5,
                screen.y * FIRST_BUTTON_Y + i as f32 * BUTTON_SPACING,
            );
        }
    }

    fn hover(&mut self, pointer: Vec2) {
        for btn in &mut self.buttons {
            btn.hovered = btn.contains(pointer);
        }
    }

    /// Release the mouse: the pressed button fires if the pointer is still on it.
    fn release(&mut self) -> Option<MenuAction> {
        let mut fired = None;
        for btn in &mut self.buttons {
            if btn.pressed && btn.hovered {
                fired = Some(btn.action);
            }
            btn.pressed = false;
        }
        fired
    }

    fn activate(&self, action: MenuAction, ctx: &EngineContext) -> Transition {
        match action {
            MenuAction::Play => {
                let path = ctx.config.scene_path(&ctx.config.start_scene);
                Transition::Switch(Box::new(PlayState::load(ctx, path)))
            }
            MenuAction::Settings => {
                log::info!("settings menu is not available yet");
                Transition::None
            }
            MenuAction::Exit => Transition::Quit,
        }
    }
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState for MainMenu {
    fn name(&self) -> &str {
        "menu"
    }

    fn on_enter(&mut self, ctx: &mut EngineContext) {
        self.layout(ctx.screen());
        for btn in &self.buttons {
            if let Err(e) = ctx.palette.require(btn.slice) {
                log::warn!("{}; button will not be drawn", e);
            }
        }
    }

    fn on_resume(&mut self, ctx: &mut EngineContext) {
        self.layout(ctx.screen());
        for btn in &mut self.buttons {
            btn.pressed = false;
        }
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, _dt: f32) -> Transition {
        for event in input.iter() {
            match *event {
                InputEvent::Resize { width, height } => self.layout(Vec2::new(width, height)),
                InputEvent::PointerMove { x, y } => self.hover(Vec2::new(x, y)),
                InputEvent::PointerDown { x, y, button: MouseButton::Left } => {
                    self.hover(Vec2::new(x, y));
                    for btn in &mut self.buttons {
                        btn.pressed = btn.hovered;
                    }
                }
                InputEvent::PointerUp { x, y, button: MouseButton::Left } => {
                    self.hover(Vec2::new(x, y));
                    if let Some(action) = self.release() {
                        let transition = self.activate(action, ctx);
                        if !matches!(transition, Transition::None) {
                            return transition;
                        }
                    }
                }
                InputEvent::KeyDown { key: Key::E } => {
                    return Transition::Push(Box::new(EditorState::new(ctx)));
                }
                _ => {}
            }
        }
        Transition::None
    }

    fn render(&self, ctx: &EngineContext, frame: &mut FrameBuffer) {
        // Screen-space projection: one unit per window pixel, y-up.
        frame.set_projection(Mat4::orthographic_rh_gl(0.0, self.screen.x, 0.0, self.screen.y, -1.0, 1.0));
        for btn in &self.buttons {
            let Ok(entry) = ctx.palette.require(btn.slice) else {
                continue;
            };
            let center = Vec2::new(
                btn.pos.x + btn.size.x * 0.5,
                self.screen.y - (btn.pos.y + btn.size.y * 0.5),
            );
            if btn.hovered && !btn.pressed {
                let outline = btn.size + Vec2::splat(OUTLINE_PX * 2.0);
                frame.push_sprite(SpriteInstance::new(center, outline, 0.0, &entry.frame).with_tint(OUTLINE_TINT));
            }
            frame.push_sprite(SpriteInstance::new(center, btn.size, 0.0, &entry.frame).with_tint(btn.tint()));
        }
    }
}
