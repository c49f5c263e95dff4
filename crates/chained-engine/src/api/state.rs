use std::fmt;
use glam::Vec2;

use crate::api::config::EngineConfig;
use crate::assets::palette::AssetPalette;
use crate::core::scene::Scene;
use crate::input::queue::{InputEvent, InputQueue, InputState};
use crate::renderer::instance::FrameBuffer;

/// Engine state shared by every game state.
pub struct EngineContext {
    pub config: EngineConfig,
    pub palette: AssetPalette,
    /// Held keys, buttons and the pointer as of the start of the current
    /// update. The update's own events are folded in after it returns.
    pub input: InputState,
    screen: Vec2,
    frame: u64,
}

impl EngineContext {
    pub fn new(config: EngineConfig, palette: AssetPalette) -> Self {
        let screen = config.screen_size();
        Self {
            config,
            palette,
            input: InputState::new(),
            screen,
            frame: 0,
        }
    }

    /// Current window size in pixels.
    pub fn screen(&self) -> Vec2 {
        self.screen
    }

    /// Number of fixed updates run so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    /// Fold one host event into the shared input state and screen size.
    pub fn observe(&mut self, event: &InputEvent) {
        if let InputEvent::Resize { width, height } = *event {
            self.screen = Vec2::new(width, height);
        }
        self.input.apply(event);
    }
}

/// What the state stack should do after a state's update.
pub enum Transition {
    None,
    /// Suspend the current state and enter a new one on top of it.
    Push(Box<dyn GameState>),
    /// Leave the current state and resume the one below.
    Pop,
    /// Replace the current state.
    Switch(Box<dyn GameState>),
    /// Leave every state and stop the engine.
    Quit,
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::None => write!(f, "None"),
            Transition::Push(s) => write!(f, "Push({})", s.name()),
            Transition::Pop => write!(f, "Pop"),
            Transition::Switch(s) => write!(f, "Switch({})", s.name()),
            Transition::Quit => write!(f, "Quit"),
        }
    }
}

/// One screen of the application: menu, play, editor.
pub trait GameState {
    fn name(&self) -> &str;

    /// Called when the state becomes active for the first time.
    fn on_enter(&mut self, _ctx: &mut EngineContext) {}

    /// Called when the state is popped, switched away or the engine quits.
    fn on_exit(&mut self, _ctx: &mut EngineContext) {}

    /// Called when the state above this one was popped.
    fn on_resume(&mut self, _ctx: &mut EngineContext) {}

    /// Fixed-step tick. `input` holds the events that arrived since the last update.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, dt: f32) -> Transition;

    /// Read-only render pass into the frame buffer.
    fn render(&self, ctx: &EngineContext, frame: &mut FrameBuffer);

    /// The scene this state shows, if any.
    fn scene(&self) -> Option<&Scene> {
        None
    }
}

/// Stack of game states. Only the top state updates and renders.
///
/// Transitions are applied after the top state's update returns, so a state
/// never runs while another state's update is on the call stack.
#[derive(Default)]
pub struct StateStack {
    states: Vec<Box<dyn GameState>>,
    transitions: u64,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `state` on top of the stack.
    pub fn push(&mut self, mut state: Box<dyn GameState>, ctx: &mut EngineContext) {
        log::info!("entering state {}", state.name());
        state.on_enter(ctx);
        self.states.push(state);
    }

    /// Update the top state, fold `input` into the context, then apply the
    /// transition the state returned. Returns whether the stack still has states.
    ///
    /// A state that needs event order within the batch (a modifier released
    /// right after a click) walks `input` itself.
    pub fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue, dt: f32) -> bool {
        let transition = match self.states.last_mut() {
            Some(top) => top.update(ctx, input, dt),
            None => return false,
        };
        for event in input.iter() {
            ctx.observe(event);
        }
        self.apply(transition, ctx);
        self.is_running()
    }

    pub fn render(&self, ctx: &EngineContext, frame: &mut FrameBuffer) {
        if let Some(top) = self.states.last() {
            top.render(ctx, frame);
        }
    }

    pub fn apply(&mut self, transition: Transition, ctx: &mut EngineContext) {
        if !matches!(transition, Transition::None) {
            self.transitions += 1;
        }
        match transition {
            Transition::None => {}
            Transition::Push(state) => self.push(state, ctx),
            Transition::Pop => {
                self.pop_top(ctx);
                match self.states.last_mut() {
                    Some(top) => {
                        log::info!("resuming state {}", top.name());
                        top.on_resume(ctx);
                    }
                    None => log::info!("state stack empty, quitting"),
                }
            }
            Transition::Switch(state) => {
                self.pop_top(ctx);
                self.push(state, ctx);
            }
            Transition::Quit => {
                while !self.states.is_empty() {
                    self.pop_top(ctx);
                }
                log::info!("quit requested");
            }
        }
    }

    fn pop_top(&mut self, ctx: &mut EngineContext) {
        if let Some(mut state) = self.states.pop() {
            log::info!("leaving state {}", state.name());
            state.on_exit(ctx);
        }
    }

    pub fn is_running(&self) -> bool {
        !self.states.is_empty()
    }

    /// Number of transitions applied so far. Changes whenever the active state
    /// may have changed, including a `Switch` that keeps the depth.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn top(&self) -> Option<&dyn GameState> {
        self.states.last().map(|s| s.as_ref())
    }

    pub fn top_name(&self) -> Option<&str> {
        self.states.last().map(|s| s.name())
    }

    /// State names from bottom to top.
    pub fn names(&self) -> Vec<&str> {
        self.states.iter().map(|s| s.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::queue::Key;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records lifecycle calls and returns a scripted transition once.
    struct Probe {
        name: &'static str,
        log: Log,
        next: Option<Transition>,
    }

    impl Probe {
        fn boxed(name: &'static str, log: &Log, next: Option<Transition>) -> Box<dyn GameState> {
            Box::new(Probe { name, log: log.clone(), next })
        }
    }

    impl GameState for Probe {
        fn name(&self) -> &str {
            self.name
        }
        fn on_enter(&mut self, _ctx: &mut EngineContext) {
            self.log.borrow_mut().push(format!("enter {}", self.name));
        }
        fn on_exit(&mut self, _ctx: &mut EngineContext) {
            self.log.borrow_mut().push(format!("exit {}", self.name));
        }
        fn on_resume(&mut self, _ctx: &mut EngineContext) {
            self.log.borrow_mut().push(format!("resume {}", self.name));
        }
        fn update(&mut self, _ctx: &mut EngineContext, _input: &InputQueue, _dt: f32) -> Transition {
            self.log.borrow_mut().push(format!("update {}", self.name));
            self.next.take().unwrap_or(Transition::None)
        }
        fn render(&self, _ctx: &EngineContext, _frame: &mut FrameBuffer) {}
    }

    fn ctx() -> EngineContext {
        EngineContext::new(EngineConfig::default(), AssetPalette::new())
    }

    #[test]
    fn push_then_pop_resumes_below() {
        let log = Log::default();
        let mut ctx = ctx();
        let mut stack = StateStack::new();
        let inner = Probe::boxed("play", &log, Some(Transition::Pop));
        stack.push(Probe::boxed("editor", &log, Some(Transition::Push(inner))), &mut ctx);

        let input = InputQueue::new();
        assert!(stack.update(&mut ctx, &input, 0.016));
        assert_eq!(stack.names(), vec!["editor", "play"]);
        assert!(stack.update(&mut ctx, &input, 0.016));
        assert_eq!(stack.names(), vec!["editor"]);

        assert_eq!(
            *log.borrow(),
            vec!["enter editor", "update editor", "enter play", "update play", "exit play", "resume editor"]
        );
    }

    #[test]
    fn switch_replaces_top() {
        let log = Log::default();
        let mut ctx = ctx();
        let mut stack = StateStack::new();
        let play = Probe::boxed("play", &log, None);
        stack.push(Probe::boxed("menu", &log, Some(Transition::Switch(play))), &mut ctx);
        stack.update(&mut ctx, &InputQueue::new(), 0.016);
        assert_eq!(stack.names(), vec!["play"]);
        assert_eq!(log.borrow()[2..], ["exit menu".to_string(), "enter play".to_string()]);
    }

    #[test]
    fn popping_last_state_stops() {
        let log = Log::default();
        let mut ctx = ctx();
        let mut stack = StateStack::new();
        stack.push(Probe::boxed("menu", &log, Some(Transition::Pop)), &mut ctx);
        assert!(!stack.update(&mut ctx, &InputQueue::new(), 0.016));
        assert!(stack.is_empty());
        assert!(!stack.update(&mut ctx, &InputQueue::new(), 0.016));
    }

    #[test]
    fn quit_exits_every_state_top_down() {
        let log = Log::default();
        let mut ctx = ctx();
        let mut stack = StateStack::new();
        stack.push(Probe::boxed("menu", &log, None), &mut ctx);
        stack.push(Probe::boxed("editor", &log, Some(Transition::Quit)), &mut ctx);
        assert!(!stack.update(&mut ctx, &InputQueue::new(), 0.016));
        let log = log.borrow();
        assert_eq!(log[log.len() - 2..], ["exit editor".to_string(), "exit menu".to_string()]);
    }

    #[test]
    fn context_tracks_resize() {
        let mut ctx = ctx();
        ctx.observe(&InputEvent::Resize { width: 1024.0, height: 768.0 });
        assert_eq!(ctx.screen(), Vec2::new(1024.0, 768.0));
        ctx.advance_frame();
        assert_eq!(ctx.frame_count(), 1);
    }

    #[test]
    fn switch_counts_as_a_transition() {
        let log = Log::default();
        let mut ctx = ctx();
        let mut stack = StateStack::new();
        let play = Probe::boxed("play", &log, None);
        stack.push(Probe::boxed("menu", &log, Some(Transition::Switch(play))), &mut ctx);

        let input = InputQueue::new();
        stack.update(&mut ctx, &input, 0.016);
        assert_eq!(stack.transition_count(), 1);
        stack.update(&mut ctx, &input, 0.016);
        assert_eq!(stack.transition_count(), 1);
        assert_eq!(stack.names(), vec!["play"]);
    }

    /// Records whether E was held when its update ran.
    struct KeyWatcher {
        seen: Rc<RefCell<Vec<bool>>>,
    }

    impl GameState for KeyWatcher {
        fn name(&self) -> &str {
            "watcher"
        }
        fn update(&mut self, ctx: &mut EngineContext, _input: &InputQueue, _dt: f32) -> Transition {
            self.seen.borrow_mut().push(ctx.input.is_key_down(Key::E));
            Transition::None
        }
        fn render(&self, _ctx: &EngineContext, _frame: &mut FrameBuffer) {}
    }

    #[test]
    fn events_fold_into_context_after_update() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut ctx = ctx();
        let mut stack = StateStack::new();
        stack.push(Box::new(KeyWatcher { seen: seen.clone() }), &mut ctx);

        let mut input = InputQueue::new();
        input.push(InputEvent::KeyDown { key: Key::E });
        input.push(InputEvent::Resize { width: 640.0, height: 480.0 });
        stack.update(&mut ctx, &input, 0.016);
        assert!(ctx.input.is_key_down(Key::E));
        assert_eq!(ctx.screen(), Vec2::new(640.0, 480.0));

        stack.update(&mut ctx, &InputQueue::new(), 0.016);
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn transition_debug_names_state() {
        let log = Log::default();
        let t = Transition::Push(Probe::boxed("play", &log, None));
        assert_eq!(format!("{:?}", t), "Push(play)");
    }
}
