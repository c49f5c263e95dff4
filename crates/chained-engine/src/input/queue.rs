use std::collections::HashSet;
use glam::Vec2;

/// Keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Delete,
    E,
    W,
    A,
    S,
    D,
    Enter,
    Space,
    Control,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Input events forwarded by the host window.
///
/// Pointer coordinates are window pixels with the origin at the top-left and y
/// pointing down, as windowing libraries report them. Events the UI layer
/// already consumed are not forwarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: MouseButton },
    PointerUp { x: f32, y: f32, button: MouseButton },
    PointerMove { x: f32, y: f32 },
    /// Scroll wheel; positive `delta` scrolls up (zoom in).
    Wheel { delta: f32 },
    KeyDown { key: Key },
    KeyUp { key: Key },
    Resize { width: f32, height: f32 },
}

/// A queue of input events.
/// The host pushes events as they arrive; the engine drains them once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Held keys and buttons plus the last pointer position, folded from events.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<Key>,
    buttons: HashSet<MouseButton>,
    pointer: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::PointerDown { x, y, button } => {
                self.pointer = Vec2::new(x, y);
                self.buttons.insert(button);
            }
            InputEvent::PointerUp { x, y, button } => {
                self.pointer = Vec2::new(x, y);
                self.buttons.remove(&button);
            }
            InputEvent::PointerMove { x, y } => self.pointer = Vec2::new(x, y),
            InputEvent::KeyDown { key } => {
                self.keys.insert(key);
            }
            InputEvent::KeyUp { key } => {
                self.keys.remove(&key);
            }
            InputEvent::Wheel { .. } | InputEvent::Resize { .. } => {}
        }
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Last known pointer position in window pixels (y-down).
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Direction from held W/A/S/D keys, y-up, not normalized.
    pub fn wasd_axis(&self) -> Vec2 {
        axis_from(|key| self.is_key_down(key))
    }

    /// WASD direction over one batch of events: keys held at the end of the
    /// batch plus keys pressed during it, so a tap shorter than one update
    /// still moves.
    pub fn wasd_axis_over<'a>(&self, events: impl IntoIterator<Item = &'a InputEvent>) -> Vec2 {
        let mut after = self.clone();
        let mut pressed = HashSet::new();
        for event in events {
            if let InputEvent::KeyDown { key } = *event {
                pressed.insert(key);
            }
            after.apply(event);
        }
        axis_from(|key| after.is_key_down(key) || pressed.contains(&key))
    }

    /// Forget held keys and buttons, e.g. when focus moves to another state.
    pub fn release_all(&mut self) {
        self.keys.clear();
        self.buttons.clear();
    }
}

fn axis_from(held: impl Fn(Key) -> bool) -> Vec2 {
    let mut dir = Vec2::ZERO;
    if held(Key::W) {
        dir.y += 1.0;
    }
    if held(Key::S) {
        dir.y -= 1.0;
    }
    if held(Key::A) {
        dir.x -= 1.0;
    }
    if held(Key::D) {
        dir.x += 1.0;
    }
    dir
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerDown { x: 10.0, y: 20.0, button: MouseButton::Left });
        q.push(InputEvent::KeyDown { key: Key::Space });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events.len(), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn state_tracks_keys_and_buttons() {
        let mut s = InputState::new();
        s.apply(&InputEvent::KeyDown { key: Key::W });
        s.apply(&InputEvent::KeyDown { key: Key::D });
        s.apply(&InputEvent::PointerDown { x: 3.0, y: 4.0, button: MouseButton::Right });
        assert!(s.is_key_down(Key::W));
        assert!(s.is_button_down(MouseButton::Right));
        assert_eq!(s.pointer(), Vec2::new(3.0, 4.0));
        assert_eq!(s.wasd_axis(), Vec2::new(1.0, 1.0));

        s.apply(&InputEvent::KeyUp { key: Key::W });
        s.apply(&InputEvent::PointerUp { x: 5.0, y: 6.0, button: MouseButton::Right });
        assert!(!s.is_key_down(Key::W));
        assert!(!s.is_button_down(MouseButton::Right));
        assert_eq!(s.wasd_axis(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut s = InputState::new();
        s.apply(&InputEvent::KeyDown { key: Key::A });
        s.apply(&InputEvent::KeyDown { key: Key::D });
        assert_eq!(s.wasd_axis(), Vec2::ZERO);
        s.release_all();
        assert!(!s.is_key_down(Key::A));
    }

    #[test]
    fn axis_over_batch_counts_taps() {
        let mut s = InputState::new();
        s.apply(&InputEvent::KeyDown { key: Key::W });
        let batch = [
            InputEvent::KeyUp { key: Key::W },
            InputEvent::KeyDown { key: Key::D },
            InputEvent::KeyUp { key: Key::D },
        ];
        // W released and D tapped within the batch: only the tap counts.
        assert_eq!(s.wasd_axis_over(batch.iter()), Vec2::new(1.0, 0.0));
        let none: [InputEvent; 0] = [];
        assert_eq!(s.wasd_axis_over(none.iter()), Vec2::new(0.0, 1.0));
        // The state itself is not changed.
        assert!(s.is_key_down(Key::W));
    }
}
