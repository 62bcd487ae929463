use crate::math::Vec2;
use std::collections::HashSet;
use winit::keyboard::KeyCode;

/// Keys that pan the camera.
pub const PAN_KEYS: [KeyCode; 4] = [
    KeyCode::ArrowUp,
    KeyCode::ArrowDown,
    KeyCode::ArrowLeft,
    KeyCode::ArrowRight,
];

/// Input delivered by the host window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    PointerDown,
    PointerUp,
    PointerMove(Vec2),
    TouchStart(Vec2),
    TouchMove(Vec2),
}

pub struct InputState {
    pressed_keys: HashSet<KeyCode>,
    pointer_down: bool,
    pointer_position: Option<Vec2>,
    touch_position: Option<Vec2>,
}

impl InputState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            pointer_down: false,
            pointer_position: None,
            touch_position: None,
        }
    }

    /// Applies `event`. Returns `true` when the event was consumed, which
    /// is the case for pan keys and all pointer/touch events.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::KeyDown(key) => {
                if !PAN_KEYS.contains(&key) {
                    return false;
                }
                self.pressed_keys.insert(key);
            }
            InputEvent::KeyUp(key) => {
                if !PAN_KEYS.contains(&key) {
                    return false;
                }
                self.pressed_keys.remove(&key);
            }
            InputEvent::PointerDown => self.pointer_down = true,
            InputEvent::PointerUp => self.pointer_down = false,
            InputEvent::PointerMove(position) => self.pointer_position = Some(position),
            InputEvent::TouchStart(position) | InputEvent::TouchMove(position) => {
                self.touch_position = Some(position);
            }
        }
        true
    }

    #[must_use]
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Camera displacement for one frame at `speed` units per frame. Up
    /// moves towards negative y, matching screen coordinates.
    #[must_use]
    pub fn pan_delta(&self, speed: f32) -> (f32, f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.is_key_pressed(KeyCode::ArrowUp) {
            dy -= speed;
        }
        if self.is_key_pressed(KeyCode::ArrowDown) {
            dy += speed;
        }
        if self.is_key_pressed(KeyCode::ArrowLeft) {
            dx -= speed;
        }
        if self.is_key_pressed(KeyCode::ArrowRight) {
            dx += speed;
        }
        (dx, dy)
    }

    #[must_use]
    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    #[must_use]
    pub fn pointer_position(&self) -> Option<Vec2> {
        self.pointer_position
    }

    #[must_use]
    pub fn touch_position(&self) -> Option<Vec2> {
        self.touch_position
    }

    /// Forgets held keys and pointer state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pan_keys_are_tracked() {
        let mut input = InputState::new();
        assert!(input.handle(InputEvent::KeyDown(KeyCode::ArrowUp)));
        assert!(input.handle(InputEvent::KeyDown(KeyCode::ArrowRight)));
        assert_eq!(input.pan_delta(2.0), (2.0, -2.0));

        assert!(input.handle(InputEvent::KeyUp(KeyCode::ArrowUp)));
        assert_eq!(input.pan_delta(2.0), (2.0, 0.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::new();
        input.handle(InputEvent::KeyDown(KeyCode::ArrowLeft));
        input.handle(InputEvent::KeyDown(KeyCode::ArrowRight));
        assert_eq!(input.pan_delta(2.0), (0.0, 0.0));
    }

    #[test]
    fn test_other_keys_are_not_consumed() {
        let mut input = InputState::new();
        assert!(!input.handle(InputEvent::KeyDown(KeyCode::KeyW)));
        assert!(!input.is_key_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_pointer_and_touch_tracking() {
        let mut input = InputState::new();
        input.handle(InputEvent::PointerDown);
        input.handle(InputEvent::PointerMove(Vec2::new(3.0, 4.0)));
        input.handle(InputEvent::TouchStart(Vec2::new(10.0, 20.0)));
        input.handle(InputEvent::TouchMove(Vec2::new(11.0, 21.0)));
        assert!(input.is_pointer_down());
        assert_eq!(input.pointer_position(), Some(Vec2::new(3.0, 4.0)));
        assert_eq!(input.touch_position(), Some(Vec2::new(11.0, 21.0)));

        input.handle(InputEvent::PointerUp);
        assert!(!input.is_pointer_down());

        input.reset();
        assert_eq!(input.touch_position(), None);
    }
}
