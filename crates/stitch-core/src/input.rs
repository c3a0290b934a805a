//! Pointer and keyboard events reported by the host.
//!
//! Positions are in screen coordinates. The host hit-tests the rendered
//! scene and reports what the pointer is over as a [`HitTarget`].

use crate::elements::ElementId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Modifier keys state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// What the pointer is over.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitTarget {
    Element(ElementId),
    /// The slide's background rectangle.
    Background,
    /// Canvas outside the slide.
    #[default]
    Empty,
}

impl HitTarget {
    pub fn element(&self) -> Option<&ElementId> {
        match self {
            HitTarget::Element(id) => Some(id),
            _ => None,
        }
    }
}

/// A pointer press, move, release or click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
    pub target: HitTarget,
}

impl PointerEvent {
    /// Left-button event over empty canvas.
    pub fn new(position: Point) -> Self {
        Self {
            position,
            button: MouseButton::Left,
            modifiers: Modifiers::NONE,
            target: HitTarget::Empty,
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_target(mut self, target: HitTarget) -> Self {
        self.target = target;
        self
    }
}

/// Mouse wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    pub position: Point,
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

/// Key press or release. `key` uses DOM key names ("a", "Escape",
/// "ArrowLeft", " ").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }
}

/// Tracks pressed buttons and the last pointer sample between events.
#[derive(Debug, Clone, Default)]
pub struct PointerState {
    /// Last reported pointer position in screen coordinates.
    pub position: Point,
    pressed: HashSet<MouseButton>,
    /// Where the current press started.
    pub press_origin: Option<Point>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, position: Point, button: MouseButton) {
        self.position = position;
        if self.pressed.is_empty() {
            self.press_origin = Some(position);
        }
        self.pressed.insert(button);
    }

    /// Returns whether the button was down.
    pub fn release(&mut self, position: Point, button: MouseButton) -> bool {
        self.position = position;
        let was_down = self.pressed.remove(&button);
        if self.pressed.is_empty() {
            self.press_origin = None;
        }
        was_down
    }

    /// Record a new sample and return the movement since the previous one.
    pub fn move_to(&mut self, position: Point) -> Vec2 {
        let delta = position - self.position;
        self.position = position;
        delta
    }

    pub fn is_pressed(&self, button: MouseButton) -> bool {
        self.pressed.contains(&button)
    }

    pub fn any_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    /// Forget every pressed button.
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.press_origin = None;
    }

    /// Movement since the press started, if a button is down.
    pub fn drag_delta(&self) -> Option<Vec2> {
        self.press_origin.map(|origin| self.position - origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_release() {
        let mut state = PointerState::new();
        state.press(Point::new(10.0, 10.0), MouseButton::Left);
        assert!(state.is_pressed(MouseButton::Left));
        assert!(!state.is_pressed(MouseButton::Middle));

        assert!(state.release(Point::new(10.0, 10.0), MouseButton::Left));
        assert!(!state.any_pressed());
        assert!(!state.release(Point::new(10.0, 10.0), MouseButton::Left));
    }

    #[test]
    fn test_move_reports_delta_since_previous_sample() {
        let mut state = PointerState::new();
        state.press(Point::new(0.0, 0.0), MouseButton::Middle);
        assert_eq!(state.move_to(Point::new(5.0, 2.0)), Vec2::new(5.0, 2.0));
        assert_eq!(state.move_to(Point::new(8.0, 2.0)), Vec2::new(3.0, 0.0));
        assert_eq!(state.drag_delta(), Some(Vec2::new(8.0, 2.0)));
    }

    #[test]
    fn test_release_all() {
        let mut state = PointerState::new();
        state.press(Point::ZERO, MouseButton::Left);
        state.press(Point::ZERO, MouseButton::Middle);
        state.release_all();
        assert!(!state.any_pressed());
        assert_eq!(state.drag_delta(), None);
    }

    #[test]
    fn test_command_modifier() {
        assert!(Modifiers::CTRL.command());
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(meta.command());
        assert!(!Modifiers::SHIFT.command());
    }

    #[test]
    fn test_hit_target_element() {
        let id = ElementId::from("el_a");
        assert_eq!(HitTarget::Element(id.clone()).element(), Some(&id));
        assert_eq!(HitTarget::Background.element(), None);
    }
}
