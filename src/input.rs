//! Discrete input events delivered by the host
//!
//! Raw device handling stays in the host; games only see these events.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::collision::{Rect, circle_contains_point};

/// Named keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Space,
    Left,
    Right,
    Up,
    Down,
    Other,
}

/// One input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Continuous pointer position
    PointerMove(Vec2),
    /// Tap/click at a position
    PointerDown(Vec2),
    KeyDown(Key),
    /// Host-resolved interactive element (tile, button) by index
    Button(usize),
}

impl InputEvent {
    /// Discrete press (tap, click, key or button), as opposed to movement
    pub fn is_press(&self) -> bool {
        !matches!(self, InputEvent::PointerMove(_))
    }
}

/// Index of the first box containing `point`
pub fn hit_rects(rects: &[Rect], point: Vec2) -> Option<usize> {
    rects.iter().position(|r| r.contains_point(point))
}

/// Index of the first circle (centre, radius) containing `point`
pub fn hit_circles(circles: &[(Vec2, f32)], point: Vec2) -> Option<usize> {
    circles
        .iter()
        .position(|&(center, radius)| circle_contains_point(center, radius, point))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rects() {
        let rects = [
            Rect::new(Vec2::new(50.0, 50.0), Vec2::splat(100.0)),
            Rect::new(Vec2::new(170.0, 50.0), Vec2::splat(100.0)),
        ];
        assert_eq!(hit_rects(&rects, Vec2::new(10.0, 10.0)), Some(0));
        assert_eq!(hit_rects(&rects, Vec2::new(200.0, 90.0)), Some(1));
        assert_eq!(hit_rects(&rects, Vec2::new(110.0, 50.0)), None);
    }

    #[test]
    fn test_hit_circles() {
        let circles = [(Vec2::new(0.0, 0.0), 40.0), (Vec2::new(120.0, 0.0), 40.0)];
        assert_eq!(hit_circles(&circles, Vec2::new(100.0, 10.0)), Some(1));
        assert_eq!(hit_circles(&circles, Vec2::new(60.0, 0.0)), None);
    }

    #[test]
    fn test_is_press() {
        assert!(!InputEvent::PointerMove(Vec2::ZERO).is_press());
        assert!(InputEvent::KeyDown(Key::Space).is_press());
        assert!(InputEvent::Button(2).is_press());
    }
}
