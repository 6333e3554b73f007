//! Overlap tests for axis-aligned boxes and circles
//!
//! Everything in the play area is either a box (paddle, pipes, player, tiles)
//! or a circle (balls, buttons). Positions are centres, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned box given by centre and half extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half.x && d.y <= self.half.y
    }
}

/// Box/box overlap (touching edges count)
pub fn rect_rect_overlap(a: &Rect, b: &Rect) -> bool {
    let d = (a.center - b.center).abs();
    let reach = a.half + b.half;
    d.x <= reach.x && d.y <= reach.y
}

/// Circle/box overlap via the closest point on the box
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let closest = center.clamp(rect.min(), rect.max());
    closest.distance_squared(center) <= radius * radius
}

pub fn circle_contains_point(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance_squared(point) <= radius * radius
}
