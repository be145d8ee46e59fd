//! Axis-aligned rectangles and the overlap test used for every collision

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{CONTAINER_MARGIN_X, CONTAINER_MARGIN_Y};

/// An axis-aligned rectangle in canvas space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centered on `center`
    #[inline]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Strict overlap: rectangles that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// The drawable canvas area, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Canvas size for a host container, minus the layout margins
    pub fn from_container(width: f32, height: f32) -> Self {
        Self {
            width: (width - CONTAINER_MARGIN_X).max(0.0),
            height: (height - CONTAINER_MARGIN_Y).max(0.0),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Check whether two collision boxes overlap
#[inline]
pub fn collides(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(collides(&a, &b));
    }

    #[test]
    fn test_edge_touching_is_not_collision() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        let corner = Rect::new(10.0, 10.0, 5.0, 5.0);
        assert!(!collides(&a, &right));
        assert!(!collides(&a, &below));
        assert!(!collides(&a, &corner));
    }

    #[test]
    fn test_containment() {
        let outer = Rect::new(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::new(40.0, 40.0, 5.0, 5.0);
        assert!(collides(&outer, &inner));
        assert!(collides(&inner, &outer));
    }

    #[test]
    fn test_centered() {
        let r = Rect::centered(Vec2::new(50.0, 20.0), Vec2::new(10.0, 4.0));
        assert_eq!(r, Rect::new(45.0, 18.0, 10.0, 4.0));
    }

    #[test]
    fn test_playfield_from_container() {
        let field = Playfield::from_container(830.0, 680.0);
        assert_eq!(field, Playfield::new(800.0, 600.0));
        assert_eq!(Playfield::from_container(10.0, 10.0), Playfield::new(0.0, 0.0));
    }

    fn rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..200.0, 0.0f32..200.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_collision_is_symmetric(a in rect(), b in rect()) {
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }

        #[test]
        fn prop_disjoint_when_separated(a in rect(), gap in 0.0f32..50.0) {
            let b = Rect::new(a.right() + gap, a.y, a.w, a.h);
            prop_assert!(!collides(&a, &b));
        }
    }
}
