//! Axis-aligned rectangles for level geometry and the skater's bounding box
//!
//! Screen space: x grows to the right, y grows downward, so `top < bottom`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Corner of a rectangle, named by compass direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Smallest rectangle spanning two opposite corners, in any order
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let size = (a - b).abs();
        Self::new(min.x, min.y, size.x, size.y)
    }

    /// Rectangle of the given size at the origin
    pub fn from_size(size: Vec2) -> Self {
        Self::new(0.0, 0.0, size.x, size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn top_left(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Middle of the bottom edge (where the wheels touch the ground)
    pub fn midbottom(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.bottom())
    }

    /// Move the top-left corner to `pos`
    pub fn set_top_left(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    pub fn corner(&self, corner: Corner) -> Vec2 {
        match corner {
            Corner::NorthEast => Vec2::new(self.right(), self.top()),
            Corner::SouthEast => Vec2::new(self.right(), self.bottom()),
            Corner::SouthWest => Vec2::new(self.left(), self.bottom()),
            Corner::NorthWest => Vec2::new(self.left(), self.top()),
        }
    }

    /// Copy with `corner` dragged to `to` while the opposite corner stays put.
    /// Dragging past the opposite corner flips the rect instead of inverting it.
    pub fn with_corner_at(&self, corner: Corner, to: Vec2) -> Self {
        let anchor = match corner {
            Corner::NorthEast => self.corner(Corner::SouthWest),
            Corner::SouthEast => self.corner(Corner::NorthWest),
            Corner::SouthWest => self.corner(Corner::NorthEast),
            Corner::NorthWest => self.corner(Corner::SouthEast),
        };
        Self::from_corners(anchor, to)
    }

    /// Copy of this rect extended downward by `depth`
    pub fn grow_down(&self, depth: f32) -> Self {
        Self::new(self.x, self.y, self.w, self.h + depth)
    }

    /// Strict overlap test: rects that only share an edge do not collide
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether a point lies inside (top/left edges inclusive, bottom/right exclusive)
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Whether the vertical segment from `start` down to `start.y + length`
    /// touches this rect. The top edge counts as inside, so a skater whose
    /// wheels sit exactly on a surface still finds it.
    pub fn clips_vertical_segment(&self, start: Vec2, length: f32) -> bool {
        if start.x < self.x || start.x >= self.right() {
            return false;
        }
        let (y0, y1) = if length >= 0.0 {
            (start.y, start.y + length)
        } else {
            (start.y + length, start.y)
        };
        y0 < self.bottom() && y1 >= self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let ground = Rect::new(0.0, 100.0, 200.0, 20.0);
        let skater = Rect::new(10.0, 60.0, 32.0, 40.0);
        assert!(!skater.intersects(&ground));

        let sunk = Rect::new(10.0, 61.0, 32.0, 40.0);
        assert!(sunk.intersects(&ground));
        assert!(ground.intersects(&sunk));
    }

    #[test]
    fn test_probe_finds_surface_under_wheels() {
        let ground = Rect::new(0.0, 100.0, 200.0, 20.0);
        let skater = Rect::new(10.0, 60.0, 32.0, 40.0);
        assert!(ground.clips_vertical_segment(skater.midbottom(), 0.5));

        // Rolled past the end of the ground
        let off = Rect::new(190.0, 60.0, 32.0, 40.0);
        assert!(!ground.clips_vertical_segment(off.midbottom(), 0.5));

        // Hovering above the probe's reach
        let above = Rect::new(10.0, 50.0, 32.0, 40.0);
        assert!(!ground.clips_vertical_segment(above.midbottom(), 0.5));
    }

    #[test]
    fn test_corner_drag_keeps_opposite_corner() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);

        let se = r.with_corner_at(Corner::SouthEast, Vec2::new(150.0, 90.0));
        assert_eq!(se, Rect::new(10.0, 20.0, 140.0, 70.0));

        let ne = r.with_corner_at(Corner::NorthEast, Vec2::new(60.0, 0.0));
        assert_eq!(ne.corner(Corner::SouthWest), r.corner(Corner::SouthWest));
        assert_eq!(ne, Rect::new(10.0, 0.0, 50.0, 70.0));

        // Past the anchor: normalized, not negative
        let flipped = r.with_corner_at(Corner::NorthWest, Vec2::new(130.0, 100.0));
        assert_eq!(flipped, Rect::new(110.0, 70.0, 20.0, 30.0));
    }

    #[test]
    fn test_grow_down_and_translate() {
        let mut r = Rect::new(5.0, 5.0, 10.0, 10.0);
        r.translate(Vec2::new(1.0, -2.0));
        assert_eq!(r.top_left(), Vec2::new(6.0, 3.0));
        let probe = r.grow_down(4.0);
        assert_eq!(probe.bottom(), r.bottom() + 4.0);
        assert_eq!(probe.top(), r.top());
    }
}
