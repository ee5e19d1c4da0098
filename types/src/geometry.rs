//! Container-relative pixel geometry
//!
//! All coordinates are `f32` pixels with the origin at the top-left corner of
//! the overlay surface. Widget positions are always top-left corners.

use serde::{Deserialize, Serialize};

/// A point (or top-left position) in container-relative pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise offset of `self` from `other`
    pub fn offset_from(&self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        self.offset_from(rhs)
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Width/height pair in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A size is usable for layout once both dimensions are finite and
    /// strictly positive. Widgets report zero before their first measurement.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Half-open containment: the right and bottom edges are outside
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Grow by `amount` on every side
    pub fn inflate(&self, amount: f32) -> Rect {
        Rect::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }
}

/// Clamp a top-left position so a box of `size` stays inside `container`.
///
/// When the container is smaller than the box on an axis, that axis is pinned
/// to 0. Invalid sizes leave the position untouched.
pub fn clamp_position(position: Point, size: Size, container: Size) -> Point {
    if !size.is_valid() || !container.is_valid() || !position.is_finite() {
        return position;
    }
    let max_x = (container.width - size.width).max(0.0);
    let max_y = (container.height - size.height).max(0.0);
    Point::new(position.x.clamp(0.0, max_x), position.y.clamp(0.0, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_position_inside_is_noop() {
        let p = clamp_position(Point::new(10.0, 20.0), Size::new(50.0, 50.0), Size::new(200.0, 200.0));
        assert_eq!(p, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_clamp_position_pins_to_edges() {
        let container = Size::new(1000.0, 500.0);
        let size = Size::new(100.0, 60.0);
        assert_eq!(
            clamp_position(Point::new(-5.0, 480.0), size, container),
            Point::new(0.0, 440.0)
        );
        assert_eq!(
            clamp_position(Point::new(950.0, -1.0), size, container),
            Point::new(900.0, 0.0)
        );
    }

    #[test]
    fn test_clamp_position_container_smaller_than_widget() {
        let p = clamp_position(Point::new(30.0, 30.0), Size::new(300.0, 10.0), Size::new(100.0, 100.0));
        assert_eq!(p, Point::new(0.0, 30.0));
    }

    #[test]
    fn test_clamp_position_skips_unmeasured_widget() {
        let p = clamp_position(Point::new(-40.0, 9000.0), Size::ZERO, Size::new(100.0, 100.0));
        assert_eq!(p, Point::new(-40.0, 9000.0));
    }

    #[test]
    fn test_rect_union_and_contains() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!(u, Rect::new(0.0, 0.0, 30.0, 15.0));
        assert!(u.contains(Point::new(29.0, 14.0)));
        assert!(!u.contains(Point::new(30.0, 14.0)));
        assert!(!a.intersects(&b));
    }
}
