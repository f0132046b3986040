//! Coordinate-space primitives used by the viewport, barrier, constraint and
//! motion pipeline.
//!
//! The engine deals with a single coordinate space (the compositor's global
//! "stage" space), so unlike a full compositor toolkit this drops the
//! per-space marker type and keeps only the numeric representation
//! (`f64` for pointer/touch coordinates, `i32` for monitor rectangles).

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A type that can be used as a coordinate in [`Point`], [`Size`] and [`Rectangle`].
pub trait Coordinate:
    Sized + Add<Self, Output = Self> + Sub<Self, Output = Self> + PartialOrd + Copy + fmt::Debug
{
    /// Downscale the coordinate
    fn downscale(self, scale: Self) -> Self;
    /// Upscale the coordinate
    fn upscale(self, scale: Self) -> Self;
    /// Convert the coordinate to a f64
    fn to_f64(self) -> f64;
    /// Convert to this coordinate from a f64
    fn from_f64(v: f64) -> Self;
    /// Clamp this coordinate into the provided range
    fn clamp(self, min: Self, max: Self) -> Self;
    /// The additive identity
    fn zero() -> Self;
}

impl Coordinate for f64 {
    fn downscale(self, scale: Self) -> Self {
        self / scale
    }
    fn upscale(self, scale: Self) -> Self {
        self * scale
    }
    fn to_f64(self) -> f64 {
        self
    }
    fn from_f64(v: f64) -> Self {
        v
    }
    fn clamp(self, min: Self, max: Self) -> Self {
        f64::clamp(self, min, max)
    }
    fn zero() -> Self {
        0.0
    }
}

impl Coordinate for i32 {
    fn downscale(self, scale: Self) -> Self {
        self / scale
    }
    fn upscale(self, scale: Self) -> Self {
        self * scale
    }
    fn to_f64(self) -> f64 {
        self as f64
    }
    fn from_f64(v: f64) -> Self {
        v as i32
    }
    fn clamp(self, min: Self, max: Self) -> Self {
        Ord::clamp(self, min, max)
    }
    fn zero() -> Self {
        0
    }
}

/// A point in the engine's coordinate space
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point<N> {
    /// X coordinate
    pub x: N,
    /// Y coordinate
    pub y: N,
}

impl<N> Point<N> {
    /// Create a new point
    pub const fn new(x: N, y: N) -> Self {
        Point { x, y }
    }
}

impl<N: Coordinate> Point<N> {
    /// Convert this point to a point of `f64`
    pub fn to_f64(self) -> Point<f64> {
        Point::new(self.x.to_f64(), self.y.to_f64())
    }
}

impl Point<f64> {
    /// Convert this point to a point of `i32`, rounding to nearest
    pub fn to_i32_round(self) -> Point<i32> {
        Point::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl<N: Coordinate> Add for Point<N> {
    type Output = Point<N>;
    fn add(self, rhs: Self) -> Self {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<N: Coordinate> Sub for Point<N> {
    type Output = Point<N>;
    fn sub(self, rhs: Self) -> Self {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<N: Coordinate> AddAssign for Point<N> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<N: Coordinate> SubAssign for Point<N> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// A width/height pair
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size<N> {
    /// Width
    pub w: N,
    /// Height
    pub h: N,
}

impl<N> Size<N> {
    /// Create a new size
    pub const fn new(w: N, h: N) -> Self {
        Size { w, h }
    }
}

/// A rectangle, defined by its top-left corner and its size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rectangle<N> {
    /// Location of the top-left corner of the rectangle
    pub loc: Point<N>,
    /// Size of the rectangle, as (width, height)
    pub size: Size<N>,
}

impl<N: Coordinate> Rectangle<N> {
    /// Create a new rectangle from its top-left corner and size
    pub fn from_loc_and_size(loc: Point<N>, size: Size<N>) -> Self {
        Rectangle { loc, size }
    }

    /// The X coordinate of the left edge
    pub fn left(&self) -> N {
        self.loc.x
    }

    /// The Y coordinate of the top edge
    pub fn top(&self) -> N {
        self.loc.y
    }

    /// The X coordinate of the right edge (exclusive)
    pub fn right(&self) -> N {
        self.loc.x + self.size.w
    }

    /// The Y coordinate of the bottom edge (exclusive)
    pub fn bottom(&self) -> N {
        self.loc.y + self.size.h
    }

    /// Checks whether given point is inside the rectangle
    pub fn contains(&self, point: Point<N>) -> bool {
        point.x >= self.left() && point.x < self.right() && point.y >= self.top() && point.y < self.bottom()
    }

    /// Clamp a point to lie within this rectangle's interior
    /// (`[left, right - 1] x [top, bottom - 1]`, per the monitor-clamp escape
    /// prevention rule: the candidate must never land exactly on the far edge).
    pub fn constrain(&self, point: Point<N>) -> Point<N> {
        let one = N::from_f64(1.0);
        let x = point.x.clamp(self.left(), self.right() - one);
        let y = point.y.clamp(self.top(), self.bottom() - one);
        Point::new(x, y)
    }
}

impl Rectangle<i32> {
    /// Convert an integer rectangle to an `f64` rectangle
    pub fn to_f64(self) -> Rectangle<f64> {
        Rectangle::from_loc_and_size(self.loc.to_f64(), Size::new(self.size.w as f64, self.size.h as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_contains_is_half_open() {
        let r = Rectangle::from_loc_and_size(Point::new(0, 0), Size::new(10, 10));
        assert!(r.contains(Point::new(0, 0)));
        assert!(r.contains(Point::new(9, 9)));
        assert!(!r.contains(Point::new(10, 0)));
        assert!(!r.contains(Point::new(-1, 0)));
    }

    #[test]
    fn constrain_clamps_into_interior() {
        let r = Rectangle::from_loc_and_size(Point::new(0.0, 0.0), Size::new(100.0, 100.0));
        let clamped = r.constrain(Point::new(150.0, -5.0));
        assert_eq!(clamped, Point::new(99.0, 0.0));
    }
}
