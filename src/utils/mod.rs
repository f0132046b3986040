//! Coordinate-space primitives shared by the viewport, barrier, constraint
//! and motion pipeline.

mod geometry;

pub use self::geometry::{Coordinate, Point, Rectangle, Size};
