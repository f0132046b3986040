//! Read-only viewport (monitor) geometry (C4).
//!
//! Grounded on `utils::geometry`'s `Rectangle`, generalized into a small
//! host-provided trait (`ViewportProvider`) rather than inventing a
//! concrete output/monitor type — per §9 design notes, the engine has no
//! opinion on how outputs are modeled, only on querying them.

use crate::utils::{Point, Rectangle};

/// A compass direction used for neighbor lookup and edge bisection (C12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward negative x.
    Left,
    /// Toward positive x.
    Right,
    /// Toward negative y.
    Up,
    /// Toward positive y.
    Down,
}

/// A single monitor rectangle in global stage coordinates, with its scale
/// factor (data model §3 "ViewportInfo").
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    /// Integer rect in global stage coordinates.
    pub rect: Rectangle<i32>,
    /// Output scale factor (content-pixels per stage-unit).
    pub scale: f64,
}

impl View {
    /// Whether `point` lies within this view's rect.
    pub fn contains(&self, point: Point<f64>) -> bool {
        let p = Point::new(point.x as i32, point.y as i32);
        self.rect.contains(p)
    }
}

/// Read-only per-monitor geometry query surface (C4), provided by the host.
///
/// The engine never mutates this; it is consulted by the barrier manager,
/// the monitor clamp and the cross-output relative-motion scaling (C12).
pub trait ViewportProvider: std::fmt::Debug {
    /// Iterates views in a stable, arbitrary order.
    fn views(&self) -> &[View];

    /// Index of the view containing `point`, or `None` if it lies outside
    /// every view.
    fn hit_test(&self, point: Point<f64>) -> Option<usize> {
        self.views().iter().position(|v| v.contains(point))
    }

    /// The neighboring view of `view` in `direction`, or `None` if there is
    /// none (e.g. a single-monitor layout, or at the layout's edge).
    fn neighbor(&self, view: usize, direction: Direction) -> Option<usize>;

    /// Overall extents of the whole layout (bounding box width, height).
    fn extents(&self) -> (i32, i32) {
        let views = self.views();
        if views.is_empty() {
            return (0, 0);
        }
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for v in views {
            min_x = min_x.min(v.rect.left());
            min_y = min_y.min(v.rect.top());
            max_x = max_x.max(v.rect.right());
            max_y = max_y.max(v.rect.bottom());
        }
        (max_x - min_x, max_y - min_y)
    }
}

/// A simple, host-agnostic [`ViewportProvider`] backed by an explicit
/// neighbor table, used by tests and by hosts with no richer output model.
#[derive(Debug, Default, Clone)]
pub struct StaticViewportLayout {
    views: Vec<View>,
    /// `neighbors[view][direction as usize]`
    neighbors: Vec<[Option<usize>; 4]>,
}

impl StaticViewportLayout {
    /// Creates an empty layout (no viewports configured).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a view with no configured neighbors; call [`Self::set_neighbor`]
    /// afterwards to wire up adjacency.
    pub fn push(&mut self, view: View) -> usize {
        self.views.push(view);
        self.neighbors.push([None; 4]);
        self.views.len() - 1
    }

    /// Wires `from`'s neighbor in `direction` to `to`.
    pub fn set_neighbor(&mut self, from: usize, direction: Direction, to: usize) {
        self.neighbors[from][direction as usize] = Some(to);
    }
}

impl ViewportProvider for StaticViewportLayout {
    fn views(&self) -> &[View] {
        &self.views
    }

    fn neighbor(&self, view: usize, direction: Direction) -> Option<usize> {
        self.neighbors.get(view).and_then(|n| n[direction as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32> {
        Rectangle::from_loc_and_size(Point::new(x, y), crate::utils::Size::new(w, h))
    }

    #[test]
    fn hit_test_finds_containing_view() {
        let mut layout = StaticViewportLayout::new();
        let v0 = layout.push(View { rect: rect(0, 0, 1000, 1000), scale: 1.0 });
        let v1 = layout.push(View { rect: rect(1000, 0, 1000, 1000), scale: 2.0 });
        layout.set_neighbor(v0, Direction::Right, v1);
        layout.set_neighbor(v1, Direction::Left, v0);

        assert_eq!(layout.hit_test(Point::new(500.0, 500.0)), Some(v0));
        assert_eq!(layout.hit_test(Point::new(1500.0, 500.0)), Some(v1));
        assert_eq!(layout.hit_test(Point::new(-1.0, 0.0)), None);
    }

    #[test]
    fn extents_covers_all_views() {
        let mut layout = StaticViewportLayout::new();
        layout.push(View { rect: rect(0, 0, 1000, 1000), scale: 1.0 });
        layout.push(View { rect: rect(1000, 0, 500, 2000), scale: 2.0 });
        assert_eq!(layout.extents(), (1500, 2000));
    }
}
