//! Pointer barriers: line-segment motion clamps with directional filters
//! and release hysteresis (C5).
//!
//! New code, grounded on the shape of the constrain chain implied by
//! `input/pointer/mod.rs`'s
//! motion handling: a stateful, deterministic clamp applied before the
//! pointer-constraint and monitor-clamp stages.

use crate::utils::Point;

/// Which side of the barrier pointer motion is blocked from crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarrierFilter {
    /// Blocks motion moving in the positive x direction.
    BlockPositiveX,
    /// Blocks motion moving in the negative x direction.
    BlockNegativeX,
    /// Blocks motion moving in the positive y direction.
    BlockPositiveY,
    /// Blocks motion moving in the negative y direction.
    BlockNegativeY,
}

/// A single directional line-segment barrier.
#[derive(Debug, Clone, Copy)]
pub struct Barrier {
    /// Segment start.
    pub a: Point<f64>,
    /// Segment end.
    pub b: Point<f64>,
    /// Directions this barrier blocks.
    pub filter: BarrierFilter,
}

impl Barrier {
    fn blocks(&self, old: Point<f64>, new: Point<f64>) -> bool {
        match self.filter {
            BarrierFilter::BlockPositiveX => new.x > old.x,
            BarrierFilter::BlockNegativeX => new.x < old.x,
            BarrierFilter::BlockPositiveY => new.y > old.y,
            BarrierFilter::BlockNegativeY => new.y < old.y,
        }
    }

    /// Whether the segment `old -> new` crosses this barrier's segment.
    fn crosses(&self, old: Point<f64>, new: Point<f64>) -> Option<Point<f64>> {
        segment_intersection(old, new, self.a, self.b)
    }
}

/// Owns a set of barriers and the currently-engaged barrier (if any), for
/// hysteresis: once a barrier is hit, the pointer is pinned to it until
/// motion moves back across, so it doesn't chatter at the boundary.
#[derive(Debug, Default)]
pub struct BarrierManager {
    barriers: Vec<Barrier>,
    /// Index of the barrier currently holding the pointer, if any.
    engaged: Option<usize>,
}

impl BarrierManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active barrier set.
    pub fn set_barriers(&mut self, barriers: Vec<Barrier>) {
        self.barriers = barriers;
        self.engaged = None;
    }

    /// Clamps `new` in place against active barriers, given the pointer's
    /// current position `old`. Deterministic given input; stateful across
    /// calls for release hysteresis.
    pub fn clamp(&mut self, old: Point<f64>, new: &mut Point<f64>) {
        if let Some(idx) = self.engaged {
            let barrier = self.barriers[idx];
            if !barrier.blocks(old, *new) {
                self.engaged = None;
            } else if let Some(hit) = barrier.crosses(old, *new) {
                *new = hit;
                return;
            } else {
                // Still pinned against the barrier even though the
                // straight-line segment no longer crosses it (can happen
                // with a held-down barrier and a new motion vector along
                // its own line); keep the old, barrier-side position.
                *new = old;
                return;
            }
        }

        for (idx, barrier) in self.barriers.iter().enumerate() {
            if !barrier.blocks(old, *new) {
                continue;
            }
            if let Some(hit) = barrier.crosses(old, *new) {
                *new = hit;
                self.engaged = Some(idx);
                return;
            }
        }
    }
}

/// Intersection point of segment `p1->p2` with segment `p3->p4`, if any,
/// using the standard parametric line-segment intersection formula.
fn segment_intersection(p1: Point<f64>, p2: Point<f64>, p3: Point<f64>, p4: Point<f64>) -> Option<Point<f64>> {
    let d1x = p2.x - p1.x;
    let d1y = p2.y - p1.y;
    let d2x = p4.x - p3.x;
    let d2y = p4.y - p3.y;

    let denom = d1x * d2y - d1y * d2x;
    if denom.abs() < f64::EPSILON {
        return None;
    }

    let t = ((p3.x - p1.x) * d2y - (p3.y - p1.y) * d2x) / denom;
    let u = ((p3.x - p1.x) * d1y - (p3.y - p1.y) * d1x) / denom;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(Point::new(p1.x + t * d1x, p1.y + t * d1y))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crossing_barrier_snaps_onto_segment() {
        let mut mgr = BarrierManager::new();
        mgr.set_barriers(vec![Barrier {
            a: Point::new(100.0, 0.0),
            b: Point::new(100.0, 200.0),
            filter: BarrierFilter::BlockPositiveX,
        }]);
        let old = Point::new(90.0, 50.0);
        let mut new = Point::new(110.0, 50.0);
        mgr.clamp(old, &mut new);
        assert!((new.x - 100.0).abs() < 1e-9);
        assert!((new.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn non_blocking_direction_passes_through() {
        let mut mgr = BarrierManager::new();
        mgr.set_barriers(vec![Barrier {
            a: Point::new(100.0, 0.0),
            b: Point::new(100.0, 200.0),
            filter: BarrierFilter::BlockPositiveX,
        }]);
        let old = Point::new(110.0, 50.0);
        let mut new = Point::new(90.0, 50.0);
        mgr.clamp(old, &mut new);
        assert_eq!(new, Point::new(90.0, 50.0));
    }

    #[test]
    fn hysteresis_releases_once_motion_reverses() {
        let mut mgr = BarrierManager::new();
        mgr.set_barriers(vec![Barrier {
            a: Point::new(100.0, 0.0),
            b: Point::new(100.0, 200.0),
            filter: BarrierFilter::BlockPositiveX,
        }]);
        let mut pos = Point::new(90.0, 50.0);
        let mut candidate = Point::new(110.0, 50.0);
        mgr.clamp(pos, &mut candidate);
        pos = candidate;
        assert!(mgr.engaged.is_some());

        let mut candidate2 = Point::new(80.0, 50.0);
        mgr.clamp(pos, &mut candidate2);
        assert_eq!(candidate2, Point::new(80.0, 50.0));
        assert!(mgr.engaged.is_none());
    }
}
