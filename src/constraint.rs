//! External pointer-region confinement (C6).
//!
//! New code, grounded on the same `input/pointer/mod.rs` motion-handling
//! shape as [`crate::barrier`]; applied second in the constrain chain
//! (barriers → constraint → monitor clamp, §4.6).

use crate::utils::{Point, Rectangle};

/// An externally-installed pointer constraint: given the pointer's old and
/// candidate new position, may rewrite the candidate to keep it inside a
/// confinement region.
pub trait PointerConstraint: std::fmt::Debug {
    /// Applies the constraint, rewriting `new` in place if needed.
    fn constrain(&mut self, old: Point<f64>, new: &mut Point<f64>);
}

/// A constraint that confines the pointer to a single rectangular region.
#[derive(Debug, Clone, Copy)]
pub struct RegionConstraint {
    /// The confinement region, in stage coordinates.
    pub region: Rectangle<f64>,
}

impl PointerConstraint for RegionConstraint {
    fn constrain(&mut self, _old: Point<f64>, new: &mut Point<f64>) {
        *new = self.region.constrain(*new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Size;

    #[test]
    fn region_constraint_clamps_into_region() {
        let mut constraint = RegionConstraint {
            region: Rectangle::from_loc_and_size(Point::new(0.0, 0.0), Size::new(100.0, 100.0)),
        };
        let mut new = Point::new(150.0, 50.0);
        constraint.constrain(Point::new(50.0, 50.0), &mut new);
        assert_eq!(new, Point::new(99.0, 50.0));
    }
}
