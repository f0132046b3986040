//! Pointer motion pipeline (C12): absolute/relative translation, the
//! barrier -> constraint -> monitor-clamp chain, warp, and cross-output
//! relative-motion scaling.
//!
//! New code, composing the already-grounded [`crate::barrier`], [`crate::constraint`]
//! and [`crate::viewport`] primitives the way `input/pointer/mod.rs`'s
//! `MotionEvent` handling implies a host would: barriers are checked first,
//! then an optional region constraint, then the pointer is clamped back
//! inside some monitor so it can never escape the whole layout.

use crate::barrier::BarrierManager;
use crate::constraint::PointerConstraint;
use crate::utils::{Point, Size};
use crate::viewport::ViewportProvider;

/// Runs the absolute-motion constrain chain: barriers, then an optional
/// region constraint, then the monitor clamp, in that fixed order (§4.6).
pub struct MotionPipeline {
    barriers: BarrierManager,
    constraint: Option<Box<dyn PointerConstraint>>,
}

impl Default for MotionPipeline {
    fn default() -> Self {
        MotionPipeline { barriers: BarrierManager::new(), constraint: None }
    }
}

impl MotionPipeline {
    /// Creates an empty pipeline: no barriers, no constraint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active barrier set.
    pub fn set_barriers(&mut self, barriers: Vec<crate::barrier::Barrier>) {
        self.barriers.set_barriers(barriers);
    }

    /// Installs (or clears) the active pointer constraint.
    pub fn set_constraint(&mut self, constraint: Option<Box<dyn PointerConstraint>>) {
        self.constraint = constraint;
    }

    /// Runs `candidate` through barriers, the constraint, and the monitor
    /// clamp, returning the final position.
    pub fn constrain(&mut self, old: Point<f64>, mut candidate: Point<f64>, viewports: &dyn ViewportProvider) -> Point<f64> {
        self.barriers.clamp(old, &mut candidate);
        if let Some(constraint) = self.constraint.as_mut() {
            constraint.constrain(old, &mut candidate);
        }
        clamp_to_viewports(candidate, viewports)
    }
}

/// Clamps `point` so it always lies within some monitor (escape
/// prevention): if it's already inside one, clamp to that one's rect;
/// otherwise clamp to whichever view's rect is nearest by center distance.
pub fn clamp_to_viewports(point: Point<f64>, viewports: &dyn ViewportProvider) -> Point<f64> {
    let views = viewports.views();
    if views.is_empty() {
        return point;
    }
    if let Some(idx) = viewports.hit_test(point) {
        return views[idx].rect.to_f64().constrain(point);
    }

    let mut nearest = 0;
    let mut nearest_dist = f64::MAX;
    for (idx, view) in views.iter().enumerate() {
        let r = view.rect.to_f64();
        let cx = (r.left() + r.right()) / 2.0;
        let cy = (r.top() + r.bottom()) / 2.0;
        let dist = (point.x - cx).powi(2) + (point.y - cy).powi(2);
        if dist < nearest_dist {
            nearest_dist = dist;
            nearest = idx;
        }
    }
    views[nearest].rect.to_f64().constrain(point)
}

/// Maps a pointer's normalized `[0, 1] x [0, 1]` absolute position across
/// the whole viewport layout's bounding box.
pub fn absolute_motion_pointer(normalized: Point<f64>, viewports: &dyn ViewportProvider) -> Point<f64> {
    let (w, h) = viewports.extents();
    Point::new(normalized.x * w as f64, normalized.y * h as f64)
}

/// Maps a tablet tool's physical-mm position on its tablet surface into
/// `target_view`'s rect, since tablets are mapped to a single monitor
/// rather than the whole layout (the tablet branch of C12's absolute
/// motion pipeline).
pub fn absolute_motion_tablet(
    mm: Point<f64>,
    mm_size: Size<f64>,
    target_view: usize,
    viewports: &dyn ViewportProvider,
) -> Option<Point<f64>> {
    let view = viewports.views().get(target_view)?;
    let rect = view.rect.to_f64();
    let nx = (mm.x / mm_size.w).clamp(0.0, 1.0);
    let ny = (mm.y / mm_size.h).clamp(0.0, 1.0);
    Some(Point::new(
        rect.left() + nx * (rect.right() - rect.left()),
        rect.top() + ny * (rect.bottom() - rect.top()),
    ))
}

/// Maximum number of output-boundary crossings handled in one relative
/// motion event before giving up and returning wherever the bisection
/// landed; guards against pathological zero-width viewport layouts.
const MAX_BOUNDARY_CROSSINGS: u32 = 8;
/// Bisection iterations used to locate each output-boundary crossing.
const BISECTION_STEPS: u32 = 20;

/// Applies a relative motion delta `(dx, dy)` (in physical/device pixels)
/// to `old`, scaling by the current view's scale factor, and re-scaling
/// for each output boundary the motion vector crosses (C12).
///
/// A single relative event can cross from a hi-dpi monitor onto a lo-dpi
/// one (or vice versa); naively applying one scale factor for the whole
/// vector would either overshoot or undershoot past the boundary. Instead
/// the crossing point is located by bisection and the remaining delta is
/// re-scaled by the new view's factor before continuing.
pub fn relative_motion(old: Point<f64>, dx: f64, dy: f64, viewports: &dyn ViewportProvider) -> Point<f64> {
    let mut pos = old;
    let mut remaining = (dx, dy);
    let mut current_view = viewports.hit_test(pos);

    for _ in 0..MAX_BOUNDARY_CROSSINGS {
        let scale = current_view.map(|i| viewports.views()[i].scale).unwrap_or(1.0);
        let candidate = Point::new(pos.x + remaining.0 * scale, pos.y + remaining.1 * scale);
        let candidate_view = viewports.hit_test(candidate);

        if candidate_view == current_view || viewports.views().is_empty() {
            return candidate;
        }

        // Bisect for the fraction of `remaining` at which motion first
        // lands outside `current_view`; `hi` (not `lo`) is used to advance
        // so the next iteration starts unambiguously inside the new view
        // rather than sitting exactly on the shared boundary.
        let mut lo = 0.0f64;
        let mut hi = 1.0f64;
        for _ in 0..BISECTION_STEPS {
            let mid = (lo + hi) / 2.0;
            let mid_point = Point::new(pos.x + remaining.0 * scale * mid, pos.y + remaining.1 * scale * mid);
            if viewports.hit_test(mid_point) == current_view {
                lo = mid;
            } else {
                hi = mid;
            }
        }

        let crossing = Point::new(pos.x + remaining.0 * scale * hi, pos.y + remaining.1 * scale * hi);
        remaining = (remaining.0 * (1.0 - hi), remaining.1 * (1.0 - hi));
        pos = crossing;
        current_view = viewports.hit_test(pos);
    }

    pos
}

/// Directly sets the pointer position, bypassing barriers and the
/// constraint, but still clamped inside the viewport layout (C12 warp).
pub fn warp(target: Point<f64>, viewports: &dyn ViewportProvider) -> Point<f64> {
    clamp_to_viewports(target, viewports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::Rectangle;
    use crate::viewport::{StaticViewportLayout, View};

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32> {
        Rectangle::from_loc_and_size(Point::new(x, y), Size::new(w, h))
    }

    fn two_monitor_layout() -> StaticViewportLayout {
        let mut layout = StaticViewportLayout::new();
        layout.push(View { rect: rect(0, 0, 1000, 1000), scale: 1.0 });
        layout.push(View { rect: rect(1000, 0, 1000, 1000), scale: 2.0 });
        layout
    }

    #[test]
    fn clamp_to_viewports_keeps_point_inside_nearest_monitor() {
        let layout = two_monitor_layout();
        let clamped = clamp_to_viewports(Point::new(-50.0, 500.0), &layout);
        assert!(clamped.x >= 0.0 && clamped.x < 1000.0);
    }

    #[test]
    fn relative_motion_within_one_view_uses_its_scale() {
        let layout = two_monitor_layout();
        let result = relative_motion(Point::new(500.0, 500.0), 100.0, 0.0, &layout);
        assert_eq!(result, Point::new(600.0, 500.0));
    }

    #[test]
    fn relative_motion_crossing_boundary_rescales_remainder() {
        let layout = two_monitor_layout();
        // Starting 10px from the boundary in the scale-1.0 view, moving
        // 110px right: 10 raw px reach the boundary at x=1000, then the
        // remaining 100 raw px are rescaled by the scale-2.0 view's factor,
        // landing 200px past the boundary.
        let result = relative_motion(Point::new(990.0, 500.0), 110.0, 0.0, &layout);
        assert!((result.x - 1200.0).abs() < 1e-3, "expected x=1200, got {}", result.x);
    }

    #[test]
    fn absolute_motion_pointer_spans_full_layout() {
        let layout = two_monitor_layout();
        let p = absolute_motion_pointer(Point::new(1.0, 1.0), &layout);
        assert_eq!(p, Point::new(2000.0, 1000.0));
    }

    #[test]
    fn absolute_motion_tablet_maps_into_target_view() {
        let layout = two_monitor_layout();
        let p = absolute_motion_tablet(Point::new(50.0, 50.0), Size::new(100.0, 100.0), 1, &layout).unwrap();
        assert_eq!(p, Point::new(1500.0, 500.0));
    }
}
