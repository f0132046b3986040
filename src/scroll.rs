//! Continuous-scroll accumulation and synthetic discrete-scroll emission
//! (C13).
//!
//! New code, grounded on `backend::input::{AxisSource, Axis}` — the raw
//! shape the translator (C14) already exposes — generalized into a
//! standalone, unit-testable accumulator per axis.

use crate::backend::input::{Axis, AxisSource};

/// Pixels of continuous scroll that equal one synthetic discrete step
/// (§6 constants, bit-exact).
pub const DISCRETE_SCROLL_STEP: f64 = 10.0;

/// One emitted discrete direction for an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscreteDirection {
    /// Horizontal, toward negative x.
    Left,
    /// Horizontal, toward positive x.
    Right,
    /// Vertical, toward negative y.
    Up,
    /// Vertical, toward positive y.
    Down,
}

/// Result of folding one raw axis event through the accumulator.
#[derive(Debug, Clone, Default)]
pub struct ScrollOutcome {
    /// Smooth (pixel) delta to report for this axis, always emitted first.
    pub smooth: Option<f64>,
    /// Discrete steps derived from the accumulator this event, in order.
    pub discrete: Vec<DiscreteDirection>,
    /// Whether `discrete` was synthesized from a continuous accumulator
    /// (`true`) or passed through one-for-one from real wheel clicks
    /// (`false`, §4.13).
    pub emulated: bool,
    /// Whether this axis's continuous sequence finished (libinput FINISHED).
    pub finished: bool,
}

/// Per-axis continuous-scroll accumulator (C13).
#[derive(Debug, Default)]
pub struct ScrollAccumulator {
    acc_x: f64,
    acc_y: f64,
}

impl ScrollAccumulator {
    /// Creates a fresh, zeroed accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one raw axis event for `axis` into the accumulator.
    ///
    /// `amount` is the continuous pixel delta (for `Finger`/`Continuous`
    /// sources) or `None` when wheel/tilt sources report only a discrete
    /// value. `discrete_clicks` is the raw wheel click count for
    /// `Wheel`/`WheelTilt` sources. `finished` is the libinput FINISHED flag
    /// for this axis on this event.
    pub fn process(
        &mut self,
        axis: Axis,
        source: AxisSource,
        amount: Option<f64>,
        discrete_clicks: Option<f64>,
        finished: bool,
    ) -> ScrollOutcome {
        match source {
            AxisSource::Wheel | AxisSource::WheelTilt => {
                let amount = amount.unwrap_or(0.0);
                let mut outcome = ScrollOutcome {
                    smooth: Some(amount),
                    discrete: Vec::new(),
                    emulated: false,
                    finished: false,
                };
                if let Some(clicks) = discrete_clicks {
                    let steps = clicks.abs().round() as u32;
                    let dir = direction_for(axis, clicks < 0.0);
                    for _ in 0..steps.max(if clicks != 0.0 { 1 } else { 0 }) {
                        outcome.discrete.push(dir);
                    }
                }
                outcome
            }
            AxisSource::Finger | AxisSource::Continuous => {
                let amount = amount.unwrap_or(0.0);
                let acc = self.acc_mut(axis);

                if finished {
                    *acc = 0.0;
                    return ScrollOutcome {
                        smooth: Some(0.0),
                        discrete: Vec::new(),
                        emulated: false,
                        finished: true,
                    };
                }

                *acc += amount;
                let mut outcome = ScrollOutcome {
                    smooth: Some(amount),
                    discrete: Vec::new(),
                    emulated: true,
                    finished: false,
                };

                let acc_now = self.acc_mut(axis);
                let steps = (acc_now.abs() / DISCRETE_SCROLL_STEP).floor() as u32;
                if steps > 0 {
                    let dir = direction_for(axis, *acc_now < 0.0);
                    for _ in 0..steps {
                        outcome.discrete.push(dir);
                    }
                    let sign = if *acc_now < 0.0 { -1.0 } else { 1.0 };
                    *acc_now = sign * (acc_now.abs() % DISCRETE_SCROLL_STEP);
                }
                outcome
            }
        }
    }

    fn acc_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::Horizontal => &mut self.acc_x,
            Axis::Vertical => &mut self.acc_y,
        }
    }

    /// Current accumulator magnitude for `axis` (exposed for I7 testing).
    pub fn accumulated(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.acc_x,
            Axis::Vertical => self.acc_y,
        }
    }
}

fn direction_for(axis: Axis, negative: bool) -> DiscreteDirection {
    match (axis, negative) {
        (Axis::Horizontal, true) => DiscreteDirection::Left,
        (Axis::Horizontal, false) => DiscreteDirection::Right,
        (Axis::Vertical, true) => DiscreteDirection::Up,
        (Axis::Vertical, false) => DiscreteDirection::Down,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_scroll_emits_discrete_once_threshold_crossed() {
        let mut acc = ScrollAccumulator::new();
        let o1 = acc.process(Axis::Vertical, AxisSource::Finger, Some(4.0), None, false);
        assert_eq!(o1.smooth, Some(4.0));
        assert!(o1.discrete.is_empty());

        let o2 = acc.process(Axis::Vertical, AxisSource::Finger, Some(4.0), None, false);
        assert!(o2.discrete.is_empty());

        let o3 = acc.process(Axis::Vertical, AxisSource::Finger, Some(4.0), None, false);
        assert_eq!(o3.discrete, vec![DiscreteDirection::Down]);
        assert!(acc.accumulated(Axis::Vertical).abs() < DISCRETE_SCROLL_STEP);
    }

    #[test]
    fn finished_resets_accumulator_with_no_discrete() {
        let mut acc = ScrollAccumulator::new();
        acc.process(Axis::Vertical, AxisSource::Finger, Some(9.0), None, false);
        let outcome = acc.process(Axis::Vertical, AxisSource::Finger, Some(0.0), None, true);
        assert!(outcome.finished);
        assert!(outcome.discrete.is_empty());
        assert_eq!(acc.accumulated(Axis::Vertical), 0.0);
    }

    #[test]
    fn wheel_emits_exactly_one_discrete_per_click() {
        let mut acc = ScrollAccumulator::new();
        let outcome = acc.process(Axis::Vertical, AxisSource::Wheel, Some(15.0), Some(1.0), false);
        assert_eq!(outcome.discrete.len(), 1);
        assert_eq!(outcome.discrete[0], DiscreteDirection::Down);
    }
}
