//! Tablet tool descriptors and per-event traits (C10).

use super::{AbsolutePositionEvent, ButtonState, Event, InputBackend, UnusedEvent};
use crate::utils::Point;
use bitflags::bitflags;

/// Description of a physical tablet tool, identified by (serial, type) and
/// cached so that repeated proximity-in events return the same logical tool
/// (see [`crate::tablet`]).
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct TabletToolDescriptor {
    /// High-level type of the tool.
    pub tool_type: TabletToolType,
    /// Unique hardware serial number of the tool.
    pub hardware_serial: u64,
    /// Hardware id in Wacom's format.
    pub hardware_id_wacom: u64,
    /// Axes this tool reports, beyond x/y and tip up/down.
    pub capabilities: TabletToolCapabilities,
}

/// Physical type of a tablet tool.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum TabletToolType {
    /// A generic pen.
    Pen,
    /// Eraser end of a pen.
    Eraser,
    /// A paintbrush-like tool.
    Brush,
    /// Physical drawing tool, e.g. Wacom Inking Pen.
    Pencil,
    /// An airbrush-like tool.
    Airbrush,
    /// A mouse bound to the tablet.
    Mouse,
    /// A mouse tool with a lens.
    Lens,
    /// A rotary totem with positional and rotation data.
    Totem,
    /// Type not known or not matching any known ones.
    Unknown,
}

impl TabletToolType {
    /// MOUSE and LENS tools always use relative motion regardless of the
    /// device's mapping mode (§4.10, §4.14).
    pub fn always_relative(self) -> bool {
        matches!(self, TabletToolType::Mouse | TabletToolType::Lens)
    }
}

bitflags! {
    /// Extra axes a tablet tool may report, beyond x/y and tip up/down.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct TabletToolCapabilities: u32 {
        /// Tilt axes
        const TILT = 1;
        /// Pressure axis
        const PRESSURE = 2;
        /// Distance axis
        const DISTANCE = 4;
        /// Z-rotation axis
        const ROTATION = 16;
        /// Slider axis
        const SLIDER = 32;
        /// Wheel axis
        const WHEEL = 64;
    }
}

/// Tablet tool axis event.
///
/// Coordinates are untransformed (mm from the top-left corner of the tablet
/// in its current logical orientation); the motion pipeline (C12) transforms
/// them into stage space.
pub trait TabletToolEvent<B: InputBackend>: AbsolutePositionEvent<B> {
    /// The tool that caused this event.
    fn tool(&self) -> TabletToolDescriptor;

    /// Delta between the last and new position, interpreted as pixel movement.
    fn delta(&self) -> Point<f64> {
        Point::new(self.delta_x(), self.delta_y())
    }

    /// Tilt along (X, Y), in degrees off the tablet's z axis. `(0, 0)` if unsupported.
    fn tilt(&self) -> (f64, f64) {
        (self.tilt_x(), self.tilt_y())
    }

    /// Whether either tilt axis changed in this event.
    fn tilt_has_changed(&self) -> bool {
        self.tilt_x_has_changed() || self.tilt_y_has_changed()
    }

    /// Delta on the x axis.
    fn delta_x(&self) -> f64;
    /// Delta on the y axis.
    fn delta_y(&self) -> f64;

    /// Distance of the tool from the surface, or 0 if unsupported.
    fn distance(&self) -> f64;
    /// Whether the distance axis changed in this event.
    fn distance_has_changed(&self) -> bool;

    /// Pressure applied by the tool, normalized to [0, 1], or 0 if unsupported.
    fn pressure(&self) -> f64;
    /// Whether the pressure axis changed in this event.
    fn pressure_has_changed(&self) -> bool;

    /// Slider position, normalized to [-1, 1], or 0 if unsupported.
    fn slider_position(&self) -> f64;
    /// Whether the slider axis changed in this event.
    fn slider_has_changed(&self) -> bool;

    /// Tilt along the X axis, in degrees, or 0 if unsupported.
    fn tilt_x(&self) -> f64;
    /// Whether tilt X changed in this event.
    fn tilt_x_has_changed(&self) -> bool;

    /// Tilt along the Y axis, in degrees, or 0 if unsupported.
    fn tilt_y(&self) -> f64;
    /// Whether tilt Y changed in this event.
    fn tilt_y_has_changed(&self) -> bool;

    /// Z rotation of the tool in degrees, or 0 if unsupported.
    fn rotation(&self) -> f64;
    /// Whether rotation changed in this event.
    fn rotation_has_changed(&self) -> bool;

    /// Wheel delta in degrees.
    fn wheel_delta(&self) -> f64;
    /// Wheel delta in discrete steps (wheel clicks).
    fn wheel_delta_discrete(&self) -> i32;
    /// Whether the wheel axis changed in this event.
    fn wheel_has_changed(&self) -> bool;
}

impl<B: InputBackend> TabletToolEvent<B> for UnusedEvent {
    fn tool(&self) -> TabletToolDescriptor {
        match *self {}
    }
    fn delta_x(&self) -> f64 {
        match *self {}
    }
    fn delta_y(&self) -> f64 {
        match *self {}
    }
    fn distance(&self) -> f64 {
        match *self {}
    }
    fn distance_has_changed(&self) -> bool {
        match *self {}
    }
    fn pressure(&self) -> f64 {
        match *self {}
    }
    fn pressure_has_changed(&self) -> bool {
        match *self {}
    }
    fn slider_position(&self) -> f64 {
        match *self {}
    }
    fn slider_has_changed(&self) -> bool {
        match *self {}
    }
    fn tilt_x(&self) -> f64 {
        match *self {}
    }
    fn tilt_x_has_changed(&self) -> bool {
        match *self {}
    }
    fn tilt_y(&self) -> f64 {
        match *self {}
    }
    fn tilt_y_has_changed(&self) -> bool {
        match *self {}
    }
    fn rotation(&self) -> f64 {
        match *self {}
    }
    fn rotation_has_changed(&self) -> bool {
        match *self {}
    }
    fn wheel_delta(&self) -> f64 {
        match *self {}
    }
    fn wheel_delta_discrete(&self) -> i32 {
        match *self {}
    }
    fn wheel_has_changed(&self) -> bool {
        match *self {}
    }
}

/// Trait for axis tablet tool events.
pub trait TabletToolAxisEvent<B: InputBackend>: TabletToolEvent<B> + Event<B> {}

impl<B: InputBackend> TabletToolAxisEvent<B> for UnusedEvent {}

/// Proximity state of a tool: whether it is within detectable distance of the tablet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProximityState {
    /// Out of proximity.
    Out,
    /// In proximity.
    In,
}

/// Tablet tool proximity event.
pub trait TabletToolProximityEvent<B: InputBackend>: TabletToolEvent<B> + Event<B> {
    /// New proximity state.
    fn state(&self) -> ProximityState;
}

impl<B: InputBackend> TabletToolProximityEvent<B> for UnusedEvent {
    fn state(&self) -> ProximityState {
        match *self {}
    }
}

/// Tip contact state of a tool: whether it is touching the tablet surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabletToolTipState {
    /// Not touching the surface.
    Up,
    /// Touching the surface.
    Down,
}

/// Tablet tool tip event.
///
/// Per §4.14/§5, axes are flushed before tip-down and after tip-up so
/// coordinates are correct at the moment of contact transition.
pub trait TabletToolTipEvent<B: InputBackend>: TabletToolEvent<B> + Event<B> {
    /// New tip state.
    fn tip_state(&self) -> TabletToolTipState;
}

impl<B: InputBackend> TabletToolTipEvent<B> for UnusedEvent {
    fn tip_state(&self) -> TabletToolTipState {
        match *self {}
    }
}

/// Tablet tool button event.
pub trait TabletToolButtonEvent<B: InputBackend>: TabletToolEvent<B> + Event<B> {
    /// Raw button code that triggered this event.
    fn button(&self) -> u32;
    /// Total number of buttons pressed on all devices of the associated seat after this event.
    fn seat_button_count(&self) -> u32;
    /// Press or release.
    fn button_state(&self) -> ButtonState;
}

impl<B: InputBackend> TabletToolButtonEvent<B> for UnusedEvent {
    fn button(&self) -> u32 {
        match *self {}
    }
    fn seat_button_count(&self) -> u32 {
        match *self {}
    }
    fn button_state(&self) -> ButtonState {
        match *self {}
    }
}
