//! Common traits and types for input backends to feed the seat engine.
//!
//! This is the reconstructed shape of the generic event surface: an
//! [`InputBackend`] names a family of associated event types, each event
//! implements [`Event`] plus whichever per-kind trait describes its payload
//! (`KeyboardKeyEvent`, `PointerMotionEvent`, `TabletToolAxisEvent`, ...),
//! and a single [`InputEvent`] enum is what the dispatch loop (C15) hands to
//! the translator (C14).

use std::fmt;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod tablet;

pub use tablet::{
    ProximityState, TabletToolAxisEvent, TabletToolButtonEvent, TabletToolCapabilities,
    TabletToolDescriptor, TabletToolEvent, TabletToolProximityEvent, TabletToolTipEvent,
    TabletToolTipState, TabletToolType,
};

/// An uninhabited event type used as the default associated event for event
/// kinds a given backend never produces.
#[derive(Debug)]
pub enum UnusedEvent {}

impl<B: InputBackend> Event<B> for UnusedEvent {
    fn time(&self) -> u64 {
        match *self {}
    }
    fn device(&self) -> B::Device {
        match *self {}
    }
}

/// A type implemented by all input backends, describing their associated event types.
pub trait InputBackend: Sized + fmt::Debug {
    /// The type representing a physical or logical device for this backend.
    type Device: Device + 'static;

    /// Type representing keyboard key events
    type KeyboardKeyEvent: KeyboardKeyEvent<Self> + 'static;
    /// Type representing pointer relative motion events
    type PointerMotionEvent: PointerMotionEvent<Self> + 'static;
    /// Type representing pointer absolute motion events
    type PointerMotionAbsoluteEvent: PointerMotionAbsoluteEvent<Self> + 'static;
    /// Type representing pointer button events
    type PointerButtonEvent: PointerButtonEvent<Self> + 'static;
    /// Type representing pointer axis (scroll) events
    type PointerAxisEvent: PointerAxisEvent<Self> + 'static;

    /// Type representing touch down events
    type TouchDownEvent: TouchDownEvent<Self> + 'static;
    /// Type representing touch motion events
    type TouchMotionEvent: TouchMotionEvent<Self> + 'static;
    /// Type representing touch up events
    type TouchUpEvent: TouchUpEvent<Self> + 'static;
    /// Type representing touch cancel events
    type TouchCancelEvent: TouchCancelEvent<Self> + 'static;
    /// Type representing touch frame events
    type TouchFrameEvent: TouchFrameEvent<Self> + 'static;

    /// Type representing tablet tool axis events
    type TabletToolAxisEvent: TabletToolAxisEvent<Self> + 'static;
    /// Type representing tablet tool proximity events
    type TabletToolProximityEvent: TabletToolProximityEvent<Self> + 'static;
    /// Type representing tablet tool tip events
    type TabletToolTipEvent: TabletToolTipEvent<Self> + 'static;
    /// Type representing tablet tool button events
    type TabletToolButtonEvent: TabletToolButtonEvent<Self> + 'static;

    /// Type representing tablet pad button events
    type TabletPadButtonEvent: TabletPadButtonEvent<Self> + 'static;
    /// Type representing tablet pad ring events
    type TabletPadRingEvent: TabletPadRingEvent<Self> + 'static;
    /// Type representing tablet pad strip events
    type TabletPadStripEvent: TabletPadStripEvent<Self> + 'static;

    /// Type representing touchpad/trackpoint gesture swipe begin events
    type GestureSwipeBeginEvent: GestureSwipeBeginEvent<Self> + 'static;
    /// Type representing gesture swipe update events
    type GestureSwipeUpdateEvent: GestureSwipeUpdateEvent<Self> + 'static;
    /// Type representing gesture swipe end events
    type GestureSwipeEndEvent: GestureEndEvent<Self> + 'static;
    /// Type representing gesture pinch begin events
    type GesturePinchBeginEvent: GesturePinchBeginEvent<Self> + 'static;
    /// Type representing gesture pinch update events
    type GesturePinchUpdateEvent: GesturePinchUpdateEvent<Self> + 'static;
    /// Type representing gesture pinch end events
    type GesturePinchEndEvent: GestureEndEvent<Self> + 'static;

    /// Type representing switch toggle events (e.g. tablet-mode switch, lid switch)
    type SwitchToggleEvent: SwitchToggleEvent<Self> + 'static;

    /// Type representing any other, backend-specific special event
    type SpecialEvent: 'static;
}

/// Common interface for all events implemented by a backend.
pub trait Event<B: InputBackend> {
    /// Returns the timestamp in microseconds of this event, as reported by the kernel.
    fn time(&self) -> u64;

    /// Returns the timestamp in milliseconds, as most outbound events need it.
    fn time_msec(&self) -> u32 {
        (self.time() / 1000) as u32
    }

    /// Returns the device this event originated from.
    fn device(&self) -> B::Device;
}

/// Trait implemented by a backend's device handle.
pub trait Device: fmt::Debug {
    /// An identifier unique to this device, stable across its lifetime on this backend.
    fn id(&self) -> String;

    /// Does this device report the given capability.
    fn has_capability(&self, capability: DeviceCapability) -> bool;
}

/// A device capability, queried from the raw backend device to drive C9 classification.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum DeviceCapability {
    /// A keyboard
    Keyboard,
    /// A pointer (mouse, trackball, trackpoint)
    Pointer,
    /// A multi-touch touchscreen
    Touch,
    /// A tablet tool (pen/stylus digitizer)
    TabletTool,
    /// A tablet pad (buttons/rings/strips)
    TabletPad,
    /// A gesture-capable touchpad
    Gesture,
    /// A switch device (tablet-mode, lid)
    Switch,
}

/// State of a key on a keyboard.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyState {
    /// Key is released
    Released,
    /// Key is pressed
    Pressed,
}

/// Distinguishes a genuine key transition from a synthetic auto-repeat firing.
///
/// The `AUTOREPEAT` sentinel (value 2 in the external wire format, see
/// `SPEC_FULL.md` §6) is distinct from both press and release so the
/// translator can skip xkb state updates for it (I8).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum KeyTransition {
    /// Genuine release
    Released,
    /// Genuine press
    Pressed,
    /// Synthetic auto-repeat firing of an already-pressed key
    Repeated,
}

/// State of a pointer or tablet tool button.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ButtonState {
    /// Button is released
    Released,
    /// Button is pressed
    Pressed,
}

/// Axis when scrolling.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Axis {
    /// Vertical axis
    Vertical,
    /// Horizontal axis
    Horizontal,
}

/// Source of an axis event.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AxisSource {
    /// Finger on a touchpad: guarantees a terminating zero-value event.
    Finger,
    /// Continuous scrolling device, almost identical to `Finger`.
    Continuous,
    /// Scroll wheel: discrete steps, no terminating event guaranteed.
    Wheel,
    /// Scrolling via tilting the scroll wheel.
    WheelTilt,
}

/// Phase of a touchpad gesture.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum GesturePhase {
    /// Gesture started
    Begin,
    /// Gesture in progress
    Update,
    /// Gesture ended normally
    End,
    /// Gesture was cancelled
    Cancel,
}

/// A tablet pad mode/group/source descriptor shared by button, ring and strip events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabletPadGroup {
    /// Mode group this control belongs to
    pub group: u32,
    /// Current mode within that group
    pub mode: u32,
}

/// Source of a tablet pad ring or strip event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabletPadSource {
    /// Changed by finger
    Finger,
    /// Changed by a physical button/knob
    Unknown,
}

/// A switch that can be toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    /// Laptop lid switch
    Lid,
    /// Tablet-mode switch
    TabletMode,
}

/// State of a switch toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchState {
    /// Switch is off
    Off,
    /// Switch is on
    On,
}

/// Trait for absolute-position events (pointer-absolute and tablet-tool events).
pub trait AbsolutePositionEvent<B: InputBackend>: Event<B> {
    /// X coordinate, in [0, 1] of the device's reporting extents, or in mm for tablets.
    fn x(&self) -> f64;
    /// Y coordinate, same units as `x`.
    fn y(&self) -> f64;
    /// X transformed into the range `[0, width)`.
    fn x_transformed(&self, width: i32) -> f64;
    /// Y transformed into the range `[0, height)`.
    fn y_transformed(&self, height: i32) -> f64;
}

/// Trait for device-added events.
pub trait DeviceAddedEvent<B: InputBackend> {}
/// Trait for device-removed events.
pub trait DeviceRemovedEvent<B: InputBackend> {}

/// Keyboard key event.
pub trait KeyboardKeyEvent<B: InputBackend>: Event<B> {
    /// Linux evdev keycode of the key, without the kernel's +8 offset.
    fn key_code(&self) -> u32;
    /// Press or release.
    fn state(&self) -> KeyState;
    /// Number of keys pressed on all devices of the associated seat after this event.
    fn seat_key_count(&self) -> u32;
}

/// Pointer relative-motion event.
pub trait PointerMotionEvent<B: InputBackend>: Event<B> {
    /// Delta on the x axis, accelerated (device-unit pixels).
    fn delta_x(&self) -> f64;
    /// Delta on the y axis, accelerated.
    fn delta_y(&self) -> f64;
    /// Delta on the x axis, unaccelerated.
    fn delta_x_unaccel(&self) -> f64;
    /// Delta on the y axis, unaccelerated.
    fn delta_y_unaccel(&self) -> f64;
}

/// Pointer absolute-motion event.
pub trait PointerMotionAbsoluteEvent<B: InputBackend>: AbsolutePositionEvent<B> {}

/// Pointer button event.
pub trait PointerButtonEvent<B: InputBackend>: Event<B> {
    /// Raw evdev button code (e.g. `BTN_LEFT` = 0x110).
    fn button_code(&self) -> u32;
    /// Press or release.
    fn state(&self) -> ButtonState;
    /// Number of buttons pressed on all devices of the associated seat after this event.
    fn seat_button_count(&self) -> u32;
}

/// Pointer axis (scroll) event.
pub trait PointerAxisEvent<B: InputBackend>: Event<B> {
    /// Amount scrolled on the given axis, in surface-relative pixels, if reported.
    fn amount(&self, axis: Axis) -> Option<f64>;
    /// Amount scrolled on the given axis, in discrete (wheel click) units, if reported.
    fn amount_discrete(&self, axis: Axis) -> Option<f64>;
    /// Source of the scroll.
    fn source(&self) -> AxisSource;
    /// Whether this event terminates a continuous-source scroll sequence on the given axis.
    fn is_finished(&self, axis: Axis) -> bool {
        let _ = axis;
        false
    }
}

/// Touch-down event.
pub trait TouchDownEvent<B: InputBackend>: AbsolutePositionEvent<B> {
    /// Seat-assigned slot for this touch point.
    fn seat_slot(&self) -> Option<i32>;
}

/// Touch-motion event.
pub trait TouchMotionEvent<B: InputBackend>: AbsolutePositionEvent<B> {
    /// Seat-assigned slot for this touch point.
    fn seat_slot(&self) -> Option<i32>;
}

/// Touch-up event.
pub trait TouchUpEvent<B: InputBackend>: Event<B> {
    /// Seat-assigned slot for this touch point.
    fn seat_slot(&self) -> Option<i32>;
}

/// Touch-cancel event.
pub trait TouchCancelEvent<B: InputBackend>: Event<B> {
    /// Seat-assigned slot for this touch point.
    fn seat_slot(&self) -> Option<i32>;
}

/// Touch-frame event: marks the end of a batch of touch point updates.
pub trait TouchFrameEvent<B: InputBackend>: Event<B> {}

/// Touchpad gesture-swipe begin event.
pub trait GestureSwipeBeginEvent<B: InputBackend>: Event<B> {
    /// Number of fingers on the touchpad.
    fn finger_count(&self) -> u32;
}

/// Touchpad gesture-swipe update event.
pub trait GestureSwipeUpdateEvent<B: InputBackend>: Event<B> {
    /// Delta on the x axis since the last event.
    fn delta_x(&self) -> f64;
    /// Delta on the y axis since the last event.
    fn delta_y(&self) -> f64;
}

/// Touchpad gesture end event, shared by swipe and pinch.
pub trait GestureEndEvent<B: InputBackend>: Event<B> {
    /// Whether the gesture was cancelled rather than completed.
    fn cancelled(&self) -> bool;
}

/// Touchpad gesture-pinch begin event.
pub trait GesturePinchBeginEvent<B: InputBackend>: Event<B> {
    /// Number of fingers on the touchpad.
    fn finger_count(&self) -> u32;
}

/// Touchpad gesture-pinch update event.
pub trait GesturePinchUpdateEvent<B: InputBackend>: Event<B> {
    /// Delta on the x axis since the last event.
    fn delta_x(&self) -> f64;
    /// Delta on the y axis since the last event.
    fn delta_y(&self) -> f64;
    /// Absolute scale of the pinch, 1.0 at gesture start.
    fn scale(&self) -> f64;
    /// Angle delta in degrees, clockwise, since the last event.
    fn angle_delta(&self) -> f64;
}

/// Tablet pad button event.
pub trait TabletPadButtonEvent<B: InputBackend>: Event<B> {
    /// Button number.
    fn button_number(&self) -> u32;
    /// Press or release.
    fn button_state(&self) -> ButtonState;
    /// Mode/group this button belongs to.
    fn group(&self) -> TabletPadGroup;
}

/// Tablet pad ring event.
pub trait TabletPadRingEvent<B: InputBackend>: Event<B> {
    /// Ring number.
    fn ring_number(&self) -> u32;
    /// Current absolute position, in degrees, or `None` if the finger was lifted.
    fn position(&self) -> Option<f64>;
    /// Source of the change.
    fn source(&self) -> Option<TabletPadSource>;
    /// Mode/group this ring belongs to.
    fn group(&self) -> TabletPadGroup;
}

/// Tablet pad strip event.
pub trait TabletPadStripEvent<B: InputBackend>: Event<B> {
    /// Strip number.
    fn strip_number(&self) -> u32;
    /// Current absolute position, normalized to [0, 1], or `None` if the finger was lifted.
    fn position(&self) -> Option<f64>;
    /// Source of the change.
    fn source(&self) -> Option<TabletPadSource>;
    /// Mode/group this strip belongs to.
    fn group(&self) -> TabletPadGroup;
}

/// Switch toggle event.
pub trait SwitchToggleEvent<B: InputBackend>: Event<B> {
    /// Which switch changed.
    fn switch(&self) -> Option<Switch>;
    /// New state of the switch.
    fn state(&self) -> SwitchState;
}

/// The union of every raw event kind the dispatch loop (C15) hands to the
/// translator (C14).
#[derive(Debug)]
pub enum InputEvent<B: InputBackend> {
    /// A new device has appeared.
    DeviceAdded {
        /// The device.
        device: B::Device,
    },
    /// A device has disappeared.
    DeviceRemoved {
        /// The device.
        device: B::Device,
    },
    /// Keyboard key event.
    Keyboard {
        /// The raw event.
        event: B::KeyboardKeyEvent,
    },
    /// Pointer relative-motion event.
    PointerMotion {
        /// The raw event.
        event: B::PointerMotionEvent,
    },
    /// Pointer absolute-motion event.
    PointerMotionAbsolute {
        /// The raw event.
        event: B::PointerMotionAbsoluteEvent,
    },
    /// Pointer button event.
    PointerButton {
        /// The raw event.
        event: B::PointerButtonEvent,
    },
    /// Pointer axis (scroll) event.
    PointerAxis {
        /// The raw event.
        event: B::PointerAxisEvent,
    },
    /// Touch-down event.
    TouchDown {
        /// The raw event.
        event: B::TouchDownEvent,
    },
    /// Touch-motion event.
    TouchMotion {
        /// The raw event.
        event: B::TouchMotionEvent,
    },
    /// Touch-up event.
    TouchUp {
        /// The raw event.
        event: B::TouchUpEvent,
    },
    /// Touch-cancel event.
    TouchCancel {
        /// The raw event.
        event: B::TouchCancelEvent,
    },
    /// Touch-frame event.
    TouchFrame {
        /// The raw event.
        event: B::TouchFrameEvent,
    },
    /// Tablet tool axis event.
    TabletToolAxis {
        /// The raw event.
        event: B::TabletToolAxisEvent,
    },
    /// Tablet tool proximity event.
    TabletToolProximity {
        /// The raw event.
        event: B::TabletToolProximityEvent,
    },
    /// Tablet tool tip event.
    TabletToolTip {
        /// The raw event.
        event: B::TabletToolTipEvent,
    },
    /// Tablet tool button event.
    TabletToolButton {
        /// The raw event.
        event: B::TabletToolButtonEvent,
    },
    /// Tablet pad button event.
    TabletPadButton {
        /// The raw event.
        event: B::TabletPadButtonEvent,
    },
    /// Tablet pad ring event.
    TabletPadRing {
        /// The raw event.
        event: B::TabletPadRingEvent,
    },
    /// Tablet pad strip event.
    TabletPadStrip {
        /// The raw event.
        event: B::TabletPadStripEvent,
    },
    /// Gesture-swipe begin event.
    GestureSwipeBegin {
        /// The raw event.
        event: B::GestureSwipeBeginEvent,
    },
    /// Gesture-swipe update event.
    GestureSwipeUpdate {
        /// The raw event.
        event: B::GestureSwipeUpdateEvent,
    },
    /// Gesture-swipe end event.
    GestureSwipeEnd {
        /// The raw event.
        event: B::GestureSwipeEndEvent,
    },
    /// Gesture-pinch begin event.
    GesturePinchBegin {
        /// The raw event.
        event: B::GesturePinchBeginEvent,
    },
    /// Gesture-pinch update event.
    GesturePinchUpdate {
        /// The raw event.
        event: B::GesturePinchUpdateEvent,
    },
    /// Gesture-pinch end event.
    GesturePinchEnd {
        /// The raw event.
        event: B::GesturePinchEndEvent,
    },
    /// Switch toggle event.
    SwitchToggle {
        /// The raw event.
        event: B::SwitchToggleEvent,
    },
    /// A backend-specific event not covered by the above.
    Special(B::SpecialEvent),
}

// `UnusedEvent` is uninhabited, so every trait method below is unreachable;
// these impls exist purely so a backend that never produces some event kind
// (e.g. a backend with no tablet pad support) can write
// `type TabletPadButtonEvent = UnusedEvent;` and satisfy `InputBackend`.
impl<B: InputBackend> DeviceAddedEvent<B> for UnusedEvent {}
impl<B: InputBackend> DeviceRemovedEvent<B> for UnusedEvent {}

impl<B: InputBackend> AbsolutePositionEvent<B> for UnusedEvent {
    fn x(&self) -> f64 {
        match *self {}
    }
    fn y(&self) -> f64 {
        match *self {}
    }
    fn x_transformed(&self, _width: i32) -> f64 {
        match *self {}
    }
    fn y_transformed(&self, _height: i32) -> f64 {
        match *self {}
    }
}

impl<B: InputBackend> KeyboardKeyEvent<B> for UnusedEvent {
    fn key_code(&self) -> u32 {
        match *self {}
    }
    fn state(&self) -> KeyState {
        match *self {}
    }
    fn seat_key_count(&self) -> u32 {
        match *self {}
    }
}

impl<B: InputBackend> PointerMotionEvent<B> for UnusedEvent {
    fn delta_x(&self) -> f64 {
        match *self {}
    }
    fn delta_y(&self) -> f64 {
        match *self {}
    }
    fn delta_x_unaccel(&self) -> f64 {
        match *self {}
    }
    fn delta_y_unaccel(&self) -> f64 {
        match *self {}
    }
}

impl<B: InputBackend> PointerMotionAbsoluteEvent<B> for UnusedEvent {}

impl<B: InputBackend> PointerButtonEvent<B> for UnusedEvent {
    fn button_code(&self) -> u32 {
        match *self {}
    }
    fn state(&self) -> ButtonState {
        match *self {}
    }
    fn seat_button_count(&self) -> u32 {
        match *self {}
    }
}

impl<B: InputBackend> PointerAxisEvent<B> for UnusedEvent {
    fn amount(&self, _axis: Axis) -> Option<f64> {
        match *self {}
    }
    fn amount_discrete(&self, _axis: Axis) -> Option<f64> {
        match *self {}
    }
    fn source(&self) -> AxisSource {
        match *self {}
    }
}

impl<B: InputBackend> TouchDownEvent<B> for UnusedEvent {
    fn seat_slot(&self) -> Option<i32> {
        match *self {}
    }
}

impl<B: InputBackend> TouchMotionEvent<B> for UnusedEvent {
    fn seat_slot(&self) -> Option<i32> {
        match *self {}
    }
}

impl<B: InputBackend> TouchUpEvent<B> for UnusedEvent {
    fn seat_slot(&self) -> Option<i32> {
        match *self {}
    }
}

impl<B: InputBackend> TouchCancelEvent<B> for UnusedEvent {
    fn seat_slot(&self) -> Option<i32> {
        match *self {}
    }
}

impl<B: InputBackend> TouchFrameEvent<B> for UnusedEvent {}

impl<B: InputBackend> GestureSwipeBeginEvent<B> for UnusedEvent {
    fn finger_count(&self) -> u32 {
        match *self {}
    }
}

impl<B: InputBackend> GestureSwipeUpdateEvent<B> for UnusedEvent {
    fn delta_x(&self) -> f64 {
        match *self {}
    }
    fn delta_y(&self) -> f64 {
        match *self {}
    }
}

impl<B: InputBackend> GestureEndEvent<B> for UnusedEvent {
    fn cancelled(&self) -> bool {
        match *self {}
    }
}

impl<B: InputBackend> GesturePinchBeginEvent<B> for UnusedEvent {
    fn finger_count(&self) -> u32 {
        match *self {}
    }
}

impl<B: InputBackend> GesturePinchUpdateEvent<B> for UnusedEvent {
    fn delta_x(&self) -> f64 {
        match *self {}
    }
    fn delta_y(&self) -> f64 {
        match *self {}
    }
    fn scale(&self) -> f64 {
        match *self {}
    }
    fn angle_delta(&self) -> f64 {
        match *self {}
    }
}

impl<B: InputBackend> TabletPadButtonEvent<B> for UnusedEvent {
    fn button_number(&self) -> u32 {
        match *self {}
    }
    fn button_state(&self) -> ButtonState {
        match *self {}
    }
    fn group(&self) -> TabletPadGroup {
        match *self {}
    }
}

impl<B: InputBackend> TabletPadRingEvent<B> for UnusedEvent {
    fn ring_number(&self) -> u32 {
        match *self {}
    }
    fn position(&self) -> Option<f64> {
        match *self {}
    }
    fn source(&self) -> Option<TabletPadSource> {
        match *self {}
    }
    fn group(&self) -> TabletPadGroup {
        match *self {}
    }
}

impl<B: InputBackend> TabletPadStripEvent<B> for UnusedEvent {
    fn strip_number(&self) -> u32 {
        match *self {}
    }
    fn position(&self) -> Option<f64> {
        match *self {}
    }
    fn source(&self) -> Option<TabletPadSource> {
        match *self {}
    }
    fn group(&self) -> TabletPadGroup {
        match *self {}
    }
}

impl<B: InputBackend> SwitchToggleEvent<B> for UnusedEvent {
    fn switch(&self) -> Option<Switch> {
        match *self {}
    }
    fn state(&self) -> SwitchState {
        match *self {}
    }
}
