//! Outbound, normalized events: what the translator (C14) produces and what
//! a host drains from the dispatch loop (C15).
//!
//! Grounded on the flat, per-kind event shape `backend::input::InputEvent`
//! already uses for the raw side, mirrored here for the normalized side so
//! a host matches on one enum rather than juggling the typed traits. Every
//! variant carries the common §6 envelope (time, modifier-state bitmask,
//! associated device, source device, optional platform data) directly as
//! fields, following the same "repeat the fields per kind" convention the
//! raw-event traits already use rather than introducing a wrapper struct.

use crate::backend::input::{Axis, ButtonState, GesturePhase, KeyTransition, SwitchState};
use crate::device::DeviceType;
use crate::keyboard::ModifiersState;
use crate::scroll::DiscreteDirection;
use crate::tablet::AxisValue;
use crate::utils::Point;

/// Opaque backend payload attached to some events (§6): the raw event code
/// it was derived from, a relative-motion vector, and the originating raw
/// microsecond timestamp. Used for relative pointer motion (dx_unaccel,
/// dy_unaccel, §4.12) and relative tablet-tool motion (§4.14).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformData {
    /// The raw evdev event code this payload describes (e.g. `REL_X`).
    pub event_code: u32,
    /// Unaccelerated relative motion vector.
    pub relative_motion: Point<f64>,
    /// Raw kernel timestamp, microseconds.
    pub time_us: u64,
}

/// A normalized, backend-agnostic input event (data model §3 "Event").
#[derive(Debug, Clone)]
pub enum Event {
    /// A device was added to the seat.
    DeviceAdded {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with (its leader,
        /// or itself if it has none, §9 device-leader bookkeeping).
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Its classified type.
        device_type: DeviceType,
    },
    /// A device was removed from the seat.
    DeviceRemoved {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
    },
    /// Pointer moved (absolute or accumulated relative motion, post-pipeline).
    Motion {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with (the seat's
        /// logical pointer, for pointer-family devices).
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Unaccelerated relative-motion vector for a relative pointer or
        /// tablet-tool move (§4.12, §4.14); `None` for absolute motion.
        platform_data: Option<PlatformData>,
        /// New stage-space position.
        position: Point<f64>,
        /// Dense tablet-tool axis vector (§4.14); empty for pointer motion,
        /// which has no axes beyond x/y.
        axes: Vec<AxisValue>,
    },
    /// A pointer or tablet-tool button was pressed.
    ButtonPress {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Logical button number (post button-number mapping, C14).
        button: u32,
        /// Total buttons held across the seat after this event.
        seat_button_count: u32,
    },
    /// A pointer or tablet-tool button was released.
    ButtonRelease {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Logical button number.
        button: u32,
        /// Total buttons held across the seat after this event.
        seat_button_count: u32,
    },
    /// Smooth (pixel) scroll delta on one axis.
    ScrollSmooth {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Which axis.
        axis: Axis,
        /// Pixel delta.
        value: f64,
    },
    /// A synthetic discrete scroll step, derived from continuous motion or
    /// passed through from a wheel click (C13).
    ScrollDiscrete {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Direction of the step.
        direction: DiscreteDirection,
        /// `true` when synthesized from a continuous/finger accumulator
        /// crossing the discrete-step threshold; `false` when it passes
        /// through one real wheel click one-for-one (§4.13).
        emulated: bool,
    },
    /// A continuous-source scroll sequence on one axis finished.
    ScrollFinished {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Which axis finished.
        axis: Axis,
    },
    /// A new touch contact began.
    TouchBegin {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state after BUTTON1 injection (§4.14: touch BEGIN and
        /// UPDATE set the BUTTON1 bit for legacy consumers).
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Seat-assigned slot.
        slot: i32,
        /// Initial stage-space position.
        position: Point<f64>,
    },
    /// A touch contact moved.
    TouchUpdate {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state after BUTTON1 injection (§4.14).
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Seat-assigned slot.
        slot: i32,
        /// New stage-space position.
        position: Point<f64>,
    },
    /// A touch contact was lifted.
    TouchEnd {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Seat-assigned slot.
        slot: i32,
    },
    /// A touch contact was cancelled (e.g. palm rejection).
    TouchCancel {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Seat-assigned slot.
        slot: i32,
    },
    /// A tablet tool entered proximity.
    ProximityIn {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Initial stage-space position.
        position: Point<f64>,
    },
    /// A tablet tool left proximity.
    ProximityOut {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
    },
    /// A tablet tool touched down or lifted off the surface.
    TabletToolTip {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Whether the tip is now down.
        down: bool,
        /// Stage-space position at the transition.
        position: Point<f64>,
    },
    /// A tablet tool's physical button changed state.
    TabletToolButton {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Logical button number (1..12), computed from the *original*
        /// raw code via the button-number mapping table (§4.14) — not the
        /// remapped `hardware_code`.
        button: u32,
        /// The tool's own remapped button code (C10), reported as the
        /// event's "hardware code".
        hardware_code: u32,
        /// Press or release.
        state: ButtonState,
    },
    /// A touchpad pinch gesture update.
    TouchpadPinch {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Lifecycle phase.
        phase: GesturePhase,
        /// Delta since the last event.
        delta: Point<f64>,
        /// Absolute scale, 1.0 at gesture start.
        scale: f64,
        /// Clockwise angle delta in degrees.
        rotation: f64,
        /// Finger count (only meaningful on `Begin`).
        fingers: u32,
    },
    /// A touchpad swipe gesture update.
    TouchpadSwipe {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Lifecycle phase.
        phase: GesturePhase,
        /// Delta since the last event.
        delta: Point<f64>,
        /// Finger count (only meaningful on `Begin`).
        fingers: u32,
    },
    /// A tablet pad button was pressed.
    PadButtonPress {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Button number.
        button: u32,
    },
    /// A tablet pad button was released.
    PadButtonRelease {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Button number.
        button: u32,
    },
    /// A tablet pad ring changed position.
    PadRing {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Ring number.
        ring: u32,
        /// New position in degrees, or `None` if the finger lifted.
        position: Option<f64>,
    },
    /// A tablet pad strip changed position.
    PadStrip {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Strip number.
        strip: u32,
        /// New position, normalized `[0, 1]`, or `None` if the finger lifted.
        position: Option<f64>,
    },
    /// A keyboard key changed state (including synthetic auto-repeat).
    Key {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with (the seat's
        /// logical keyboard, regardless of which physical keyboard sent
        /// the raw key — debounce already collapsed multi-device presses
        /// of the same key onto one event).
        associated_device: u32,
        /// Modifier state after this key's xkb update.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// Evdev keycode, without the kernel's +8 offset.
        key_code: u32,
        /// Press, release, or synthetic repeat.
        transition: KeyTransition,
    },
    /// A lid or tablet-mode switch toggled.
    SwitchToggle {
        /// Kernel timestamp, milliseconds.
        time_msec: u32,
        /// The device that produced this event.
        source_device: u32,
        /// The logical device this event is associated with.
        associated_device: u32,
        /// Modifier state at the time of this event.
        modifiers: ModifiersState,
        /// Backend-specific payload, when present.
        platform_data: Option<PlatformData>,
        /// New state.
        state: SwitchState,
    },
}
