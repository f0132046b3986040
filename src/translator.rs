//! Per-raw-event translation (C14): the methods that turn one
//! `backend::input::InputEvent` into zero or more normalized
//! [`crate::event::Event`]s, applying debounce, button/pressure remapping
//! and the motion pipeline along the way.
//!
//! Grounded on `input/mod.rs`'s per-event `Seat` handler methods (the shape
//! of "one method per raw event kind, mutating seat state and producing
//! outbound notifications"), generalized from Wayland dispatch to this
//! engine's own [`crate::event::Event`] stream.
//!
//! §4.14's "motion compression" (collapsing an unflushed older motion event
//! into a newer one already available in the source's queue) is not
//! implemented: it is an optional, backend-internal batching optimization
//! ("the system *may* collapse them") that needs visibility into a
//! concrete backend's still-queued events, which the generic, one-event-
//! at-a-time [`crate::dispatch::dispatch`] deliberately does not have (see
//! `DESIGN.md`).

use smallvec::SmallVec;
use tracing::warn;

use crate::backend::input::{
    self as backend, AbsolutePositionEvent, ButtonState, Event as RawEvent, GestureEndEvent,
    GesturePhase, GesturePinchBeginEvent, GesturePinchUpdateEvent, GestureSwipeBeginEvent,
    GestureSwipeUpdateEvent, InputBackend, KeyState, KeyTransition, KeyboardKeyEvent,
    PointerAxisEvent, PointerButtonEvent, PointerMotionEvent, PointerMotionAbsoluteEvent,
    SwitchToggleEvent, TabletPadButtonEvent, TabletPadRingEvent, TabletPadStripEvent,
    TabletToolButtonEvent, TabletToolEvent, TabletToolProximityEvent, TabletToolTipEvent,
    TouchCancelEvent, TouchDownEvent, TouchFrameEvent, TouchMotionEvent, TouchUpEvent,
};
use crate::event::{Event, PlatformData};
use crate::scroll::ScrollAccumulator;
use crate::seat::Seat;
use crate::tablet::{MappingMode, TabletTool};
use crate::utils::Point;

/// A batch of outbound events produced by one raw event; most raw events
/// produce exactly one, scroll and motion-pipeline events occasionally two.
pub type Events = SmallVec<[Event; 2]>;

const BTN_LEFT: u32 = 0x110;
const BTN_RIGHT: u32 = 0x111;
const BTN_MIDDLE: u32 = 0x112;
const BTN_TOUCH: u32 = 0x14a;
const BTN_STYLUS: u32 = 0x14b;
const BTN_STYLUS2: u32 = 0x14c;
const BTN_STYLUS3: u32 = 0x149;
const BTN_TOOL_PEN: u32 = 0x140;

/// Evdev code a relative-motion [`PlatformData`] payload is tagged with
/// (`REL_X`, the base of the kernel's relative-axis pair).
const REL_X: u32 = 0x00;

/// Bit position of X11's legacy Button1Mask within a serialized modifier
/// mask (the `state` field convention reserves bits 8-12 for pointer
/// button state alongside the low modifier bits); touch BEGIN/UPDATE sets
/// it for legacy consumers that treat a touch like a button press (§4.14).
const BUTTON1_MASK: u32 = 1 << 8;

/// Maps a raw evdev button code to a logical button number (1..12, §4.14),
/// given whether the originating device is tablet-classified. Returns
/// `None` for a result outside `[1, 12]` (§7 "decode/classification miss":
/// warn and drop the event).
fn map_button_code(code: u32, is_tablet: bool) -> Option<u32> {
    let logical = match code {
        BTN_LEFT | BTN_TOUCH => 1,
        BTN_RIGHT | BTN_STYLUS => 3,
        BTN_MIDDLE | BTN_STYLUS2 => 2,
        BTN_STYLUS3 => 8,
        other if is_tablet => other.wrapping_sub(BTN_TOOL_PEN).wrapping_add(4),
        other => other.wrapping_sub(BTN_LEFT - 1).wrapping_add(4),
    };
    if (1..=12).contains(&logical) {
        Some(logical)
    } else {
        None
    }
}

impl<B: InputBackend> Seat<B> {
    /// Resolves a raw event's device handle to its seat-assigned id,
    /// warning and returning `None` for an event from an unregistered
    /// device (can happen transiently around a remove racing in-flight
    /// events; a no-op-and-warn failure class, §7).
    fn resolve_device<E: RawEvent<B>>(&self, event: &E) -> Option<u32> {
        let raw = event.device();
        match self.devices.find_id_by_raw(&raw) {
            Some(id) => Some(id),
            None => {
                warn!(target: "input", "event from unregistered device");
                None
            }
        }
    }

    /// Resolves `source_device`'s logical leader (§9 device-leader
    /// bookkeeping) — the device this event is associated with — falling
    /// back to the device itself when it has none (§6).
    fn associated_device(&self, source_device: u32) -> u32 {
        self.devices.get(source_device).and_then(|d| d.leader()).unwrap_or(source_device)
    }

    /// Current modifier state with X11's legacy Button1Mask bit set in the
    /// depressed mask, for touch BEGIN/UPDATE (§4.14).
    fn touch_modifiers(&self) -> crate::keyboard::ModifiersState {
        let mut modifiers = self.keyboard.modifiers();
        modifiers.serialized.depressed |= BUTTON1_MASK;
        modifiers
    }

    /// Seat-wide key-press debounce (§4.14): drop a press whose
    /// `seat_key_count` isn't exactly 1, or a release whose count isn't 0.
    /// Collapses multi-device presses of the same key onto one event.
    fn debounced_key(state: KeyState, seat_key_count: u32) -> bool {
        match state {
            KeyState::Pressed => seat_key_count != 1,
            KeyState::Released => seat_key_count != 0,
        }
    }

    /// Seat-wide button debounce: same rule as [`Self::debounced_key`], over
    /// `seat_button_count`.
    fn debounced_seat_button(state: ButtonState, seat_button_count: u32) -> bool {
        match state {
            ButtonState::Pressed => seat_button_count != 1,
            ButtonState::Released => seat_button_count != 0,
        }
    }

    /// Per-seat button-counter debounce (§4.14, I3/I4): an independent
    /// internal counter per raw button code, guarding against phantom
    /// releases the seat-wide counter alone wouldn't catch. Presses past
    /// the first, and releases that would go negative, are dropped.
    fn debounced_button_count(&mut self, button_code: u32, state: ButtonState) -> bool {
        let count = self.button_count.entry(button_code).or_insert(0);
        match state {
            ButtonState::Pressed => {
                *count += 1;
                *count > 1
            }
            ButtonState::Released => {
                if *count <= 0 {
                    true
                } else {
                    *count -= 1;
                    false
                }
            }
        }
    }

    /// Maps a normalized `[0, 1] x [0, 1]` device-local coordinate (touch,
    /// tablet-tool absolute axes) into stage coordinates via the viewport
    /// layout's extents (§4.14 "x = raw_x × stage_w"), or passes it through
    /// unscaled when no layout is configured.
    fn stage_position(&mut self, x: f64, y: f64) -> Point<f64> {
        let normalized = Point::new(x, y);
        match self.viewports.take() {
            Some(viewports) => {
                let result = crate::motion::absolute_motion_pointer(normalized, viewports.as_ref());
                self.viewports = Some(viewports);
                result
            }
            None => normalized,
        }
    }

    fn clamp_motion(&mut self, candidate: Point<f64>) -> Point<f64> {
        let old = self.pointer_pos;
        match self.viewports.take() {
            Some(mut viewports) => {
                let result = self.motion.constrain(old, candidate, viewports.as_ref());
                self.viewports = Some(viewports);
                result
            }
            None => candidate,
        }
    }

    /// Registers a newly-appeared physical device, re-running touch-mode
    /// inference (C11) if presence flags changed.
    pub fn translate_device_added(&mut self, device: B::Device) -> Events {
        let mut out = Events::new();
        let (id, presence_changed) = self.devices.add(device, self.logical_pointer_id(), self.logical_keyboard_id());
        let device_type = self.devices.get(id).map(|d| d.device_type()).unwrap();
        // Device hotplug has no hardware timestamp (libinput itself reports
        // time 0 for these), unlike every other raw event kind.
        out.push(Event::DeviceAdded {
            time_msec: 0,
            source_device: id,
            associated_device: id,
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            device_type,
        });
        if presence_changed {
            self.recompute_touch_mode();
        }
        out
    }

    /// Unregisters a device, re-running touch-mode inference if presence
    /// flags changed.
    pub fn translate_device_removed(&mut self, device: B::Device) -> Events {
        let mut out = Events::new();
        let Some(id) = self.devices.find_id_by_raw(&device) else {
            warn!(target: "input", "DeviceRemoved for unregistered device");
            return out;
        };
        if let Some((_removed, presence_changed)) = self.devices.remove(id) {
            out.push(Event::DeviceRemoved {
                time_msec: 0,
                source_device: id,
                associated_device: id,
                modifiers: self.keyboard.modifiers(),
                platform_data: None,
            });
            if presence_changed {
                self.recompute_touch_mode();
            }
        }
        self.scroll.remove(&id);
        out
    }

    /// Translates a raw keyboard key event: updates xkb state (skipped for
    /// synthetic repeats, I8), tracks seat key count, and emits one `Key`
    /// event, unless debounce swallows it.
    pub fn translate_keyboard(&mut self, event: &B::KeyboardKeyEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();
        let key_code = event.key_code();
        let state = event.state();

        if Self::debounced_key(state, event.seat_key_count()) {
            return out;
        }

        let pressed = state == KeyState::Pressed;
        self.keyboard.update_key(crate::keyboard::Keycode::from(key_code + 8), pressed);
        self.sync_live_modifiers();

        let transition = if pressed { KeyTransition::Pressed } else { KeyTransition::Released };
        out.push(Event::Key {
            time_msec,
            source_device: device_id,
            associated_device: self.logical_keyboard_id(),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            key_code,
            transition,
        });
        out
    }

    /// Translates a synthetic auto-repeat firing (C8): no xkb update (I8),
    /// just a `Key` event with [`KeyTransition::Repeated`]. Read-only (no
    /// xkb state is touched), so the repeat timer's callback — which can't
    /// hold a live borrow of `Seat` between scheduling and firing (see
    /// [`crate::repeat`], [`crate::dispatch::dispatch_keyboard`]) — builds
    /// the identical event through [`build_repeat_key_event`] from a
    /// mirrored snapshot instead of calling this method directly; this
    /// method stays the entry point for callers that do hold a live `Seat`.
    pub fn translate_key_repeat(&self, device_id: u32, key_code: u32, time_msec: u32) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        out.push(build_repeat_key_event(
            time_msec,
            device_id,
            self.logical_keyboard_id(),
            self.keyboard.modifiers(),
            key_code,
        ));
        out
    }

    /// Translates relative pointer motion: cross-output scaling, barriers,
    /// constraint, monitor clamp (C12), then emits `Motion`.
    pub fn translate_pointer_motion(&mut self, event: &B::PointerMotionEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();

        let old = self.pointer_pos;
        let scaled = match self.viewports.take() {
            Some(viewports) => {
                let result = crate::motion::relative_motion(old, event.delta_x(), event.delta_y(), viewports.as_ref());
                self.viewports = Some(viewports);
                result
            }
            None => Point::new(old.x + event.delta_x(), old.y + event.delta_y()),
        };
        let position = self.clamp_motion(scaled);
        self.pointer_pos = position;

        let platform_data = Some(PlatformData {
            event_code: REL_X,
            relative_motion: Point::new(event.delta_x_unaccel(), event.delta_y_unaccel()),
            time_us: event.time(),
        });
        out.push(Event::Motion {
            time_msec,
            source_device: device_id,
            associated_device: self.logical_pointer_id(),
            modifiers: self.keyboard.modifiers(),
            platform_data,
            position,
            axes: Vec::new(),
        });
        out
    }

    /// Translates absolute pointer motion, mapped across the whole
    /// viewport layout, then run through the constrain chain.
    pub fn translate_pointer_motion_absolute(&mut self, event: &B::PointerMotionAbsoluteEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();

        let normalized = Point::new(event.x(), event.y());
        let candidate = match self.viewports.take() {
            Some(viewports) => {
                let result = crate::motion::absolute_motion_pointer(normalized, viewports.as_ref());
                self.viewports = Some(viewports);
                result
            }
            None => normalized,
        };
        let position = self.clamp_motion(candidate);
        self.pointer_pos = position;

        out.push(Event::Motion {
            time_msec,
            source_device: device_id,
            associated_device: self.logical_pointer_id(),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            position,
            axes: Vec::new(),
        });
        out
    }

    /// Translates a pointer button event: maps the raw code to a logical
    /// button number, tracks the mask, and emits press/release, unless
    /// debounce swallows it.
    pub fn translate_pointer_button(&mut self, event: &B::PointerButtonEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();
        let raw_code = event.button_code();
        let state = event.state();
        let seat_button_count = event.seat_button_count();

        if Self::debounced_seat_button(state, seat_button_count) {
            return out;
        }
        if self.debounced_button_count(raw_code, state) {
            return out;
        }

        let is_tablet = self.devices.get(device_id).map(|d| d.device_type().is_tablet()).unwrap_or(false);
        let Some(button) = map_button_code(raw_code, is_tablet) else {
            warn!(target: "input", raw_code, "button code outside [1, 12] after mapping");
            return out;
        };

        let associated_device = self.associated_device(device_id);
        let modifiers = self.keyboard.modifiers();
        match state {
            ButtonState::Pressed => {
                self.pressed_buttons.insert(button);
                out.push(Event::ButtonPress {
                    time_msec,
                    source_device: device_id,
                    associated_device,
                    modifiers,
                    platform_data: None,
                    button,
                    seat_button_count,
                });
            }
            ButtonState::Released => {
                self.pressed_buttons.remove(&button);
                out.push(Event::ButtonRelease {
                    time_msec,
                    source_device: device_id,
                    associated_device,
                    modifiers,
                    platform_data: None,
                    button,
                    seat_button_count,
                });
            }
        }
        out
    }

    /// Translates a pointer axis (scroll) event through the per-device,
    /// per-axis accumulator (C13), emitting a smooth delta, any synthetic
    /// discrete steps, and a finished marker, in that order.
    pub fn translate_pointer_axis(&mut self, event: &B::PointerAxisEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();
        let source = event.source();
        let associated_device = self.associated_device(device_id);
        let modifiers = self.keyboard.modifiers();

        let accumulator = self.scroll.entry(device_id).or_insert_with(ScrollAccumulator::new);

        for axis in [backend::Axis::Horizontal, backend::Axis::Vertical] {
            let amount = event.amount(axis);
            let discrete = event.amount_discrete(axis);
            if amount.is_none() && discrete.is_none() {
                continue;
            }
            let finished = event.is_finished(axis);
            let outcome = accumulator.process(axis, source, amount, discrete, finished);

            if let Some(smooth) = outcome.smooth {
                out.push(Event::ScrollSmooth {
                    time_msec,
                    source_device: device_id,
                    associated_device,
                    modifiers,
                    platform_data: None,
                    axis,
                    value: smooth,
                });
            }
            for direction in outcome.discrete {
                out.push(Event::ScrollDiscrete {
                    time_msec,
                    source_device: device_id,
                    associated_device,
                    modifiers,
                    platform_data: None,
                    direction,
                    emulated: outcome.emulated,
                });
            }
            if outcome.finished {
                out.push(Event::ScrollFinished {
                    time_msec,
                    source_device: device_id,
                    associated_device,
                    modifiers,
                    platform_data: None,
                    axis,
                });
            }
        }
        out
    }

    /// Translates touch-down: acquires a slot and maps the position,
    /// warning (no-op) on a duplicate slot (§7).
    pub fn translate_touch_down(&mut self, event: &B::TouchDownEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let Some(slot) = event.seat_slot() else { return out };
        let time_msec = event.time_msec();
        let position = self.stage_position(event.x(), event.y());

        if self.touch.acquire(slot, position).is_err() {
            return out;
        }
        out.push(Event::TouchBegin {
            time_msec,
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.touch_modifiers(),
            platform_data: None,
            slot,
            position,
        });
        out
    }

    /// Translates touch-motion: updates the slot's coordinates. A slot
    /// unknown to the table (stale reorder across device removal, §7) is a
    /// silent no-op.
    pub fn translate_touch_motion(&mut self, event: &B::TouchMotionEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let Some(slot) = event.seat_slot() else { return out };
        if self.touch.lookup(slot).is_none() {
            return out;
        }
        let time_msec = event.time_msec();
        let position = self.stage_position(event.x(), event.y());
        self.touch.update(slot, position);
        out.push(Event::TouchUpdate {
            time_msec,
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.touch_modifiers(),
            platform_data: None,
            slot,
            position,
        });
        out
    }

    /// Translates touch-up: releases the slot.
    pub fn translate_touch_up(&mut self, event: &B::TouchUpEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let Some(slot) = event.seat_slot() else { return out };
        let time_msec = event.time_msec();
        if self.touch.release(slot).is_none() {
            return out;
        }
        out.push(Event::TouchEnd {
            time_msec,
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            slot,
        });
        out
    }

    /// Translates touch-cancel: releases the slot and emits `TouchCancel`
    /// instead of `TouchEnd`.
    pub fn translate_touch_cancel(&mut self, event: &B::TouchCancelEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let Some(slot) = event.seat_slot() else { return out };
        let time_msec = event.time_msec();
        if self.touch.release(slot).is_none() {
            return out;
        }
        out.push(Event::TouchCancel {
            time_msec,
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            slot,
        });
        out
    }

    /// Translates a touch-frame: currently a pass-through marker with no
    /// state of its own; present for hosts that batch touch updates by frame.
    pub fn translate_touch_frame(&mut self, _event: &B::TouchFrameEvent) -> Events {
        Events::new()
    }

    fn tool_from_event<E>(&mut self, event: &E) -> TabletTool
    where
        E: TabletToolEvent<B>,
    {
        self.tablet_tools.get_or_create(event.tool()).clone()
    }

    /// Translates a tablet tool axis event: assembles the dense axis vector
    /// (C10), runs pressure through the tool's curve, and maps position —
    /// absolute into the target viewport, or relative through the same
    /// cross-output scaling as pointer motion for a `Relative`-mapped
    /// device or a MOUSE/LENS tool, which always behaves as relative
    /// regardless of mapping mode (§4.10, §4.14).
    pub fn translate_tablet_tool_axis(&mut self, event: &B::TabletToolAxisEvent, target_view: usize) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();
        let tool = self.tool_from_event(event);
        let caps = tool.descriptor().capabilities;

        let axes = crate::tablet::assemble_axes(
            caps,
            (event.x(), true),
            (event.y(), true),
            (event.distance(), event.distance_has_changed()),
            (tool.map_pressure(event.pressure()), event.pressure_has_changed()),
            ((event.tilt_x(), event.tilt_x_has_changed()), (event.tilt_y(), event.tilt_y_has_changed())),
            (event.rotation(), event.rotation_has_changed()),
            (event.slider_position(), event.slider_has_changed()),
            (event.wheel_delta(), event.wheel_has_changed()),
        );

        let device_relative = self
            .devices
            .get(device_id)
            .map(|d| d.mapping_mode() == MappingMode::Relative)
            .unwrap_or(false);
        let relative = device_relative || tool.tool_type().always_relative();

        let (position, platform_data) = if relative {
            let old = self.pointer_pos;
            let (dx, dy) = (event.delta_x(), event.delta_y());
            let candidate = match self.viewports.take() {
                Some(viewports) => {
                    let result = crate::motion::relative_motion(old, dx, dy, viewports.as_ref());
                    self.viewports = Some(viewports);
                    result
                }
                None => Point::new(old.x + dx, old.y + dy),
            };
            let position = self.clamp_motion(candidate);
            let platform_data = Some(PlatformData {
                event_code: REL_X,
                relative_motion: Point::new(dx, dy),
                time_us: event.time(),
            });
            (position, platform_data)
        } else {
            let mm = Point::new(event.x(), event.y());
            let mm_size = crate::utils::Size::new(1.0, 1.0);
            let position = match &self.viewports {
                Some(viewports) => {
                    crate::motion::absolute_motion_tablet(mm, mm_size, target_view, viewports.as_ref()).unwrap_or(mm)
                }
                None => mm,
            };
            (position, None)
        };
        self.pointer_pos = position;

        out.push(Event::Motion {
            time_msec,
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data,
            position,
            axes,
        });
        out
    }

    /// Translates a tablet tool proximity event, caching the tool
    /// descriptor on entry and clearing it once `Out` is delivered.
    pub fn translate_tablet_tool_proximity(&mut self, event: &B::TabletToolProximityEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();
        let position = Point::new(event.x(), event.y());
        let associated_device = self.associated_device(device_id);
        let modifiers = self.keyboard.modifiers();

        match event.state() {
            backend::ProximityState::In => {
                let tool = self.tablet_tools.get_or_create(event.tool());
                tool.set_in_proximity();
                let tool = tool.clone();
                if let Some(device) = self.devices.get_mut(device_id) {
                    device.set_current_tool(Some(tool));
                }
                out.push(Event::ProximityIn {
                    time_msec,
                    source_device: device_id,
                    associated_device,
                    modifiers,
                    platform_data: None,
                    position,
                });
            }
            backend::ProximityState::Out => {
                let descriptor = event.tool();
                self.tablet_tools.get_or_create(descriptor).clear_proximity();
                if let Some(device) = self.devices.get_mut(device_id) {
                    device.set_current_tool(None);
                }
                out.push(Event::ProximityOut {
                    time_msec,
                    source_device: device_id,
                    associated_device,
                    modifiers,
                    platform_data: None,
                });
            }
        }
        out
    }

    /// Translates a tablet tool tip event: axes have already been flushed
    /// by the preceding axis event, so this only toggles contact.
    pub fn translate_tablet_tool_tip(&mut self, event: &B::TabletToolTipEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();
        let position = Point::new(event.x(), event.y());
        let down = event.tip_state() == backend::TabletToolTipState::Down;
        out.push(Event::TabletToolTip {
            time_msec,
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            down,
            position,
        });
        out
    }

    /// Translates a tablet tool button event. The "hardware code" reported
    /// is remapped through the tool's own button table (C10); the logical
    /// button number (1..12) is computed from the *original* raw code via
    /// the button-number mapping table (§4.14), tablet branch.
    pub fn translate_tablet_tool_button(&mut self, event: &B::TabletToolButtonEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();
        let raw_button = event.button();
        let tool = self.tool_from_event(event);
        let hardware_code = tool.map_button(raw_button);
        let Some(button) = map_button_code(raw_button, true) else {
            warn!(target: "input", raw_button, "tablet tool button code outside [1, 12] after mapping");
            return out;
        };
        out.push(Event::TabletToolButton {
            time_msec,
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            button,
            hardware_code,
            state: event.button_state(),
        });
        out
    }

    /// Translates a tablet pad button event.
    pub fn translate_tablet_pad_button(&mut self, event: &B::TabletPadButtonEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let time_msec = event.time_msec();
        let button = event.button_number();
        let associated_device = self.associated_device(device_id);
        let modifiers = self.keyboard.modifiers();
        match event.button_state() {
            ButtonState::Pressed => out.push(Event::PadButtonPress {
                time_msec,
                source_device: device_id,
                associated_device,
                modifiers,
                platform_data: None,
                button,
            }),
            ButtonState::Released => out.push(Event::PadButtonRelease {
                time_msec,
                source_device: device_id,
                associated_device,
                modifiers,
                platform_data: None,
                button,
            }),
        }
        out
    }

    /// Translates a tablet pad ring event.
    pub fn translate_tablet_pad_ring(&mut self, event: &B::TabletPadRingEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        out.push(Event::PadRing {
            time_msec: event.time_msec(),
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            ring: event.ring_number(),
            position: event.position(),
        });
        out
    }

    /// Translates a tablet pad strip event.
    pub fn translate_tablet_pad_strip(&mut self, event: &B::TabletPadStripEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        out.push(Event::PadStrip {
            time_msec: event.time_msec(),
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            strip: event.strip_number(),
            position: event.position(),
        });
        out
    }

    /// Translates a gesture-swipe begin event.
    pub fn translate_gesture_swipe_begin(&mut self, event: &B::GestureSwipeBeginEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        out.push(Event::TouchpadSwipe {
            time_msec: event.time_msec(),
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            phase: GesturePhase::Begin,
            delta: Point::new(0.0, 0.0),
            fingers: event.finger_count(),
        });
        out
    }

    /// Translates a gesture-swipe update event.
    pub fn translate_gesture_swipe_update(&mut self, event: &B::GestureSwipeUpdateEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        out.push(Event::TouchpadSwipe {
            time_msec: event.time_msec(),
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            phase: GesturePhase::Update,
            delta: Point::new(event.delta_x(), event.delta_y()),
            fingers: 0,
        });
        out
    }

    /// Translates a gesture-swipe end event.
    pub fn translate_gesture_swipe_end(&mut self, event: &B::GestureSwipeEndEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        out.push(Event::TouchpadSwipe {
            time_msec: event.time_msec(),
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            phase: if event.cancelled() { GesturePhase::Cancel } else { GesturePhase::End },
            delta: Point::new(0.0, 0.0),
            fingers: 0,
        });
        out
    }

    /// Translates a gesture-pinch begin event.
    pub fn translate_gesture_pinch_begin(&mut self, event: &B::GesturePinchBeginEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        out.push(Event::TouchpadPinch {
            time_msec: event.time_msec(),
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            phase: GesturePhase::Begin,
            delta: Point::new(0.0, 0.0),
            scale: 1.0,
            rotation: 0.0,
            fingers: event.finger_count(),
        });
        out
    }

    /// Translates a gesture-pinch update event.
    pub fn translate_gesture_pinch_update(&mut self, event: &B::GesturePinchUpdateEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        out.push(Event::TouchpadPinch {
            time_msec: event.time_msec(),
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            phase: GesturePhase::Update,
            delta: Point::new(event.delta_x(), event.delta_y()),
            scale: event.scale(),
            rotation: event.angle_delta(),
            fingers: 0,
        });
        out
    }

    /// Translates a gesture-pinch end event.
    pub fn translate_gesture_pinch_end(&mut self, event: &B::GesturePinchEndEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        out.push(Event::TouchpadPinch {
            time_msec: event.time_msec(),
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            phase: if event.cancelled() { GesturePhase::Cancel } else { GesturePhase::End },
            delta: Point::new(0.0, 0.0),
            scale: 1.0,
            rotation: 0.0,
            fingers: 0,
        });
        out
    }

    /// Translates a switch toggle event, updating tablet-mode state and
    /// re-running touch-mode inference (C11) when relevant.
    pub fn translate_switch_toggle(&mut self, event: &B::SwitchToggleEvent) -> Events {
        let mut out = Events::new();
        if !self.accepts_live_events() {
            return out;
        }
        let Some(device_id) = self.resolve_device(event) else { return out };
        let Some(switch) = event.switch() else { return out };
        let time_msec = event.time_msec();
        let state = event.state();

        if switch == backend::Switch::TabletMode {
            self.tablet_mode_switch_state = state == backend::SwitchState::On;
            self.recompute_touch_mode();
        }

        out.push(Event::SwitchToggle {
            time_msec,
            source_device: device_id,
            associated_device: self.associated_device(device_id),
            modifiers: self.keyboard.modifiers(),
            platform_data: None,
            state,
        });
        out
    }
}

/// Builds the `Key`/`Repeated` event a C8 auto-repeat firing produces.
/// Factored out of [`Seat::translate_key_repeat`] so the repeat timer's
/// `'static` callback — which fires on its own from [`crate::dispatch`]
/// without a live `&Seat` to call that method on — constructs exactly the
/// same event from a small mirrored snapshot (device id, logical keyboard
/// id, current modifiers) instead of duplicating its shape by hand.
pub(crate) fn build_repeat_key_event(
    time_msec: u32,
    source_device: u32,
    associated_device: u32,
    modifiers: crate::keyboard::ModifiersState,
    key_code: u32,
) -> Event {
    Event::Key {
        time_msec,
        source_device,
        associated_device,
        modifiers,
        platform_data: None,
        key_code,
        transition: KeyTransition::Repeated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::input::mock::{
        MockAbsoluteEvent, MockAxis, MockAxisEvent, MockBackend, MockButtonEvent, MockDevice, MockKeyEvent,
        MockMotionEvent, MockSwitchEvent, MockTouchEndEvent, MockTouchEvent,
    };
    use crate::backend::input::{AxisSource, DeviceCapability, Switch, SwitchState};
    use crate::device::DeviceType;
    use crate::keyboard::XkbConfig;

    fn no_xkb_config() -> XkbConfig<'static> {
        XkbConfig {
            rules: "",
            model: "",
            layout: "us",
            variant: "",
            options: None,
            file: None,
        }
    }

    fn new_seat() -> Seat<MockBackend> {
        Seat::new(no_xkb_config()).unwrap()
    }

    fn add_device(seat: &mut Seat<MockBackend>, id: &str, caps: &[DeviceCapability]) -> u32 {
        let device = MockDevice::new(id, caps);
        let out = seat.translate_device_added(device);
        match out.first() {
            Some(Event::DeviceAdded { source_device, .. }) => *source_device,
            _ => panic!("expected a DeviceAdded event"),
        }
    }

    #[test]
    fn device_added_reports_classified_type() {
        let mut seat = new_seat();
        let device = MockDevice::new("mouse0", &[DeviceCapability::Pointer]);
        let out = seat.translate_device_added(device);
        assert_eq!(out.len(), 1);
        match out[0] {
            Event::DeviceAdded { device_type, .. } => assert_eq!(device_type, DeviceType::Pointer),
            _ => panic!("wrong event"),
        }
    }

    #[test]
    fn seat_wide_key_debounce_drops_non_matching_count() {
        let mut seat = new_seat();
        add_device(&mut seat, "kbd0", &[DeviceCapability::Keyboard]);
        let device = MockDevice::new("kbd0", &[DeviceCapability::Keyboard]);

        // A second device's simultaneous press of the same key reports
        // seat_key_count=2: the seat-wide debounce (§4.14) swallows it so
        // only the first press of a key across the seat is delivered.
        let second_press = MockKeyEvent {
            time_us: 1000,
            device: device.clone(),
            key_code: 30,
            state: KeyState::Pressed,
            seat_key_count: 2,
        };
        assert!(seat.translate_keyboard(&second_press).is_empty());

        // A release that still leaves another device holding the key
        // (seat_key_count=1, not 0) is swallowed the same way.
        let partial_release = MockKeyEvent {
            time_us: 1000,
            device,
            key_code: 30,
            state: KeyState::Released,
            seat_key_count: 1,
        };
        assert!(seat.translate_keyboard(&partial_release).is_empty());
    }

    #[test]
    fn key_press_and_release_with_matching_count_pass_through() {
        let mut seat = new_seat();
        add_device(&mut seat, "kbd0", &[DeviceCapability::Keyboard]);
        let device = MockDevice::new("kbd0", &[DeviceCapability::Keyboard]);

        let press = MockKeyEvent {
            time_us: 1000,
            device: device.clone(),
            key_code: 30,
            state: KeyState::Pressed,
            seat_key_count: 1,
        };
        let release = MockKeyEvent {
            time_us: 2000,
            device,
            key_code: 30,
            state: KeyState::Released,
            seat_key_count: 0,
        };
        assert_eq!(seat.translate_keyboard(&press).len(), 1);
        assert_eq!(seat.translate_keyboard(&release).len(), 1);
    }

    #[test]
    fn pointer_motion_accumulates_into_pointer_position() {
        let mut seat = new_seat();
        add_device(&mut seat, "mouse0", &[DeviceCapability::Pointer]);
        let device = MockDevice::new("mouse0", &[DeviceCapability::Pointer]);

        let event = MockMotionEvent {
            time_us: 0,
            device,
            dx: 5.0,
            dy: -2.0,
            dx_unaccel: 5.0,
            dy_unaccel: -2.0,
        };
        let out = seat.translate_pointer_motion(&event);
        assert_eq!(out.len(), 1);
        let pos = seat.pointer();
        assert_eq!(pos.x, 5.0);
        assert_eq!(pos.y, -2.0);
    }

    #[test]
    fn pointer_motion_absolute_sets_pointer_position_from_normalized_coords() {
        let mut seat = new_seat();
        add_device(&mut seat, "tablet0", &[DeviceCapability::Pointer]);
        let device = MockDevice::new("tablet0", &[DeviceCapability::Pointer]);

        let event = MockAbsoluteEvent {
            time_us: 0,
            device,
            x: 0.5,
            y: 0.25,
        };
        let out = seat.translate_pointer_motion_absolute(&event);
        assert_eq!(out.len(), 1);
        assert_eq!(seat.pointer().x, 0.5);
        assert_eq!(seat.pointer().y, 0.25);
    }

    #[test]
    fn button_press_and_release_update_button_mask_with_2_3_swap() {
        let mut seat = new_seat();
        add_device(&mut seat, "mouse0", &[DeviceCapability::Pointer]);
        let device = MockDevice::new("mouse0", &[DeviceCapability::Pointer]);

        // BTN_RIGHT (0x111) maps to logical button 3 (SECONDARY, §4.14),
        // which the button mask reports at bit position 2 (the documented
        // 2<->3 swap, §4.16).
        let press = MockButtonEvent {
            time_us: 0,
            device: device.clone(),
            button_code: 0x111,
            state: ButtonState::Pressed,
            seat_button_count: 1,
        };
        let out = seat.translate_pointer_button(&press);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Event::ButtonPress { button: 3, .. }));
        assert_eq!(seat.button_mask(), 1 << 1);

        let release = MockButtonEvent {
            time_us: 1,
            device,
            button_code: 0x111,
            state: ButtonState::Released,
            seat_button_count: 0,
        };
        seat.translate_pointer_button(&release);
        assert_eq!(seat.button_mask(), 0);
    }

    #[test]
    fn button_number_mapping_matches_logical_table() {
        // BTN_LEFT/BTN_TOUCH -> 1, BTN_RIGHT/BTN_STYLUS -> 3,
        // BTN_MIDDLE/BTN_STYLUS2 -> 2, BTN_STYLUS3 -> 8 (§4.14).
        assert_eq!(map_button_code(0x110, false), Some(1));
        assert_eq!(map_button_code(0x14a, false), Some(1));
        assert_eq!(map_button_code(0x111, false), Some(3));
        assert_eq!(map_button_code(0x14b, false), Some(3));
        assert_eq!(map_button_code(0x112, false), Some(2));
        assert_eq!(map_button_code(0x14c, false), Some(2));
        assert_eq!(map_button_code(0x149, false), Some(8));
        // Non-tablet "other": raw - (BTN_LEFT - 1) + 4.
        assert_eq!(map_button_code(0x113, false), Some(8)); // BTN_SIDE
        // Tablet "other": raw - BTN_TOOL_PEN + 4.
        assert_eq!(map_button_code(0x140, true), Some(4)); // BTN_TOOL_PEN itself
        // Out of [1, 12] after mapping is rejected.
        assert_eq!(map_button_code(0x11c, false), None);
    }

    #[test]
    fn per_seat_button_count_drops_phantom_release_and_repeat_press() {
        let mut seat = new_seat();
        add_device(&mut seat, "mouse0", &[DeviceCapability::Pointer]);
        let device = MockDevice::new("mouse0", &[DeviceCapability::Pointer]);

        let press = MockButtonEvent {
            time_us: 0,
            device: device.clone(),
            button_code: 0x110,
            state: ButtonState::Pressed,
            seat_button_count: 1,
        };
        assert_eq!(seat.translate_pointer_button(&press).len(), 1);

        let release = MockButtonEvent {
            time_us: 1,
            device,
            button_code: 0x110,
            state: ButtonState::Released,
            seat_button_count: 0,
        };
        assert_eq!(seat.translate_pointer_button(&release).len(), 1);
        // A second, phantom release with no matching press is dropped; the
        // internal counter never goes negative (I3).
        assert!(seat.translate_pointer_button(&release).is_empty());
    }

    #[test]
    fn continuous_scroll_past_threshold_emits_smooth_then_discrete() {
        let mut seat = new_seat();
        add_device(&mut seat, "touchpad0", &[DeviceCapability::Pointer]);
        let device = MockDevice::new("touchpad0", &[DeviceCapability::Pointer]);

        let mut last = Events::new();
        for _ in 0..3 {
            let event = MockAxisEvent {
                time_us: 0,
                device: device.clone(),
                source: AxisSource::Finger,
                vertical: MockAxis { value: Some(4.0), discrete: None, finished: false },
                horizontal: MockAxis::default(),
            };
            last = seat.translate_pointer_axis(&event);
        }
        assert!(last.iter().any(|e| matches!(e, Event::ScrollSmooth { .. })));
        assert!(last.iter().any(|e| matches!(e, Event::ScrollDiscrete { .. })));
    }

    #[test]
    fn touch_down_translates_regardless_of_touch_mode() {
        let mut seat = new_seat();
        // Touch events translate on their own merits; touch_mode (C11) is a
        // separate derived flag surfaced via `touch_mode_changed`, not a
        // gate on translation (§4.14 has no such gate).
        add_device(&mut seat, "touch0", &[DeviceCapability::Touch]);
        let touch = MockDevice::new("touch0", &[DeviceCapability::Touch]);
        let down = MockTouchEvent {
            time_us: 0,
            device: touch.clone(),
            seat_slot: Some(0),
            x: 0.5,
            y: 0.5,
        };
        let out = seat.translate_touch_down(&down);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Event::TouchBegin { .. }));

        // Re-acquiring the same slot without an intervening up is a no-op.
        let duplicate = seat.translate_touch_down(&down);
        assert!(duplicate.is_empty());

        let up = MockTouchEndEvent {
            time_us: 0,
            device: touch,
            seat_slot: Some(0),
        };
        let out = seat.translate_touch_up(&up);
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Event::TouchEnd { .. }));
    }

    #[test]
    fn tablet_mode_switch_off_suppresses_touch_mode_flag_despite_touchscreen() {
        let mut seat = new_seat();
        add_device(&mut seat, "touch0", &[DeviceCapability::Touch]);
        add_device(&mut seat, "switch0", &[DeviceCapability::Switch]);
        // Presence alone would infer touch_mode true; a present, off
        // tablet-mode switch overrides it (I5).
        assert!(!seat.touch_mode_snapshot());

        let switch_device = MockDevice::new("switch0", &[DeviceCapability::Switch]);
        let toggle_off = MockSwitchEvent {
            time_us: 0,
            device: switch_device,
            switch: Some(Switch::TabletMode),
            state: SwitchState::Off,
        };
        seat.translate_switch_toggle(&toggle_off);
        assert!(!seat.touch_mode_snapshot());

        let toggle_on = MockSwitchEvent {
            time_us: 1,
            device: MockDevice::new("switch0", &[DeviceCapability::Switch]),
            switch: Some(Switch::TabletMode),
            state: SwitchState::On,
        };
        seat.translate_switch_toggle(&toggle_on);
        assert!(seat.touch_mode_snapshot());

        // Touch still translates whether or not touch_mode ended up true.
        let touch = MockDevice::new("touch0", &[DeviceCapability::Touch]);
        let down = MockTouchEvent {
            time_us: 0,
            device: touch,
            seat_slot: Some(0),
            x: 0.1,
            y: 0.1,
        };
        assert!(!seat.translate_touch_down(&down).is_empty());
    }
}
