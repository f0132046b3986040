//! The seat (C16): owns all per-seat state and exposes the host-facing API.
//!
//! Grounded on `input/mod.rs`'s `Seat<D>` as the "one handle owns everything"
//! shape (device list, keyboard, pointer position, data), stripped of its
//! Wayland client/focus bookkeeping since this engine has no surface
//! concept — only the input state machine.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use crate::backend::input::{self as backend, DeviceCapability, InputBackend};
use crate::device::{Device, DeviceRegistry, DeviceType};
use crate::error::{KeyboardError, NotFound, SeatInitError};
use crate::event::Event;
use crate::keyboard::{KeyboardState, LedState, ModifiersState, XkbConfig};
use crate::motion::MotionPipeline;
use crate::repeat::{RepeatConfig, RepeatTimer};
use crate::scroll::ScrollAccumulator;
use crate::tablet::TabletToolRegistry;
use crate::touch::{TouchSlotTable, VirtualSlotReservation};
use crate::utils::Point;
use crate::viewport::ViewportProvider;

/// Observer for seat-level signals that have no natural place in the
/// drained [`crate::event::Event`] stream: accessibility mirroring, the
/// bell, and housekeeping notifications a host may want to react to
/// immediately rather than poll for (data model §3 "SeatHandler").
#[allow(unused_variables)]
pub trait SeatHandler {
    /// Mirrors every modifier change for assistive technology, independent
    /// of normal key event delivery.
    fn a11y_modifiers_changed(&mut self, modifiers: ModifiersState) {}

    /// Mirrors every key transition for assistive technology.
    fn a11y_key_event(&mut self, key_code: u32, transition: backend::KeyTransition) {}

    /// The bell was rung (e.g. via `notify_bell`).
    fn bell(&mut self) {}

    /// The in-proximity tablet tool changed (new tool, or tool left
    /// proximity on `device_id`).
    fn tool_changed(&mut self, device_id: u32) {}

    /// Touch-mode inference (C11) flipped.
    fn touch_mode_changed(&mut self, touch_mode: bool) {}

    /// The LED state changed.
    fn leds_changed(&mut self, leds: LedState) {}
}

/// Snapshot of queryable seat state, returned by [`Seat::snapshot_state`].
#[derive(Debug, Clone, Copy)]
pub struct SeatState {
    /// Current pointer position in stage coordinates.
    pub pointer_position: Point<f64>,
    /// Current modifier state.
    pub modifiers: ModifiersState,
    /// Whether touch-mode is currently inferred active (C11).
    pub touch_mode: bool,
    /// Whether the seat's devices are currently released (TTY switch away).
    pub released: bool,
}

/// The central input state machine (C16): owns every device, the keyboard
/// and pointer state machines, touch slots, scroll accumulators, tablet
/// tools and the motion pipeline, and exposes the host-facing control
/// surface.
pub struct Seat<B: InputBackend> {
    pub(crate) devices: DeviceRegistry<B>,
    logical_pointer_id: u32,
    logical_keyboard_id: u32,

    pub(crate) pointer_pos: Point<f64>,
    pub(crate) pressed_buttons: HashSet<u32>,
    /// Per-seat button-counter debounce (§4.14 "Per-seat button-counter
    /// debounce"), keyed by raw button code, independent of the seat-wide
    /// `seat_button_count` the event source reports (I3/I4).
    pub(crate) button_count: HashMap<u32, i32>,

    pub(crate) keyboard: KeyboardState,
    pub(crate) repeat: RepeatTimer,

    pub(crate) touch: TouchSlotTable,
    pub(crate) virtual_touch: VirtualSlotReservation,
    pub(crate) touch_mode: bool,
    pub(crate) tablet_mode_switch_state: bool,

    pub(crate) scroll: HashMap<u32, ScrollAccumulator>,
    pub(crate) tablet_tools: TabletToolRegistry,
    pub(crate) motion: MotionPipeline,
    pub(crate) viewports: Option<Box<dyn ViewportProvider>>,

    released: bool,

    /// Monotonic origin for timestamping repeat-fired events (C8): the
    /// timer runs on the host's own calloop loop rather than inside a
    /// `dispatch()` call, so there is no raw event to read a timestamp
    /// from.
    repeat_clock_start: Instant,
    /// Mirrors `keyboard.modifiers()` so the repeat timer's `'static`
    /// callback (armed once at key-down, firing independently afterwards)
    /// can stamp every tick with the live modifier state rather than a
    /// snapshot frozen at schedule time.
    live_modifiers: Rc<Cell<ModifiersState>>,
    /// Events synthesized by repeat-timer firings, queued here instead of
    /// returned from `dispatch()` directly since the timer fires on its
    /// own; a host drains this via [`Self::drain_repeat_events`] after
    /// polling its event loop.
    repeat_events: Rc<RefCell<Vec<Event>>>,
}

impl<B: InputBackend> Seat<B> {
    /// Creates a new seat with the given keyboard configuration. Only
    /// keymap compilation can fail (§7: init failures are the sole
    /// `Result`-returning class).
    #[instrument(skip(xkb_config))]
    pub fn new(xkb_config: XkbConfig<'_>) -> Result<Self, SeatInitError> {
        let keyboard = KeyboardState::new(xkb_config).map_err(|_| SeatInitError::BadKeymap)?;

        Ok(Seat {
            devices: DeviceRegistry::new(),
            logical_pointer_id: 0,
            logical_keyboard_id: 1,
            pointer_pos: Point::new(0.0, 0.0),
            pressed_buttons: HashSet::new(),
            button_count: HashMap::new(),
            keyboard,
            repeat: RepeatTimer::new(),
            touch: TouchSlotTable::new(),
            virtual_touch: VirtualSlotReservation::new(),
            touch_mode: false,
            tablet_mode_switch_state: false,
            scroll: HashMap::new(),
            tablet_tools: TabletToolRegistry::new(),
            motion: MotionPipeline::new(),
            viewports: None,
            released: false,
            repeat_clock_start: Instant::now(),
            live_modifiers: Rc::new(Cell::new(ModifiersState::default())),
            repeat_events: Rc::new(RefCell::new(Vec::new())),
        })
    }

    /// Current pointer position, in stage coordinates.
    pub fn pointer(&self) -> Point<f64> {
        self.pointer_pos
    }

    /// Read-only access to the keyboard state machine.
    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    /// Legacy bitmask of currently-pressed pointer buttons, one bit per
    /// logical button number (bit 0 = button 1, ...). Logical buttons 2
    /// and 3 (right/middle) are swapped in the mask's bit position,
    /// matching the historical X11/evdev button-mask convention this
    /// engine's hosts expect verbatim.
    pub fn button_mask(&self) -> u32 {
        let mut mask = 0u32;
        for &button in &self.pressed_buttons {
            let bit_index = match button {
                2 => 3,
                3 => 2,
                n => n,
            };
            if (1..=32).contains(&bit_index) {
                mask |= 1 << (bit_index - 1);
            }
        }
        mask
    }

    /// All known devices.
    pub fn devices(&self) -> &[Device<B>] {
        self.devices.devices()
    }

    /// All devices sharing logical id `logical_id` (the pointer or keyboard
    /// acceleration-profile leader a physical device was merged into, §9
    /// device-leader bookkeeping).
    pub fn devices_for_logical(&self, logical_id: u32) -> impl Iterator<Item = &Device<B>> {
        self.devices.devices_for_logical(logical_id)
    }

    /// Snapshot of queryable state for a host that polls rather than
    /// drains events (e.g. on startup, before the first real event).
    pub fn snapshot_state(&self) -> SeatState {
        SeatState {
            pointer_position: self.pointer_pos,
            modifiers: self.keyboard.modifiers(),
            touch_mode: self.touch_mode,
            released: self.released,
        }
    }

    /// Queries the current coordinates and modifier state for `device`,
    /// optionally scoped to a live touch `sequence` (§4.16). `sequence` is
    /// the `max(1, seat_slot + 1)` handle translated touch events carry
    /// (§4.14) — pass `None` for a non-touch device (pointer or tablet
    /// tool) to get its last reported position instead of a touch contact's.
    /// Fails with [`NotFound`] if `device` isn't registered, or `sequence`
    /// is given but names no currently-live touch slot.
    pub fn query_state(&self, device: u32, sequence: Option<i32>) -> Result<(Point<f64>, ModifiersState), NotFound> {
        self.devices.get(device).ok_or(NotFound)?;
        let coords = match sequence {
            Some(sequence) => self.touch.lookup(sequence - 1).ok_or(NotFound)?.coords(),
            None => self.pointer_pos,
        };
        Ok((coords, self.keyboard.modifiers()))
    }

    /// Directly moves the pointer, clamped into the viewport layout but
    /// bypassing barriers and the active constraint (C12 warp).
    pub fn warp(&mut self, position: Point<f64>) {
        self.pointer_pos = match &self.viewports {
            Some(viewports) => crate::motion::warp(position, viewports.as_ref()),
            None => position,
        };
    }

    /// Registers a virtual (non-physical) device of `device_type`, e.g. for
    /// a host synthesizing input. Returns its assigned id.
    pub fn create_virtual_device(&mut self, device_type: DeviceType) -> u32 {
        let id = self.devices.ids_allocate();
        self.devices.push_logical(id, device_type);
        id
    }

    /// Recompiles and installs a new xkb keymap. Preserves no modifier
    /// state across the swap; callers that need continuity should read
    /// [`KeyboardState::serialized_mods`] first and re-apply it via
    /// [`KeyboardState::update_mask`] after.
    pub fn set_keyboard_map(&mut self, xkb_config: XkbConfig<'_>) -> Result<(), KeyboardError> {
        let result = self.keyboard.set_keymap(xkb_config);
        self.sync_live_modifiers();
        result
    }

    /// Currently effective layout index.
    pub fn keyboard_layout_index(&self) -> u32 {
        self.keyboard.layout_index()
    }

    /// Switches to layout `index`, preserving the current modifier mask.
    pub fn set_keyboard_layout_index(&mut self, index: u32) {
        self.keyboard.set_layout_index(index);
        self.sync_live_modifiers();
    }

    /// Toggles numlock.
    pub fn set_keyboard_numlock(&mut self) {
        self.keyboard.toggle_numlock();
        self.sync_live_modifiers();
    }

    /// Updates auto-repeat delay/interval; does not affect whether
    /// repeat is currently enabled.
    pub fn set_keyboard_repeat(&mut self, config: RepeatConfig) {
        self.repeat.set_config(config);
    }

    /// Installs (or clears) the active pointer constraint.
    pub fn set_pointer_constraint(&mut self, constraint: Option<Box<dyn crate::constraint::PointerConstraint>>) {
        self.motion.set_constraint(constraint);
    }

    /// Installs (or clears) the active barrier set.
    pub fn set_barriers(&mut self, barriers: Vec<crate::barrier::Barrier>) {
        self.motion.set_barriers(barriers);
    }

    /// Installs the host's viewport (monitor) layout provider.
    pub fn set_viewports(&mut self, viewports: Option<Box<dyn ViewportProvider>>) {
        self.viewports = viewports;
    }

    /// Releases all devices (e.g. on a TTY switch away): subsequent raw
    /// events are dropped by the dispatch loop (C15) until
    /// [`Self::reclaim_devices`]. Cancels any pending key-repeat. Idempotent
    /// (I9: a second call warns and changes nothing).
    pub fn release_devices<D: 'static>(&mut self, handle: &calloop::LoopHandle<'_, D>) {
        if self.released {
            warn!(target: "input", "release_devices called while already released");
            return;
        }
        self.repeat.cancel(handle);
        self.released = true;
        debug!(target: "input", "devices released");
    }

    /// Reclaims devices after a prior release (TTY switch back). Re-applies
    /// the current latched/locked modifier mask to the keyboard state so a
    /// host that reconstructs its xkb state across the gap observes no
    /// drift (S6); idempotent.
    pub fn reclaim_devices(&mut self) {
        if !self.released {
            warn!(target: "input", "reclaim_devices called while not released");
            return;
        }
        let mods = self.keyboard.serialized_mods();
        let layout = self.keyboard.layout_index();
        self.keyboard.update_mask(mods, layout);
        self.sync_live_modifiers();
        self.released = false;
        debug!(target: "input", "devices reclaimed");
    }

    /// Whether devices are currently released.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Rings the bell; a host implementing [`SeatHandler`] observes this
    /// via [`SeatHandler::bell`].
    pub fn notify_bell<H: SeatHandler>(&self, handler: &mut H) {
        handler.bell();
    }

    /// Looks up a device by id, for hosts that received an id from an
    /// event and want its classification.
    pub fn device(&self, id: u32) -> Result<&Device<B>, NotFound> {
        self.devices.get(id).ok_or(NotFound)
    }

    pub(crate) fn logical_pointer_id(&self) -> u32 {
        self.logical_pointer_id
    }

    pub(crate) fn logical_keyboard_id(&self) -> u32 {
        self.logical_keyboard_id
    }

    pub(crate) fn recompute_touch_mode(&mut self) -> bool {
        let new_mode = crate::touch::infer_touch_mode(
            self.devices.has_touchscreen(),
            self.devices.has_tablet_switch(),
            self.tablet_mode_switch_state,
        );
        let changed = new_mode != self.touch_mode;
        self.touch_mode = new_mode;
        changed
    }

    /// Whether raw events should currently be translated at all (C15):
    /// the dispatch loop still drains `DeviceAdded`/`DeviceRemoved` while
    /// released, but drops everything else.
    pub(crate) fn accepts_live_events(&self) -> bool {
        !self.released
    }

    /// Current touch-mode value (C11), for the dispatch loop to diff
    /// before/after a device add/remove or switch toggle to decide
    /// whether [`SeatHandler::touch_mode_changed`] fires.
    pub(crate) fn touch_mode_snapshot(&self) -> bool {
        self.touch_mode
    }

    /// The viewport index a tablet's axis events are mapped into. Tablets
    /// with no explicit output mapping report against the layout's first
    /// view (§4.12 "identity for most devices").
    pub(crate) fn tablet_target_view(&self) -> usize {
        0
    }

    /// Re-mirrors `keyboard.modifiers()` into the cell the repeat timer's
    /// callback reads, so a repeat firing reports the live modifier state
    /// rather than whatever was current at the key-down that armed it.
    pub(crate) fn sync_live_modifiers(&mut self) {
        self.live_modifiers.set(self.keyboard.modifiers());
    }

    /// Clones the handle a repeat-timer callback needs to stamp a
    /// `Repeated` event with the live modifier state at fire time.
    pub(crate) fn live_modifiers_handle(&self) -> Rc<Cell<ModifiersState>> {
        self.live_modifiers.clone()
    }

    /// Clones the queue handle a repeat-timer callback pushes its
    /// synthesized event onto; see [`Self::drain_repeat_events`].
    pub(crate) fn repeat_events_sink(&self) -> Rc<RefCell<Vec<Event>>> {
        self.repeat_events.clone()
    }

    /// Monotonic origin for deriving a repeat-fired event's `time_msec`
    /// (C8): there is no raw event backing a synthetic repeat tick, so the
    /// timer measures elapsed time from seat construction instead.
    pub(crate) fn repeat_clock_start(&self) -> Instant {
        self.repeat_clock_start
    }

    /// Drains events synthesized by auto-repeat firings since the last
    /// call (C8, S3). The key-repeat timer runs on the host's own calloop
    /// loop independently of any single `dispatch()` call, so a host
    /// should call this (in addition to collecting what `dispatch()`
    /// returns directly) after every poll of its event loop.
    pub fn drain_repeat_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut *self.repeat_events.borrow_mut())
    }

    /// Schedules (or reschedules) the auto-repeat timer for `keycode` on
    /// `device_id` (C8 key-down). `on_fire` is invoked on every repeat
    /// tick with the latched keycode/device.
    pub(crate) fn schedule_repeat<D, F>(
        &mut self,
        handle: &calloop::LoopHandle<'_, D>,
        keycode: crate::keyboard::Keycode,
        device_id: u32,
        on_fire: F,
    ) where
        D: 'static,
        F: FnMut(crate::keyboard::Keycode, u32) + 'static,
    {
        self.repeat.schedule(handle, keycode, device_id, on_fire);
    }

    /// Cancels the repeat timer if it is currently latched to `keycode`
    /// (C8 key-up of the repeating key).
    pub(crate) fn cancel_repeat_if_latched<D: 'static>(
        &mut self,
        handle: &calloop::LoopHandle<'_, D>,
        keycode: crate::keyboard::Keycode,
    ) {
        if self.repeat.pending().map(|(k, _)| k) == Some(keycode) {
            self.repeat.cancel(handle);
        }
    }

    /// Cancels the repeat timer if it is currently latched to `device_id`
    /// (C8/C9: device removal of the repeating device).
    pub(crate) fn cancel_repeat_for_device<D: 'static>(&mut self, handle: &calloop::LoopHandle<'_, D>, device_id: u32) {
        if self.repeat.pending().map(|(_, d)| d) == Some(device_id) {
            self.repeat.cancel(handle);
        }
    }

    /// Enables/disables auto-repeat outright (distinct from timing via
    /// [`Self::set_keyboard_repeat`]).
    pub fn set_keyboard_repeat_enabled<D: 'static>(&mut self, handle: &calloop::LoopHandle<'_, D>, enabled: bool) {
        self.repeat.set_enabled(handle, enabled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::input::mock::{MockBackend, MockDevice};
    use crate::backend::input::DeviceCapability;

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

    #[test]
    fn query_state_unknown_device_fails_with_not_found() {
        let seat = Seat::<MockBackend>::new(no_xkb_config()).unwrap();
        assert!(seat.query_state(42, None).is_err());
    }

    #[test]
    fn query_state_no_sequence_returns_pointer_position() {
        let mut seat = Seat::<MockBackend>::new(no_xkb_config()).unwrap();
        let (id, _) = seat.devices.add(MockDevice::new("mouse0", &[DeviceCapability::Pointer]), 0, 1);
        seat.pointer_pos = Point::new(3.0, 4.0);
        let (coords, _) = seat.query_state(id, None).unwrap();
        assert_eq!(coords, Point::new(3.0, 4.0));
    }

    #[test]
    fn query_state_with_live_sequence_returns_touch_coords() {
        let mut seat = Seat::<MockBackend>::new(no_xkb_config()).unwrap();
        let (id, _) = seat.devices.add(MockDevice::new("touch0", &[DeviceCapability::Touch]), 0, 1);
        seat.touch.acquire(0, Point::new(10.0, 20.0)).unwrap();

        // seat_slot 0 -> sequence max(1, 0+1) = 1.
        let (coords, _) = seat.query_state(id, Some(1)).unwrap();
        assert_eq!(coords, Point::new(10.0, 20.0));

        // A sequence with no live slot fails.
        assert!(seat.query_state(id, Some(99)).is_err());
    }
}
