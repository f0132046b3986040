//! The dispatch loop (C15): drains the event source and feeds each raw
//! event through the seat's translator, wiring the handful of side-channel
//! notifications (key-repeat scheduling, LED sync, a11y mirroring,
//! touch-mode and tool-changed signals) that live outside the normalized
//! event queue the translator already returns.
//!
//! Grounded on `backend::libinput::mod`'s `EventSource` impl for the
//! fd-poll/drain half of C15, and `anvil/src/udev.rs`'s `insert_source`
//! idiom for registering a backend alongside a timer on a shared
//! [`calloop::LoopHandle`]. The per-raw-event translation itself lives in
//! [`crate::translator`]; this module only orders the calls and decides
//! which side-channel signals fire around them.

use calloop::LoopHandle;

use crate::backend::input::{Event as RawEvent, InputBackend, InputEvent, KeyTransition};
use crate::event::Event;
use crate::keyboard::Keycode;
use crate::seat::{Seat, SeatHandler};
use crate::translator::Events;

/// Translates one raw `event` against `seat`, returning the batch of
/// normalized events a host should append to its own queue.
///
/// This is the per-event body of the dispatch loop's drain step (§4.15
/// steps 1-2): the host calls this once per raw event yielded by its event
/// source (e.g. [`crate::backend::libinput::LibinputInputBackend`] via
/// calloop), in the order the source produced them.
pub fn dispatch<B, D, H>(
    seat: &mut Seat<B>,
    handle: &LoopHandle<'_, D>,
    sink: &mut H,
    event: InputEvent<B>,
) -> Events
where
    B: InputBackend,
    D: 'static,
    H: SeatHandler,
{
    match event {
        InputEvent::DeviceAdded { device } => {
            let before = seat.touch_mode_snapshot();
            let out = seat.translate_device_added(device);
            notify_touch_mode(seat, sink, before);
            out
        }
        InputEvent::DeviceRemoved { device } => {
            let before = seat.touch_mode_snapshot();
            if let Some(id) = seat.devices.find_id_by_raw(&device) {
                seat.cancel_repeat_for_device(handle, id);
            }
            let out = seat.translate_device_removed(device);
            notify_touch_mode(seat, sink, before);
            out
        }
        InputEvent::Keyboard { event } => dispatch_keyboard(seat, handle, sink, &event),
        InputEvent::PointerMotion { event } => seat.translate_pointer_motion(&event),
        InputEvent::PointerMotionAbsolute { event } => seat.translate_pointer_motion_absolute(&event),
        InputEvent::PointerButton { event } => seat.translate_pointer_button(&event),
        InputEvent::PointerAxis { event } => seat.translate_pointer_axis(&event),
        InputEvent::TouchDown { event } => seat.translate_touch_down(&event),
        InputEvent::TouchMotion { event } => seat.translate_touch_motion(&event),
        InputEvent::TouchUp { event } => seat.translate_touch_up(&event),
        InputEvent::TouchCancel { event } => seat.translate_touch_cancel(&event),
        InputEvent::TouchFrame { event } => seat.translate_touch_frame(&event),
        InputEvent::TabletToolAxis { event } => {
            let view = seat.tablet_target_view();
            seat.translate_tablet_tool_axis(&event, view)
        }
        InputEvent::TabletToolProximity { event } => {
            let device_id = seat.devices.find_id_by_raw(&event.device());
            let out = seat.translate_tablet_tool_proximity(&event);
            if let Some(id) = device_id {
                sink.tool_changed(id);
            }
            out
        }
        InputEvent::TabletToolTip { event } => seat.translate_tablet_tool_tip(&event),
        InputEvent::TabletToolButton { event } => seat.translate_tablet_tool_button(&event),
        InputEvent::TabletPadButton { event } => seat.translate_tablet_pad_button(&event),
        InputEvent::TabletPadRing { event } => seat.translate_tablet_pad_ring(&event),
        InputEvent::TabletPadStrip { event } => seat.translate_tablet_pad_strip(&event),
        InputEvent::GestureSwipeBegin { event } => seat.translate_gesture_swipe_begin(&event),
        InputEvent::GestureSwipeUpdate { event } => seat.translate_gesture_swipe_update(&event),
        InputEvent::GestureSwipeEnd { event } => seat.translate_gesture_swipe_end(&event),
        InputEvent::GesturePinchBegin { event } => seat.translate_gesture_pinch_begin(&event),
        InputEvent::GesturePinchUpdate { event } => seat.translate_gesture_pinch_update(&event),
        InputEvent::GesturePinchEnd { event } => seat.translate_gesture_pinch_end(&event),
        InputEvent::SwitchToggle { event } => {
            let before = seat.touch_mode_snapshot();
            let out = seat.translate_switch_toggle(&event);
            notify_touch_mode(seat, sink, before);
            out
        }
        InputEvent::Special(_) => Events::new(),
    }
}

/// Keyboard events get three extra things beyond the plain translation:
/// auto-repeat scheduling/cancellation (C8), a11y key mirroring, and an LED
/// resync + mods mirror when the key changed LED state (§4.14).
fn dispatch_keyboard<B, D, H>(
    seat: &mut Seat<B>,
    handle: &LoopHandle<'_, D>,
    sink: &mut H,
    event: &B::KeyboardKeyEvent,
) -> Events
where
    B: InputBackend,
    D: 'static,
    H: SeatHandler,
{
    let leds_before = seat.keyboard().led_state();
    let out = seat.translate_keyboard(event);

    for produced in &out {
        let Event::Key { source_device, key_code, transition, .. } = produced else {
            continue;
        };
        let keycode = Keycode::from(key_code + 8);
        match transition {
            KeyTransition::Pressed => {
                sink.a11y_key_event(*key_code, *transition);
                if seat.keyboard().key_repeats(keycode) {
                    let device_id = *source_device;
                    let raw_key_code = *key_code;
                    let logical_keyboard_id = seat.logical_keyboard_id();
                    let clock_start = seat.repeat_clock_start();
                    let modifiers = seat.live_modifiers_handle();
                    let events_sink = seat.repeat_events_sink();
                    seat.schedule_repeat(handle, keycode, device_id, move |_keycode, _device_id| {
                        let time_msec = clock_start.elapsed().as_millis() as u32;
                        let event = crate::translator::build_repeat_key_event(
                            time_msec,
                            device_id,
                            logical_keyboard_id,
                            modifiers.get(),
                            raw_key_code,
                        );
                        events_sink.borrow_mut().push(event);
                    });
                }
            }
            KeyTransition::Released => {
                sink.a11y_key_event(*key_code, *transition);
                seat.cancel_repeat_if_latched(handle, keycode);
            }
            KeyTransition::Repeated => {}
        }
    }

    let leds_after = seat.keyboard().led_state();
    if leds_after != leds_before {
        sink.a11y_modifiers_changed(seat.keyboard().modifiers());
        sink.leds_changed(leds_after);
    }

    out
}

/// Fires [`SeatHandler::touch_mode_changed`] iff the touch-mode value
/// actually flipped across the call this wraps (C11: "on transitions
/// only").
fn notify_touch_mode<B: InputBackend, H: SeatHandler>(seat: &Seat<B>, sink: &mut H, before: bool) {
    let after = seat.touch_mode_snapshot();
    if after != before {
        sink.touch_mode_changed(after);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::input::mock::{MockBackend, MockDevice};
    use crate::backend::input::DeviceCapability;
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

    #[derive(Default)]
    struct RecordingHandler {
        touch_mode_calls: Vec<bool>,
        a11y_keys: Vec<(u32, KeyTransition)>,
    }

    impl SeatHandler for RecordingHandler {
        fn touch_mode_changed(&mut self, touch_mode: bool) {
            self.touch_mode_calls.push(touch_mode);
        }
        fn a11y_key_event(&mut self, key_code: u32, transition: KeyTransition) {
            self.a11y_keys.push((key_code, transition));
        }
    }

    #[test]
    fn device_added_without_touch_capability_does_not_notify_touch_mode() {
        let mut seat = Seat::<MockBackend>::new(no_xkb_config()).unwrap();
        let event_loop = calloop::EventLoop::<()>::try_new().unwrap();
        let handle = event_loop.handle();
        let mut sink = RecordingHandler::default();

        let device = MockDevice::new("kbd0", &[DeviceCapability::Keyboard]);
        let raw = InputEvent::<MockBackend>::DeviceAdded { device };
        let _ = dispatch(&mut seat, &handle, &mut sink, raw);

        assert!(sink.touch_mode_calls.is_empty());
    }

    #[test]
    fn device_added_with_touchscreen_notifies_touch_mode_on() {
        let mut seat = Seat::<MockBackend>::new(no_xkb_config()).unwrap();
        let event_loop = calloop::EventLoop::<()>::try_new().unwrap();
        let handle = event_loop.handle();
        let mut sink = RecordingHandler::default();

        let device = MockDevice::new("touch0", &[DeviceCapability::Touch]);
        let raw = InputEvent::<MockBackend>::DeviceAdded { device };
        let _ = dispatch(&mut seat, &handle, &mut sink, raw);

        assert_eq!(sink.touch_mode_calls, vec![true]);
    }
}
