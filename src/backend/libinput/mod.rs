//! Implementation of [`InputBackend`] for types provided by `libinput`.

use crate::backend::input::{self as backend, Axis, InputBackend, InputEvent};
#[cfg(feature = "backend_session")]
use crate::backend::session::DevicePermission;
use input as libinput;
use input::event;

use std::io;
#[cfg(feature = "backend_session")]
use std::os::unix::io::{IntoRawFd, OwnedFd};
use std::os::unix::io::{AsRawFd, RawFd};
#[cfg(feature = "backend_session")]
use std::path::Path;

use calloop::{EventSource, Interest, Mode, Poll, PostAction, Readiness, Token, TokenFactory};

use tracing::{info, instrument, trace};

mod tablet;

/// Libinput-based [`InputBackend`], registered into a host-owned
/// [`calloop::EventLoop`] as a single [`EventSource`].
#[derive(Debug)]
pub struct LibinputInputBackend {
    context: libinput::Libinput,
    token: Option<Token>,
}

impl LibinputInputBackend {
    /// Wraps an already-initialized libinput context.
    #[instrument(skip(context))]
    pub fn new(context: libinput::Libinput) -> Self {
        info!(target: "input", "initializing libinput backend");
        LibinputInputBackend { context, token: None }
    }

    /// The underlying libinput context.
    pub fn context(&self) -> &libinput::Libinput {
        &self.context
    }
}

impl backend::Device for libinput::Device {
    fn id(&self) -> String {
        self.sysname().into()
    }

    fn has_capability(&self, capability: backend::DeviceCapability) -> bool {
        libinput::Device::has_capability(self, capability.into())
    }
}

impl From<backend::DeviceCapability> for libinput::DeviceCapability {
    fn from(other: backend::DeviceCapability) -> libinput::DeviceCapability {
        match other {
            backend::DeviceCapability::Gesture => libinput::DeviceCapability::Gesture,
            backend::DeviceCapability::Keyboard => libinput::DeviceCapability::Keyboard,
            backend::DeviceCapability::Pointer => libinput::DeviceCapability::Pointer,
            backend::DeviceCapability::Switch => libinput::DeviceCapability::Switch,
            backend::DeviceCapability::TabletPad => libinput::DeviceCapability::TabletPad,
            backend::DeviceCapability::TabletTool => libinput::DeviceCapability::TabletTool,
            backend::DeviceCapability::Touch => libinput::DeviceCapability::Touch,
        }
    }
}

impl backend::Event<LibinputInputBackend> for event::keyboard::KeyboardKeyEvent {
    fn time(&self) -> u64 {
        event::keyboard::KeyboardEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::KeyboardKeyEvent<LibinputInputBackend> for event::keyboard::KeyboardKeyEvent {
    fn key_code(&self) -> u32 {
        use input::event::keyboard::KeyboardEventTrait;
        self.key()
    }

    fn state(&self) -> backend::KeyState {
        use input::event::keyboard::KeyboardEventTrait;
        self.key_state().into()
    }

    fn seat_key_count(&self) -> u32 {
        self.seat_key_count()
    }
}

impl backend::Event<LibinputInputBackend> for event::pointer::PointerAxisEvent {
    fn time(&self) -> u64 {
        event::pointer::PointerEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::PointerAxisEvent<LibinputInputBackend> for event::pointer::PointerAxisEvent {
    fn amount(&self, axis: Axis) -> Option<f64> {
        let axis = axis.into();
        self.has_axis(axis).then(|| self.axis_value(axis))
    }

    fn amount_discrete(&self, axis: Axis) -> Option<f64> {
        let axis = axis.into();
        if self.has_axis(axis) {
            self.axis_value_discrete(axis)
        } else {
            None
        }
    }

    fn source(&self) -> backend::AxisSource {
        self.axis_source().into()
    }
}

impl backend::Event<LibinputInputBackend> for event::pointer::PointerButtonEvent {
    fn time(&self) -> u64 {
        event::pointer::PointerEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::PointerButtonEvent<LibinputInputBackend> for event::pointer::PointerButtonEvent {
    fn button_code(&self) -> u32 {
        self.button()
    }

    fn state(&self) -> backend::ButtonState {
        self.button_state().into()
    }

    fn seat_button_count(&self) -> u32 {
        self.seat_button_count()
    }
}

impl backend::Event<LibinputInputBackend> for event::pointer::PointerMotionEvent {
    fn time(&self) -> u64 {
        event::pointer::PointerEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::PointerMotionEvent<LibinputInputBackend> for event::pointer::PointerMotionEvent {
    fn delta_x(&self) -> f64 {
        self.dx()
    }

    fn delta_y(&self) -> f64 {
        self.dy()
    }

    fn delta_x_unaccel(&self) -> f64 {
        self.dx_unaccelerated()
    }

    fn delta_y_unaccel(&self) -> f64 {
        self.dy_unaccelerated()
    }
}

impl backend::Event<LibinputInputBackend> for event::pointer::PointerMotionAbsoluteEvent {
    fn time(&self) -> u64 {
        event::pointer::PointerEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::PointerMotionAbsoluteEvent<LibinputInputBackend>
    for event::pointer::PointerMotionAbsoluteEvent
{
}

impl backend::AbsolutePositionEvent<LibinputInputBackend>
    for event::pointer::PointerMotionAbsoluteEvent
{
    fn x(&self) -> f64 {
        self.absolute_x()
    }

    fn y(&self) -> f64 {
        self.absolute_y()
    }

    fn x_transformed(&self, width: i32) -> f64 {
        self.absolute_x_transformed(width as u32)
    }

    fn y_transformed(&self, height: i32) -> f64 {
        self.absolute_y_transformed(height as u32)
    }
}

impl backend::Event<LibinputInputBackend> for event::gesture::GestureSwipeBeginEvent {
    fn time(&self) -> u64 {
        event::gesture::GestureEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::GestureSwipeBeginEvent<LibinputInputBackend> for event::gesture::GestureSwipeBeginEvent {
    fn finger_count(&self) -> u32 {
        event::gesture::GestureEventTrait::finger_count(self) as u32
    }
}

impl backend::Event<LibinputInputBackend> for event::gesture::GestureSwipeUpdateEvent {
    fn time(&self) -> u64 {
        event::gesture::GestureEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::GestureSwipeUpdateEvent<LibinputInputBackend> for event::gesture::GestureSwipeUpdateEvent {
    fn delta_x(&self) -> f64 {
        event::gesture::GestureEventCoordinates::dx(self)
    }

    fn delta_y(&self) -> f64 {
        event::gesture::GestureEventCoordinates::dy(self)
    }
}

impl backend::Event<LibinputInputBackend> for event::gesture::GestureSwipeEndEvent {
    fn time(&self) -> u64 {
        event::gesture::GestureEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::GestureEndEvent<LibinputInputBackend> for event::gesture::GestureSwipeEndEvent {
    fn cancelled(&self) -> bool {
        event::gesture::GestureEndEvent::cancelled(self)
    }
}

impl backend::Event<LibinputInputBackend> for event::gesture::GesturePinchBeginEvent {
    fn time(&self) -> u64 {
        event::gesture::GestureEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::GesturePinchBeginEvent<LibinputInputBackend> for event::gesture::GesturePinchBeginEvent {
    fn finger_count(&self) -> u32 {
        event::gesture::GestureEventTrait::finger_count(self) as u32
    }
}

impl backend::Event<LibinputInputBackend> for event::gesture::GesturePinchUpdateEvent {
    fn time(&self) -> u64 {
        event::gesture::GestureEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::GesturePinchUpdateEvent<LibinputInputBackend> for event::gesture::GesturePinchUpdateEvent {
    fn delta_x(&self) -> f64 {
        event::gesture::GestureEventCoordinates::dx(self)
    }

    fn delta_y(&self) -> f64 {
        event::gesture::GestureEventCoordinates::dy(self)
    }

    fn scale(&self) -> f64 {
        event::gesture::GesturePinchEventTrait::scale(self)
    }

    fn angle_delta(&self) -> f64 {
        self.angle_delta()
    }
}

impl backend::Event<LibinputInputBackend> for event::gesture::GesturePinchEndEvent {
    fn time(&self) -> u64 {
        event::gesture::GestureEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::GestureEndEvent<LibinputInputBackend> for event::gesture::GesturePinchEndEvent {
    fn cancelled(&self) -> bool {
        event::gesture::GestureEndEvent::cancelled(self)
    }
}

impl backend::Event<LibinputInputBackend> for event::touch::TouchDownEvent {
    fn time(&self) -> u64 {
        event::touch::TouchEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::TouchDownEvent<LibinputInputBackend> for event::touch::TouchDownEvent {
    fn seat_slot(&self) -> Option<i32> {
        event::touch::TouchEventSlot::seat_slot(self)
    }
}

impl backend::AbsolutePositionEvent<LibinputInputBackend> for event::touch::TouchDownEvent {
    fn x(&self) -> f64 {
        event::touch::TouchEventPosition::x(self)
    }

    fn y(&self) -> f64 {
        event::touch::TouchEventPosition::y(self)
    }

    fn x_transformed(&self, width: i32) -> f64 {
        event::touch::TouchEventPosition::x_transformed(self, width as u32)
    }

    fn y_transformed(&self, height: i32) -> f64 {
        event::touch::TouchEventPosition::y_transformed(self, height as u32)
    }
}

impl backend::Event<LibinputInputBackend> for event::touch::TouchMotionEvent {
    fn time(&self) -> u64 {
        event::touch::TouchEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::TouchMotionEvent<LibinputInputBackend> for event::touch::TouchMotionEvent {
    fn seat_slot(&self) -> Option<i32> {
        event::touch::TouchEventSlot::seat_slot(self)
    }
}

impl backend::AbsolutePositionEvent<LibinputInputBackend> for event::touch::TouchMotionEvent {
    fn x(&self) -> f64 {
        event::touch::TouchEventPosition::x(self)
    }

    fn y(&self) -> f64 {
        event::touch::TouchEventPosition::y(self)
    }

    fn x_transformed(&self, width: i32) -> f64 {
        event::touch::TouchEventPosition::x_transformed(self, width as u32)
    }

    fn y_transformed(&self, height: i32) -> f64 {
        event::touch::TouchEventPosition::y_transformed(self, height as u32)
    }
}

impl backend::Event<LibinputInputBackend> for event::touch::TouchUpEvent {
    fn time(&self) -> u64 {
        event::touch::TouchEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::TouchUpEvent<LibinputInputBackend> for event::touch::TouchUpEvent {
    fn seat_slot(&self) -> Option<i32> {
        event::touch::TouchEventSlot::seat_slot(self)
    }
}

impl backend::Event<LibinputInputBackend> for event::touch::TouchCancelEvent {
    fn time(&self) -> u64 {
        event::touch::TouchEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::TouchCancelEvent<LibinputInputBackend> for event::touch::TouchCancelEvent {
    fn seat_slot(&self) -> Option<i32> {
        event::touch::TouchEventSlot::seat_slot(self)
    }
}

impl backend::Event<LibinputInputBackend> for event::touch::TouchFrameEvent {
    fn time(&self) -> u64 {
        event::touch::TouchEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::TouchFrameEvent<LibinputInputBackend> for event::touch::TouchFrameEvent {}

impl backend::Event<LibinputInputBackend> for event::tablet_pad::TabletPadButtonEvent {
    fn time(&self) -> u64 {
        event::tablet_pad::TabletPadEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::TabletPadButtonEvent<LibinputInputBackend> for event::tablet_pad::TabletPadButtonEvent {
    fn button_number(&self) -> u32 {
        self.button_number()
    }

    fn button_state(&self) -> backend::ButtonState {
        self.button_state().into()
    }

    fn group(&self) -> backend::TabletPadGroup {
        let group = self.mode_group();
        backend::TabletPadGroup {
            group: group.index(),
            mode: group.mode(),
        }
    }
}

impl backend::Event<LibinputInputBackend> for event::tablet_pad::TabletPadRingEvent {
    fn time(&self) -> u64 {
        event::tablet_pad::TabletPadEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::TabletPadRingEvent<LibinputInputBackend> for event::tablet_pad::TabletPadRingEvent {
    fn ring_number(&self) -> u32 {
        self.number()
    }

    fn position(&self) -> Option<f64> {
        if self.position() >= 0.0 {
            Some(self.position())
        } else {
            None
        }
    }

    fn source(&self) -> Option<backend::TabletPadSource> {
        Some(match self.source() {
            event::tablet_pad::RingAxisSource::Finger => backend::TabletPadSource::Finger,
            _ => backend::TabletPadSource::Unknown,
        })
    }

    fn group(&self) -> backend::TabletPadGroup {
        let group = self.mode_group();
        backend::TabletPadGroup {
            group: group.index(),
            mode: group.mode(),
        }
    }
}

impl backend::Event<LibinputInputBackend> for event::tablet_pad::TabletPadStripEvent {
    fn time(&self) -> u64 {
        event::tablet_pad::TabletPadEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::TabletPadStripEvent<LibinputInputBackend> for event::tablet_pad::TabletPadStripEvent {
    fn strip_number(&self) -> u32 {
        self.number()
    }

    fn position(&self) -> Option<f64> {
        if self.position() >= 0.0 {
            Some(self.position())
        } else {
            None
        }
    }

    fn source(&self) -> Option<backend::TabletPadSource> {
        Some(match self.source() {
            event::tablet_pad::StripAxisSource::Finger => backend::TabletPadSource::Finger,
            _ => backend::TabletPadSource::Unknown,
        })
    }

    fn group(&self) -> backend::TabletPadGroup {
        let group = self.mode_group();
        backend::TabletPadGroup {
            group: group.index(),
            mode: group.mode(),
        }
    }
}

impl backend::Event<LibinputInputBackend> for event::switch::SwitchToggleEvent {
    fn time(&self) -> u64 {
        event::switch::SwitchEventTrait::time_usec(self)
    }

    fn device(&self) -> libinput::Device {
        event::EventTrait::device(self)
    }
}

impl backend::SwitchToggleEvent<LibinputInputBackend> for event::switch::SwitchToggleEvent {
    fn switch(&self) -> Option<backend::Switch> {
        use event::switch::Switch as LibinputSwitch;
        self.switch().map(|s| match s {
            LibinputSwitch::Lid => backend::Switch::Lid,
            LibinputSwitch::TabletMode => backend::Switch::TabletMode,
        })
    }

    fn state(&self) -> backend::SwitchState {
        match self.switch_state() {
            event::switch::SwitchState::Off => backend::SwitchState::Off,
            event::switch::SwitchState::On => backend::SwitchState::On,
        }
    }
}

impl InputBackend for LibinputInputBackend {
    type Device = libinput::Device;
    type KeyboardKeyEvent = event::keyboard::KeyboardKeyEvent;
    type PointerAxisEvent = event::pointer::PointerAxisEvent;
    type PointerButtonEvent = event::pointer::PointerButtonEvent;
    type PointerMotionEvent = event::pointer::PointerMotionEvent;
    type PointerMotionAbsoluteEvent = event::pointer::PointerMotionAbsoluteEvent;

    type GestureSwipeBeginEvent = event::gesture::GestureSwipeBeginEvent;
    type GestureSwipeUpdateEvent = event::gesture::GestureSwipeUpdateEvent;
    type GestureSwipeEndEvent = event::gesture::GestureSwipeEndEvent;
    type GesturePinchBeginEvent = event::gesture::GesturePinchBeginEvent;
    type GesturePinchUpdateEvent = event::gesture::GesturePinchUpdateEvent;
    type GesturePinchEndEvent = event::gesture::GesturePinchEndEvent;

    type TouchDownEvent = event::touch::TouchDownEvent;
    type TouchUpEvent = event::touch::TouchUpEvent;
    type TouchMotionEvent = event::touch::TouchMotionEvent;
    type TouchCancelEvent = event::touch::TouchCancelEvent;
    type TouchFrameEvent = event::touch::TouchFrameEvent;

    type TabletToolAxisEvent = event::tablet_tool::TabletToolAxisEvent;
    type TabletToolProximityEvent = event::tablet_tool::TabletToolProximityEvent;
    type TabletToolTipEvent = event::tablet_tool::TabletToolTipEvent;
    type TabletToolButtonEvent = event::tablet_tool::TabletToolButtonEvent;

    type TabletPadButtonEvent = event::tablet_pad::TabletPadButtonEvent;
    type TabletPadRingEvent = event::tablet_pad::TabletPadRingEvent;
    type TabletPadStripEvent = event::tablet_pad::TabletPadStripEvent;

    type SwitchToggleEvent = event::switch::SwitchToggleEvent;

    type SpecialEvent = backend::UnusedEvent;
}

impl From<event::keyboard::KeyState> for backend::KeyState {
    fn from(libinput: event::keyboard::KeyState) -> Self {
        match libinput {
            event::keyboard::KeyState::Pressed => backend::KeyState::Pressed,
            event::keyboard::KeyState::Released => backend::KeyState::Released,
        }
    }
}

impl From<event::pointer::Axis> for backend::Axis {
    fn from(libinput: event::pointer::Axis) -> Self {
        match libinput {
            event::pointer::Axis::Vertical => backend::Axis::Vertical,
            event::pointer::Axis::Horizontal => backend::Axis::Horizontal,
        }
    }
}

impl From<backend::Axis> for event::pointer::Axis {
    fn from(axis: backend::Axis) -> Self {
        match axis {
            backend::Axis::Vertical => event::pointer::Axis::Vertical,
            backend::Axis::Horizontal => event::pointer::Axis::Horizontal,
        }
    }
}

impl From<event::pointer::AxisSource> for backend::AxisSource {
    fn from(libinput: event::pointer::AxisSource) -> Self {
        match libinput {
            event::pointer::AxisSource::Finger => backend::AxisSource::Finger,
            event::pointer::AxisSource::Continuous => backend::AxisSource::Continuous,
            event::pointer::AxisSource::Wheel => backend::AxisSource::Wheel,
            event::pointer::AxisSource::WheelTilt => backend::AxisSource::WheelTilt,
        }
    }
}

impl From<event::pointer::ButtonState> for backend::ButtonState {
    fn from(libinput: event::pointer::ButtonState) -> Self {
        match libinput {
            event::pointer::ButtonState::Pressed => backend::ButtonState::Pressed,
            event::pointer::ButtonState::Released => backend::ButtonState::Released,
        }
    }
}

/// Adapts a [`DevicePermission`] capability to libinput's own
/// `libinput_interface` open/close contract.
#[cfg(feature = "backend_session")]
#[derive(Debug)]
pub struct LibinputDevicePermissionInterface<S: DevicePermission>(S);

#[cfg(feature = "backend_session")]
impl<S: DevicePermission> From<S> for LibinputDevicePermissionInterface<S> {
    fn from(permission: S) -> Self {
        LibinputDevicePermissionInterface(permission)
    }
}

#[cfg(feature = "backend_session")]
impl<S: DevicePermission> libinput::LibinputInterface for LibinputDevicePermissionInterface<S> {
    fn open_restricted(&mut self, path: &Path, flags: i32) -> Result<OwnedFd, i32> {
        self.0
            .open_restricted(path, flags)
            .map_err(|err| err.raw_os_error().unwrap_or(libc::EPERM))
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        self.0.close_restricted(fd);
        let _ = fd.into_raw_fd();
    }
}

impl AsRawFd for LibinputInputBackend {
    fn as_raw_fd(&self) -> RawFd {
        self.context.as_raw_fd()
    }
}

impl EventSource for LibinputInputBackend {
    type Event = InputEvent<LibinputInputBackend>;
    type Metadata = ();
    type Ret = ();
    type Error = io::Error;

    fn process_events<F>(&mut self, _: Readiness, token: Token, mut callback: F) -> io::Result<PostAction>
    where
        F: FnMut(Self::Event, &mut ()) -> Self::Ret,
    {
        if Some(token) != self.token {
            return Ok(PostAction::Continue);
        }

        self.context.dispatch()?;

        for libinput_event in &mut self.context {
            match libinput_event {
                libinput::Event::Device(device_event) => match device_event {
                    event::DeviceEvent::Added(added) => {
                        let device = event::EventTrait::device(&added);
                        trace!(target: "input", id = %device.sysname(), "device added");
                        callback(InputEvent::DeviceAdded { device }, &mut ());
                    }
                    event::DeviceEvent::Removed(removed) => {
                        let device = event::EventTrait::device(&removed);
                        trace!(target: "input", id = %device.sysname(), "device removed");
                        callback(InputEvent::DeviceRemoved { device }, &mut ());
                    }
                    _ => trace!(target: "input", "unhandled libinput device event"),
                },
                libinput::Event::Touch(touch_event) => match touch_event {
                    event::TouchEvent::Down(event) => {
                        callback(InputEvent::TouchDown { event }, &mut ());
                    }
                    event::TouchEvent::Motion(event) => {
                        callback(InputEvent::TouchMotion { event }, &mut ());
                    }
                    event::TouchEvent::Up(event) => {
                        callback(InputEvent::TouchUp { event }, &mut ());
                    }
                    event::TouchEvent::Cancel(event) => {
                        callback(InputEvent::TouchCancel { event }, &mut ());
                    }
                    event::TouchEvent::Frame(event) => {
                        callback(InputEvent::TouchFrame { event }, &mut ());
                    }
                    _ => trace!(target: "input", "unhandled libinput touch event"),
                },
                libinput::Event::Keyboard(event::KeyboardEvent::Key(event)) => {
                    callback(InputEvent::Keyboard { event }, &mut ());
                }
                libinput::Event::Keyboard(_) => trace!(target: "input", "unhandled libinput keyboard event"),
                libinput::Event::Pointer(pointer_event) => match pointer_event {
                    event::PointerEvent::Motion(event) => {
                        callback(InputEvent::PointerMotion { event }, &mut ());
                    }
                    event::PointerEvent::MotionAbsolute(event) => {
                        callback(InputEvent::PointerMotionAbsolute { event }, &mut ());
                    }
                    event::PointerEvent::Axis(event) => {
                        callback(InputEvent::PointerAxis { event }, &mut ());
                    }
                    event::PointerEvent::Button(event) => {
                        callback(InputEvent::PointerButton { event }, &mut ());
                    }
                    _ => trace!(target: "input", "unhandled libinput pointer event"),
                },
                libinput::Event::Gesture(gesture_event) => match gesture_event {
                    event::GestureEvent::Swipe(event::gesture::GestureSwipeEvent::Begin(event)) => {
                        callback(InputEvent::GestureSwipeBegin { event }, &mut ());
                    }
                    event::GestureEvent::Swipe(event::gesture::GestureSwipeEvent::Update(event)) => {
                        callback(InputEvent::GestureSwipeUpdate { event }, &mut ());
                    }
                    event::GestureEvent::Swipe(event::gesture::GestureSwipeEvent::End(event)) => {
                        callback(InputEvent::GestureSwipeEnd { event }, &mut ());
                    }
                    event::GestureEvent::Pinch(event::gesture::GesturePinchEvent::Begin(event)) => {
                        callback(InputEvent::GesturePinchBegin { event }, &mut ());
                    }
                    event::GestureEvent::Pinch(event::gesture::GesturePinchEvent::Update(event)) => {
                        callback(InputEvent::GesturePinchUpdate { event }, &mut ());
                    }
                    event::GestureEvent::Pinch(event::gesture::GesturePinchEvent::End(event)) => {
                        callback(InputEvent::GesturePinchEnd { event }, &mut ());
                    }
                    _ => trace!(target: "input", "unhandled libinput gesture event"),
                },
                libinput::Event::Tablet(tablet_event) => match tablet_event {
                    event::TabletToolEvent::Axis(event) => {
                        callback(InputEvent::TabletToolAxis { event }, &mut ());
                    }
                    event::TabletToolEvent::Proximity(event) => {
                        callback(InputEvent::TabletToolProximity { event }, &mut ());
                    }
                    event::TabletToolEvent::Tip(event) => {
                        callback(InputEvent::TabletToolTip { event }, &mut ());
                    }
                    event::TabletToolEvent::Button(event) => {
                        callback(InputEvent::TabletToolButton { event }, &mut ());
                    }
                    _ => trace!(target: "input", "unhandled libinput tablet tool event"),
                },
                libinput::Event::TabletPad(pad_event) => match pad_event {
                    event::TabletPadEvent::Button(event) => {
                        callback(InputEvent::TabletPadButton { event }, &mut ());
                    }
                    event::TabletPadEvent::Ring(event) => {
                        callback(InputEvent::TabletPadRing { event }, &mut ());
                    }
                    event::TabletPadEvent::Strip(event) => {
                        callback(InputEvent::TabletPadStrip { event }, &mut ());
                    }
                    _ => trace!(target: "input", "unhandled libinput tablet pad event"),
                },
                libinput::Event::Switch(event::SwitchEvent::Toggle(event)) => {
                    callback(InputEvent::SwitchToggle { event }, &mut ());
                }
                libinput::Event::Switch(_) => trace!(target: "input", "unhandled libinput switch event"),
                _ => trace!(target: "input", "unhandled libinput event category"),
            }
        }

        Ok(PostAction::Continue)
    }

    fn register(&mut self, poll: &mut Poll, factory: &mut TokenFactory) -> calloop::Result<()> {
        self.token = Some(factory.token());
        poll.register(self.as_raw_fd(), Interest::READ, Mode::Level, self.token.unwrap())
    }

    fn reregister(&mut self, poll: &mut Poll, factory: &mut TokenFactory) -> calloop::Result<()> {
        self.token = Some(factory.token());
        poll.reregister(self.as_raw_fd(), Interest::READ, Mode::Level, self.token.unwrap())
    }

    fn unregister(&mut self, poll: &mut Poll) -> calloop::Result<()> {
        self.token = None;
        poll.unregister(self.as_raw_fd())
    }
}
