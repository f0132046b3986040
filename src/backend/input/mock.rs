//! A minimal mock [`InputBackend`], used by unit tests elsewhere in the
//! crate (translator, dispatch, seat) and, behind the `test-util` feature,
//! by the crate-level scenario tests under `tests/` that need a concrete
//! backend to instantiate `Seat<B>` against without a real libinput fd.
//! Event kinds no test exercises are left as [`UnusedEvent`], which is
//! uninhabited and therefore impossible to construct by accident.

use super::*;

/// A fake physical device: just an id and a capability set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockDevice {
    id: String,
    capabilities: Vec<DeviceCapability>,
}

impl MockDevice {
    pub fn new(id: &str, capabilities: &[DeviceCapability]) -> Self {
        MockDevice {
            id: id.to_string(),
            capabilities: capabilities.to_vec(),
        }
    }
}

impl Device for MockDevice {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn has_capability(&self, capability: DeviceCapability) -> bool {
        self.capabilities.contains(&capability)
    }
}

/// The mock backend itself; a unit struct, since all state lives on the
/// events it names.
#[derive(Debug)]
pub struct MockBackend;

impl InputBackend for MockBackend {
    type Device = MockDevice;

    type KeyboardKeyEvent = MockKeyEvent;
    type PointerMotionEvent = MockMotionEvent;
    type PointerMotionAbsoluteEvent = MockAbsoluteEvent;
    type PointerButtonEvent = MockButtonEvent;
    type PointerAxisEvent = MockAxisEvent;

    type TouchDownEvent = MockTouchEvent;
    type TouchMotionEvent = MockTouchEvent;
    type TouchUpEvent = MockTouchEndEvent;
    type TouchCancelEvent = MockTouchEndEvent;
    type TouchFrameEvent = UnusedEvent;

    type TabletToolAxisEvent = UnusedEvent;
    type TabletToolProximityEvent = MockTabletProximityEvent;
    type TabletToolTipEvent = UnusedEvent;
    type TabletToolButtonEvent = UnusedEvent;

    type TabletPadButtonEvent = UnusedEvent;
    type TabletPadRingEvent = UnusedEvent;
    type TabletPadStripEvent = UnusedEvent;

    type GestureSwipeBeginEvent = UnusedEvent;
    type GestureSwipeUpdateEvent = UnusedEvent;
    type GestureSwipeEndEvent = UnusedEvent;
    type GesturePinchBeginEvent = UnusedEvent;
    type GesturePinchUpdateEvent = UnusedEvent;
    type GesturePinchEndEvent = UnusedEvent;

    type SwitchToggleEvent = MockSwitchEvent;

    type SpecialEvent = UnusedEvent;
}

#[derive(Debug, Clone)]
pub struct MockKeyEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub key_code: u32,
    pub state: KeyState,
    pub seat_key_count: u32,
}

impl Event<MockBackend> for MockKeyEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl KeyboardKeyEvent<MockBackend> for MockKeyEvent {
    fn key_code(&self) -> u32 {
        self.key_code
    }
    fn state(&self) -> KeyState {
        self.state
    }
    fn seat_key_count(&self) -> u32 {
        self.seat_key_count
    }
}

#[derive(Debug, Clone)]
pub struct MockMotionEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub dx: f64,
    pub dy: f64,
    pub dx_unaccel: f64,
    pub dy_unaccel: f64,
}

impl Event<MockBackend> for MockMotionEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl PointerMotionEvent<MockBackend> for MockMotionEvent {
    fn delta_x(&self) -> f64 {
        self.dx
    }
    fn delta_y(&self) -> f64 {
        self.dy
    }
    fn delta_x_unaccel(&self) -> f64 {
        self.dx_unaccel
    }
    fn delta_y_unaccel(&self) -> f64 {
        self.dy_unaccel
    }
}

#[derive(Debug, Clone)]
pub struct MockAbsoluteEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub x: f64,
    pub y: f64,
}

impl Event<MockBackend> for MockAbsoluteEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl AbsolutePositionEvent<MockBackend> for MockAbsoluteEvent {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn x_transformed(&self, width: i32) -> f64 {
        self.x * width as f64
    }
    fn y_transformed(&self, height: i32) -> f64 {
        self.y * height as f64
    }
}

impl PointerMotionAbsoluteEvent<MockBackend> for MockAbsoluteEvent {}

#[derive(Debug, Clone)]
pub struct MockButtonEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub button_code: u32,
    pub state: ButtonState,
    pub seat_button_count: u32,
}

impl Event<MockBackend> for MockButtonEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl PointerButtonEvent<MockBackend> for MockButtonEvent {
    fn button_code(&self) -> u32 {
        self.button_code
    }
    fn state(&self) -> ButtonState {
        self.state
    }
    fn seat_button_count(&self) -> u32 {
        self.seat_button_count
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockAxis {
    pub value: Option<f64>,
    pub discrete: Option<f64>,
    pub finished: bool,
}

#[derive(Debug, Clone)]
pub struct MockAxisEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub source: AxisSource,
    pub vertical: MockAxis,
    pub horizontal: MockAxis,
}

impl Event<MockBackend> for MockAxisEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl PointerAxisEvent<MockBackend> for MockAxisEvent {
    fn amount(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Vertical => self.vertical.value,
            Axis::Horizontal => self.horizontal.value,
        }
    }
    fn amount_discrete(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::Vertical => self.vertical.discrete,
            Axis::Horizontal => self.horizontal.discrete,
        }
    }
    fn source(&self) -> AxisSource {
        self.source
    }
    fn is_finished(&self, axis: Axis) -> bool {
        match axis {
            Axis::Vertical => self.vertical.finished,
            Axis::Horizontal => self.horizontal.finished,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockTouchEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub seat_slot: Option<i32>,
    pub x: f64,
    pub y: f64,
}

impl Event<MockBackend> for MockTouchEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl AbsolutePositionEvent<MockBackend> for MockTouchEvent {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn x_transformed(&self, width: i32) -> f64 {
        self.x * width as f64
    }
    fn y_transformed(&self, height: i32) -> f64 {
        self.y * height as f64
    }
}

impl TouchDownEvent<MockBackend> for MockTouchEvent {
    fn seat_slot(&self) -> Option<i32> {
        self.seat_slot
    }
}

impl TouchMotionEvent<MockBackend> for MockTouchEvent {
    fn seat_slot(&self) -> Option<i32> {
        self.seat_slot
    }
}

#[derive(Debug, Clone)]
pub struct MockTouchEndEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub seat_slot: Option<i32>,
}

impl Event<MockBackend> for MockTouchEndEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl TouchUpEvent<MockBackend> for MockTouchEndEvent {
    fn seat_slot(&self) -> Option<i32> {
        self.seat_slot
    }
}

impl TouchCancelEvent<MockBackend> for MockTouchEndEvent {
    fn seat_slot(&self) -> Option<i32> {
        self.seat_slot
    }
}

/// A fake tablet tool proximity event: positions a single descriptor-less
/// pen tool at `(x, y)` with no tilt/pressure/rotation/slider/wheel axes.
#[derive(Debug, Clone)]
pub struct MockTabletProximityEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub tool: super::tablet::TabletToolDescriptor,
    pub state: ProximityState,
    pub x: f64,
    pub y: f64,
}

impl Event<MockBackend> for MockTabletProximityEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl AbsolutePositionEvent<MockBackend> for MockTabletProximityEvent {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn x_transformed(&self, width: i32) -> f64 {
        self.x * width as f64
    }
    fn y_transformed(&self, height: i32) -> f64 {
        self.y * height as f64
    }
}

impl super::tablet::TabletToolEvent<MockBackend> for MockTabletProximityEvent {
    fn tool(&self) -> super::tablet::TabletToolDescriptor {
        self.tool.clone()
    }
    fn delta_x(&self) -> f64 {
        0.0
    }
    fn delta_y(&self) -> f64 {
        0.0
    }
    fn distance(&self) -> f64 {
        0.0
    }
    fn distance_has_changed(&self) -> bool {
        false
    }
    fn pressure(&self) -> f64 {
        0.0
    }
    fn pressure_has_changed(&self) -> bool {
        false
    }
    fn slider_position(&self) -> f64 {
        0.0
    }
    fn slider_has_changed(&self) -> bool {
        false
    }
    fn tilt_x(&self) -> f64 {
        0.0
    }
    fn tilt_x_has_changed(&self) -> bool {
        false
    }
    fn tilt_y(&self) -> f64 {
        0.0
    }
    fn tilt_y_has_changed(&self) -> bool {
        false
    }
    fn rotation(&self) -> f64 {
        0.0
    }
    fn rotation_has_changed(&self) -> bool {
        false
    }
    fn wheel_delta(&self) -> f64 {
        0.0
    }
    fn wheel_delta_discrete(&self) -> i32 {
        0
    }
    fn wheel_has_changed(&self) -> bool {
        false
    }
}

impl super::tablet::TabletToolProximityEvent<MockBackend> for MockTabletProximityEvent {
    fn state(&self) -> ProximityState {
        self.state
    }
}

#[derive(Debug, Clone)]
pub struct MockSwitchEvent {
    pub time_us: u64,
    pub device: MockDevice,
    pub switch: Option<Switch>,
    pub state: SwitchState,
}

impl Event<MockBackend> for MockSwitchEvent {
    fn time(&self) -> u64 {
        self.time_us
    }
    fn device(&self) -> MockDevice {
        self.device.clone()
    }
}

impl SwitchToggleEvent<MockBackend> for MockSwitchEvent {
    fn switch(&self) -> Option<Switch> {
        self.switch
    }
    fn state(&self) -> SwitchState {
        self.state
    }
}
