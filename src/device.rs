//! Device identity and bookkeeping: the id pool (C1) and the device
//! registry (C9).
//!
//! Grounded on the id-allocation idiom in `utils/ids.rs` (ascending
//! allocation with a free-list), generalized from a process-wide singleton
//! to a value owned by the seat, and on `input/mod.rs`'s device-list
//! shape, narrowed to this engine's own (non-Wayland) `Device`.

use tracing::{trace, warn};

use crate::backend::input::{self as backend, Device as _, DeviceCapability};

/// First id handed out by [`DeviceIdPool`]; 0 and 1 are reserved by
/// convention for the logical pointer and keyboard leaders.
pub const INITIAL_DEVICE_ID: u32 = 2;

const GROW_STEP: u32 = 10;

/// Ascending small-integer id allocator for devices (C1).
///
/// Ids are stable for a device's lifetime; `release` reinserts the id into
/// an ordered free-list so reallocation stays deterministic.
#[derive(Debug)]
pub struct DeviceIdPool {
    next: u32,
    free: Vec<u32>,
}

impl Default for DeviceIdPool {
    fn default() -> Self {
        DeviceIdPool {
            next: INITIAL_DEVICE_ID,
            free: Vec::new(),
        }
    }
}

impl DeviceIdPool {
    /// Creates a pool that starts handing out ids at [`INITIAL_DEVICE_ID`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id, preferring the free-list, growing by
    /// [`GROW_STEP`] when it runs dry.
    pub fn allocate(&mut self) -> u32 {
        if self.free.is_empty() {
            let base = self.next;
            self.free.extend(base..base + GROW_STEP);
            self.next = base + GROW_STEP;
        }
        self.free.remove(0)
    }

    /// Returns `id` to the free-list, keeping it sorted ascending.
    pub fn release(&mut self, id: u32) {
        let pos = self.free.binary_search(&id).unwrap_or_else(|pos| pos);
        if self.free.get(pos) == Some(&id) {
            warn!(target: "input", id, "double release of device id");
            return;
        }
        self.free.insert(pos, id);
    }
}

/// Mutually-exclusive device type classification (data model §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Generic pointer (mouse, trackball).
    Pointer,
    /// Keyboard.
    Keyboard,
    /// Unclassified extension device.
    Extension,
    /// Joystick / gamepad.
    Joystick,
    /// Tablet pad (buttons/rings/strips).
    Tablet,
    /// Touchpad.
    Touchpad,
    /// Touchscreen.
    Touchscreen,
    /// Tablet pen tool.
    Pen,
    /// Tablet eraser tool.
    Eraser,
    /// Tablet cursor/puck tool.
    Cursor,
    /// Tablet pad controls.
    Pad,
}

impl DeviceType {
    /// Whether this device is a tablet or one of its tool classifications,
    /// selecting the "tablet device" branch of the button-number mapping
    /// table (§4.14).
    pub fn is_tablet(self) -> bool {
        matches!(
            self,
            DeviceType::Tablet | DeviceType::Pen | DeviceType::Eraser | DeviceType::Cursor | DeviceType::Pad
        )
    }
}

/// Whether a device is a concrete hardware device or a virtual aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// A concrete hardware input device surfaced by the OS.
    Physical,
    /// A virtual aggregator representing the merged state of physical siblings.
    Logical,
}

/// A single input device known to the seat (data model §3 "Device").
#[derive(Debug)]
pub struct Device<B: backend::InputBackend> {
    id: u32,
    device_type: DeviceType,
    mode: InputMode,
    /// For physical keyboards/pointers: the logical device id they feed.
    /// Always `None` for logical devices and non-pointer/keyboard physical
    /// devices.
    leader: Option<u32>,
    handle: Option<B::Device>,
    /// For tablets: the tool currently in proximity, if any.
    current_tool: Option<crate::tablet::TabletTool>,
    /// For tablets: whether axis events map absolutely or relatively
    /// (§4.10, §4.14). Unused by non-tablet devices.
    mapping_mode: crate::tablet::MappingMode,
}

impl<B: backend::InputBackend> Device<B> {
    pub(crate) fn new_logical(id: u32, device_type: DeviceType) -> Self {
        Device {
            id,
            device_type,
            mode: InputMode::Logical,
            leader: None,
            handle: None,
            current_tool: None,
            mapping_mode: crate::tablet::MappingMode::default(),
        }
    }

    pub(crate) fn new_physical(
        id: u32,
        device_type: DeviceType,
        leader: Option<u32>,
        handle: B::Device,
    ) -> Self {
        Device {
            id,
            device_type,
            mode: InputMode::Physical,
            leader,
            handle: Some(handle),
            current_tool: None,
            mapping_mode: crate::tablet::MappingMode::default(),
        }
    }

    /// Stable small-integer id of this device.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// This device's type.
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Whether this is a physical or logical device.
    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// The logical device this physical device feeds, if any.
    pub fn leader(&self) -> Option<u32> {
        self.leader
    }

    /// The backend handle for a physical device.
    pub fn handle(&self) -> Option<&B::Device> {
        self.handle.as_ref()
    }

    /// Currently in-proximity tool, for tablet devices.
    pub fn current_tool(&self) -> Option<&crate::tablet::TabletTool> {
        self.current_tool.as_ref()
    }

    pub(crate) fn set_current_tool(&mut self, tool: Option<crate::tablet::TabletTool>) {
        self.current_tool = tool;
    }

    /// This tablet device's configured mapping mode.
    pub fn mapping_mode(&self) -> crate::tablet::MappingMode {
        self.mapping_mode
    }

    /// Sets this tablet device's mapping mode.
    pub fn set_mapping_mode(&mut self, mode: crate::tablet::MappingMode) {
        self.mapping_mode = mode;
    }

    /// Classifies a raw backend device by its reported capabilities,
    /// preferring the most specific match.
    pub(crate) fn classify(handle: &B::Device) -> DeviceType {
        if handle.has_capability(DeviceCapability::TabletPad) {
            DeviceType::Tablet
        } else if handle.has_capability(DeviceCapability::TabletTool) {
            DeviceType::Pen
        } else if handle.has_capability(DeviceCapability::Touch) {
            DeviceType::Touchscreen
        } else if handle.has_capability(DeviceCapability::Gesture) {
            DeviceType::Touchpad
        } else if handle.has_capability(DeviceCapability::Keyboard) {
            DeviceType::Keyboard
        } else if handle.has_capability(DeviceCapability::Pointer) {
            DeviceType::Pointer
        } else {
            DeviceType::Extension
        }
    }
}

/// Ordered device list plus cached presence flags feeding C11 (C9).
///
/// Touchscreen presence is recomputed from the typed device list on every
/// add/remove. Switch presence is tracked by id set instead, since a
/// tablet-mode switch is a raw-capability device rather than a
/// [`DeviceType`] of its own.
#[derive(Debug)]
pub struct DeviceRegistry<B: backend::InputBackend> {
    ids: DeviceIdPool,
    devices: Vec<Device<B>>,
    switch_ids: Vec<u32>,
    has_touchscreen: bool,
}

impl<B: backend::InputBackend> Default for DeviceRegistry<B> {
    fn default() -> Self {
        DeviceRegistry {
            ids: DeviceIdPool::new(),
            devices: Vec::new(),
            switch_ids: Vec::new(),
            has_touchscreen: false,
        }
    }
}

impl<B: backend::InputBackend> DeviceRegistry<B> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// All known devices, in add order.
    pub fn devices(&self) -> &[Device<B>] {
        &self.devices
    }

    /// Whether any live device is a touchscreen.
    pub fn has_touchscreen(&self) -> bool {
        self.has_touchscreen
    }

    /// Whether any live device is a tablet-mode switch.
    pub fn has_tablet_switch(&self) -> bool {
        !self.switch_ids.is_empty()
    }

    fn recompute_touchscreen(&mut self) {
        self.has_touchscreen = self
            .devices
            .iter()
            .any(|d| d.device_type == DeviceType::Touchscreen);
    }

    /// Adds a physical device. Returns the assigned id and whether the
    /// touchscreen/switch presence flags changed (the caller re-runs touch
    /// mode inference, C11, when this is true).
    pub fn add(
        &mut self,
        handle: B::Device,
        logical_pointer_id: u32,
        logical_keyboard_id: u32,
    ) -> (u32, bool) {
        let id = self.ids.allocate();
        let device_type = Device::<B>::classify(&handle);
        let leader = match device_type {
            DeviceType::Keyboard => Some(logical_keyboard_id),
            DeviceType::Pointer | DeviceType::Touchpad => Some(logical_pointer_id),
            _ => None,
        };

        let had_touchscreen = self.has_touchscreen;
        let had_switch = self.has_tablet_switch();

        if handle.has_capability(DeviceCapability::Switch) {
            self.switch_ids.push(id);
        }
        self.devices.push(Device::new_physical(id, device_type, leader, handle));
        self.recompute_touchscreen();

        trace!(target: "input", id, ?device_type, "device added");
        (id, had_touchscreen != self.has_touchscreen || had_switch != self.has_tablet_switch())
    }

    /// Removes the device with the given id, if present. Returns the
    /// removed device and whether the touchscreen/switch presence flags
    /// changed.
    pub fn remove(&mut self, id: u32) -> Option<(Device<B>, bool)> {
        let pos = self.devices.iter().position(|d| d.id == id)?;
        let device = self.devices.remove(pos);
        self.ids.release(id);

        let had_touchscreen = self.has_touchscreen;
        let had_switch = self.has_tablet_switch();
        self.switch_ids.retain(|&sid| sid != id);
        self.recompute_touchscreen();

        trace!(target: "input", id, "device removed");
        Some((device, had_touchscreen != self.has_touchscreen || had_switch != self.has_tablet_switch()))
    }

    /// Iterates over the physical devices feeding the given logical device.
    pub fn devices_for_logical(&self, logical_id: u32) -> impl Iterator<Item = &Device<B>> {
        self.devices.iter().filter(move |d| d.leader == Some(logical_id))
    }

    /// Allocates an id without registering a device, for a caller that will
    /// immediately follow up with [`Self::push_logical`].
    pub(crate) fn ids_allocate(&mut self) -> u32 {
        self.ids.allocate()
    }

    /// Registers a purely logical (non-physical) device under a
    /// previously-allocated id.
    pub(crate) fn push_logical(&mut self, id: u32, device_type: DeviceType) {
        self.devices.push(Device::new_logical(id, device_type));
    }

    /// Finds a device by id.
    pub fn get(&self, id: u32) -> Option<&Device<B>> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// Finds the id assigned to the physical device matching `raw`'s
    /// backend identity, used by the translator to resolve a raw event's
    /// device handle back to a seat-assigned id.
    pub fn find_id_by_raw(&self, raw: &B::Device) -> Option<u32> {
        self.devices
            .iter()
            .find(|d| d.handle.as_ref().map(|h| h.id()) == Some(raw.id()))
            .map(|d| d.id)
    }

    /// Finds a device by id, mutably.
    pub fn get_mut(&mut self, id: u32) -> Option<&mut Device<B>> {
        self.devices.iter_mut().find(|d| d.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_ascending_from_initial() {
        let mut pool = DeviceIdPool::new();
        assert_eq!(pool.allocate(), INITIAL_DEVICE_ID);
        assert_eq!(pool.allocate(), INITIAL_DEVICE_ID + 1);
    }

    #[test]
    fn release_then_reallocate_is_deterministic() {
        let mut pool = DeviceIdPool::new();
        let a = pool.allocate();
        let _b = pool.allocate();
        pool.release(a);
        assert_eq!(pool.allocate(), a);
    }

    #[test]
    fn grows_when_free_list_exhausted() {
        let mut pool = DeviceIdPool::new();
        let ids: Vec<_> = (0..15).map(|_| pool.allocate()).collect();
        assert_eq!(ids.len(), 15);
        assert_eq!(ids[0], INITIAL_DEVICE_ID);
        // strictly ascending, no duplicates
        for w in ids.windows(2) {
            assert!(w[0] < w[1]);
        }
    }
}
