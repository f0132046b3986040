//! Tablet tool bookkeeping, axis vector assembly and button/pressure
//! remapping (C10).
//!
//! Grounded on `backend::input::tablet`'s `TabletToolDescriptor`/
//! `TabletToolCapabilities`/`TabletToolEvent` shape; this module owns the
//! per-tool cache and the translation from that raw per-axis API into a
//! dense, capability-ordered vector plus an owned button remap table (§9
//! design note: "owned tables", not host-supplied).

use std::collections::HashMap;

use crate::backend::input::tablet::{TabletToolCapabilities, TabletToolDescriptor, TabletToolType};

/// How a tablet device's absolute axes are translated into stage
/// coordinates (§4.14 tablet tool AXIS). MOUSE and LENS tools always
/// behave as `Relative` regardless of this setting (§4.10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MappingMode {
    /// The tool's absolute x,y map directly onto a target viewport.
    #[default]
    Absolute,
    /// The tool's per-event x,y delta is applied like relative pointer
    /// motion instead.
    Relative,
}

/// One axis slot in the dense per-event axis vector, in the fixed order
/// the translator assembles ([`assemble_axes`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabletAxis {
    /// Absolute x, in stage coordinates (always present).
    X,
    /// Absolute y, in stage coordinates (always present).
    Y,
    /// Distance from the surface.
    Distance,
    /// Normalized pressure.
    Pressure,
    /// Tilt along x, in degrees.
    TiltX,
    /// Tilt along y, in degrees.
    TiltY,
    /// Z rotation, in degrees.
    Rotation,
    /// Slider position.
    Slider,
    /// Wheel delta, in degrees.
    Wheel,
}

/// One entry in the dense axis vector: which axis, its value, and whether
/// this event actually changed it (vs. carrying forward the last value).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisValue {
    /// Which axis.
    pub axis: TabletAxis,
    /// Current value.
    pub value: f64,
    /// Whether this event changed the axis (vs. unchanged since the last one).
    pub changed: bool,
}

/// Builds the dense, capability-ordered axis vector for one tool-axis
/// event. X and Y are always included; the remaining axes are included
/// only when `caps` reports the tool supports them, in the fixed order
/// distance, pressure, tilt-x, tilt-y, rotation, slider, wheel.
pub fn assemble_axes(
    caps: TabletToolCapabilities,
    x: (f64, bool),
    y: (f64, bool),
    distance: (f64, bool),
    pressure: (f64, bool),
    tilt: ((f64, bool), (f64, bool)),
    rotation: (f64, bool),
    slider: (f64, bool),
    wheel: (f64, bool),
) -> Vec<AxisValue> {
    let mut axes = Vec::with_capacity(9);
    axes.push(AxisValue { axis: TabletAxis::X, value: x.0, changed: x.1 });
    axes.push(AxisValue { axis: TabletAxis::Y, value: y.0, changed: y.1 });
    if caps.contains(TabletToolCapabilities::DISTANCE) {
        axes.push(AxisValue { axis: TabletAxis::Distance, value: distance.0, changed: distance.1 });
    }
    if caps.contains(TabletToolCapabilities::PRESSURE) {
        axes.push(AxisValue { axis: TabletAxis::Pressure, value: pressure.0, changed: pressure.1 });
    }
    if caps.contains(TabletToolCapabilities::TILT) {
        axes.push(AxisValue { axis: TabletAxis::TiltX, value: tilt.0 .0, changed: tilt.0 .1 });
        axes.push(AxisValue { axis: TabletAxis::TiltY, value: tilt.1 .0, changed: tilt.1 .1 });
    }
    if caps.contains(TabletToolCapabilities::ROTATION) {
        axes.push(AxisValue { axis: TabletAxis::Rotation, value: rotation.0, changed: rotation.1 });
    }
    if caps.contains(TabletToolCapabilities::SLIDER) {
        axes.push(AxisValue { axis: TabletAxis::Slider, value: slider.0, changed: slider.1 });
    }
    if caps.contains(TabletToolCapabilities::WHEEL) {
        axes.push(AxisValue { axis: TabletAxis::Wheel, value: wheel.0, changed: wheel.1 });
    }
    axes
}

/// A piecewise-linear pressure response curve: a sorted list of (input,
/// output) control points in `[0, 1]`, linearly interpolated between. An
/// empty curve is the identity.
#[derive(Debug, Clone)]
pub struct PressureCurve {
    points: Vec<(f64, f64)>,
}

impl Default for PressureCurve {
    fn default() -> Self {
        PressureCurve { points: Vec::new() }
    }
}

impl PressureCurve {
    /// Builds a curve from control points; sorts them by input value.
    /// Out-of-range inputs (`<0` or `>1`) are clamped.
    pub fn new(mut points: Vec<(f64, f64)>) -> Self {
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
        PressureCurve { points }
    }

    /// Maps a raw normalized pressure value through the curve.
    pub fn apply(&self, raw: f64) -> f64 {
        let raw = raw.clamp(0.0, 1.0);
        if self.points.is_empty() {
            return raw;
        }
        if raw <= self.points[0].0 {
            return self.points[0].1;
        }
        if let Some(&(_, last_y)) = self.points.last() {
            if raw >= self.points.last().unwrap().0 {
                return last_y;
            }
        }
        for pair in self.points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if raw >= x0 && raw <= x1 {
                if (x1 - x0).abs() < f64::EPSILON {
                    return y0;
                }
                let t = (raw - x0) / (x1 - x0);
                return y0 + t * (y1 - y0);
            }
        }
        raw
    }
}

/// A logical, cached tablet tool (C10), identified by the (serial, type)
/// pair libinput reports on every proximity-in, so repeated proximity
/// events for the same physical tool resolve to the same `TabletTool`.
#[derive(Debug, Clone)]
pub struct TabletTool {
    descriptor: TabletToolDescriptor,
    pressure_curve: PressureCurve,
    button_remap: HashMap<u32, u32>,
    in_proximity: bool,
}

impl TabletTool {
    /// Creates a tool entry for `descriptor` with an identity pressure
    /// curve and an empty button remap table.
    pub fn new(descriptor: TabletToolDescriptor) -> Self {
        TabletTool {
            descriptor,
            pressure_curve: PressureCurve::default(),
            button_remap: HashMap::new(),
            in_proximity: false,
        }
    }

    /// The tool's hardware descriptor.
    pub fn descriptor(&self) -> &TabletToolDescriptor {
        &self.descriptor
    }

    /// The tool's high-level type.
    pub fn tool_type(&self) -> TabletToolType {
        self.descriptor.tool_type
    }

    /// Whether the tool is currently considered in proximity.
    pub fn in_proximity(&self) -> bool {
        self.in_proximity
    }

    /// Marks the tool as having entered proximity.
    pub fn set_in_proximity(&mut self) {
        self.in_proximity = true;
    }

    /// Marks the tool as having left proximity; callers must clear any
    /// cached `current_tool` pointer on the owning device after this so a
    /// further proximity-in recreates or re-looks-up the descriptor.
    pub fn clear_proximity(&mut self) {
        self.in_proximity = false;
    }

    /// Installs a pressure response curve for this tool.
    pub fn set_pressure_curve(&mut self, curve: PressureCurve) {
        self.pressure_curve = curve;
    }

    /// Maps a raw pressure sample through the tool's curve.
    pub fn map_pressure(&self, raw: f64) -> f64 {
        self.pressure_curve.apply(raw)
    }

    /// Installs a raw-button -> logical-button remap table.
    pub fn set_button_remap(&mut self, remap: HashMap<u32, u32>) {
        self.button_remap = remap;
    }

    /// Maps a raw evdev button code through this tool's remap table,
    /// falling back to the raw code when unmapped.
    pub fn map_button(&self, raw: u32) -> u32 {
        self.button_remap.get(&raw).copied().unwrap_or(raw)
    }
}

/// Cache of known tools, keyed by their `(serial, type)` pair, so
/// proximity-in events resolve to a stable [`TabletTool`] across the
/// lifetime of the tablet device (C10).
#[derive(Debug, Default)]
pub struct TabletToolRegistry {
    tools: HashMap<(u64, TabletToolKey), TabletTool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum TabletToolKey {
    Pen,
    Eraser,
    Brush,
    Pencil,
    Airbrush,
    Mouse,
    Lens,
    Totem,
    Unknown,
}

impl From<TabletToolType> for TabletToolKey {
    fn from(t: TabletToolType) -> Self {
        match t {
            TabletToolType::Pen => TabletToolKey::Pen,
            TabletToolType::Eraser => TabletToolKey::Eraser,
            TabletToolType::Brush => TabletToolKey::Brush,
            TabletToolType::Pencil => TabletToolKey::Pencil,
            TabletToolType::Airbrush => TabletToolKey::Airbrush,
            TabletToolType::Mouse => TabletToolKey::Mouse,
            TabletToolType::Lens => TabletToolKey::Lens,
            TabletToolType::Totem => TabletToolKey::Totem,
            TabletToolType::Unknown => TabletToolKey::Unknown,
        }
    }
}

impl TabletToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up (creating if absent) the tool for `descriptor`, returning
    /// a stable key to refer to it by along with a mutable reference.
    pub fn get_or_create(&mut self, descriptor: TabletToolDescriptor) -> &mut TabletTool {
        let key = (descriptor.hardware_serial, TabletToolKey::from(descriptor.tool_type));
        self.tools.entry(key).or_insert_with(|| TabletTool::new(descriptor))
    }

    /// Looks up a tool without creating it.
    pub fn get(&self, serial: u64, tool_type: TabletToolType) -> Option<&TabletTool> {
        self.tools.get(&(serial, TabletToolKey::from(tool_type)))
    }

    /// Removes a tool entirely (e.g. on device removal).
    pub fn remove(&mut self, serial: u64, tool_type: TabletToolType) -> Option<TabletTool> {
        self.tools.remove(&(serial, TabletToolKey::from(tool_type)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(serial: u64) -> TabletToolDescriptor {
        TabletToolDescriptor {
            tool_type: TabletToolType::Pen,
            hardware_serial: serial,
            hardware_id_wacom: 0,
            capabilities: TabletToolCapabilities::PRESSURE | TabletToolCapabilities::TILT,
        }
    }

    #[test]
    fn registry_returns_same_tool_for_repeated_proximity() {
        let mut registry = TabletToolRegistry::new();
        let first_ptr = registry.get_or_create(descriptor(42)) as *const _;
        let second_ptr = registry.get_or_create(descriptor(42)) as *const _;
        assert_eq!(first_ptr, second_ptr);
    }

    #[test]
    fn pressure_curve_interpolates_linearly() {
        let curve = PressureCurve::new(vec![(0.0, 0.0), (0.5, 0.8), (1.0, 1.0)]);
        assert!((curve.apply(0.25) - 0.4).abs() < 1e-9);
        assert_eq!(curve.apply(0.0), 0.0);
        assert_eq!(curve.apply(1.0), 1.0);
    }

    #[test]
    fn button_remap_falls_back_to_raw_code() {
        let mut tool = TabletTool::new(descriptor(1));
        let mut remap = HashMap::new();
        remap.insert(331, 1);
        tool.set_button_remap(remap);
        assert_eq!(tool.map_button(331), 1);
        assert_eq!(tool.map_button(999), 999);
    }

    #[test]
    fn assemble_axes_includes_only_capable_axes() {
        let caps = TabletToolCapabilities::PRESSURE;
        let axes = assemble_axes(
            caps,
            (1.0, true),
            (2.0, true),
            (0.0, false),
            (0.5, true),
            ((0.0, false), (0.0, false)),
            (0.0, false),
            (0.0, false),
            (0.0, false),
        );
        assert_eq!(axes.len(), 3);
        assert_eq!(axes[2].axis, TabletAxis::Pressure);
    }
}
