//! Keyboard state machine (C7): xkb state, LED sync, layout index,
//! modifier tracking, numlock toggle.
//!
//! Grounded on `input/keyboard/mod.rs`'s `Xkb`/`KbdInternal`/`LedMapping`/
//! `LedState`/`XkbConfig` shapes, stripped of the Wayland keymap-sharing
//! and grab machinery this engine has no use for (no client surface to
//! send a keymap fd to).

use std::fmt;

use thiserror::Error;
use tracing::{instrument, trace};
use xkbcommon::xkb;

pub use xkbcommon::xkb::{keysyms, Keycode, Keysym};

/// Configuration for xkbcommon (rules/model/layout/variant/options), or an
/// explicit keymap file path. Unset string fields fall back to the
/// `XKB_DEFAULT_*` environment variables, matching xkbcommon's own
/// defaulting (ambient-stack configuration layer, no bespoke config format
/// is invented beyond what xkbcommon itself reads).
#[derive(Clone, Debug, Default)]
pub struct XkbConfig<'a> {
    /// Rules file.
    pub rules: &'a str,
    /// Keyboard model.
    pub model: &'a str,
    /// Comma-separated layouts.
    pub layout: &'a str,
    /// Comma-separated variants, one per layout.
    pub variant: &'a str,
    /// Comma-separated layout options.
    pub options: Option<String>,
    /// Path to a keymap file, overriding rules/model/layout/variant/options.
    pub file: Option<String>,
}

impl<'a> XkbConfig<'a> {
    fn compile_keymap(&self, context: &xkb::Context) -> Result<xkb::Keymap, KeyboardError> {
        match &self.file {
            Some(f) => {
                let mut file = std::fs::File::open(f).map_err(|_| KeyboardError::BadKeymap)?;
                xkb::Keymap::new_from_file(
                    context,
                    &mut file,
                    xkb::KEYMAP_FORMAT_TEXT_V1,
                    xkb::KEYMAP_COMPILE_NO_FLAGS,
                )
                .ok_or(KeyboardError::BadKeymap)
            }
            None => xkb::Keymap::new_from_names(
                context,
                self.rules,
                self.model,
                self.layout,
                self.variant,
                self.options.clone(),
                xkb::KEYMAP_COMPILE_NO_FLAGS,
            )
            .ok_or(KeyboardError::BadKeymap),
        }
    }
}

/// Failure compiling or re-applying an xkb keymap.
#[derive(Debug, Error)]
pub enum KeyboardError {
    /// libxkbcommon could not compile the requested keymap.
    #[error("failed to compile xkb keymap")]
    BadKeymap,
}

/// Currently-active logical modifiers, and the raw serialized mask xkb
/// needs to restore state (data model §3 "Seat": modifier tracking).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModifiersState {
    /// Control key.
    pub ctrl: bool,
    /// Alt key.
    pub alt: bool,
    /// Shift key.
    pub shift: bool,
    /// Caps lock.
    pub caps_lock: bool,
    /// Logo ("super"/"windows") key.
    pub logo: bool,
    /// Num lock.
    pub num_lock: bool,
    /// Raw serialized mask, used to round-trip mod state across layout
    /// changes and numlock toggles without re-deriving it from booleans.
    pub serialized: SerializedMods,
}

/// Raw depressed/latched/locked modifier mask plus the locked layout index,
/// as xkb itself serializes it (used by `update_mask`/layout switching).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SerializedMods {
    /// Depressed (currently held) modifiers.
    pub depressed: u32,
    /// Latched modifiers.
    pub latched: u32,
    /// Locked modifiers.
    pub locked: u32,
    /// Locked layout index.
    pub layout_locked: u32,
}

impl ModifiersState {
    fn update_with(&mut self, state: &xkb::State) {
        self.ctrl = state.mod_name_is_active(&xkb::MOD_NAME_CTRL, xkb::STATE_MODS_EFFECTIVE);
        self.alt = state.mod_name_is_active(&xkb::MOD_NAME_ALT, xkb::STATE_MODS_EFFECTIVE);
        self.shift = state.mod_name_is_active(&xkb::MOD_NAME_SHIFT, xkb::STATE_MODS_EFFECTIVE);
        self.caps_lock = state.mod_name_is_active(&xkb::MOD_NAME_CAPS, xkb::STATE_MODS_EFFECTIVE);
        self.logo = state.mod_name_is_active(&xkb::MOD_NAME_LOGO, xkb::STATE_MODS_EFFECTIVE);
        self.num_lock = state.mod_name_is_active(&xkb::MOD_NAME_NUM, xkb::STATE_MODS_EFFECTIVE);
        self.serialized = SerializedMods {
            depressed: state.serialize_mods(xkb::STATE_MODS_DEPRESSED),
            latched: state.serialize_mods(xkb::STATE_MODS_LATCHED),
            locked: state.serialize_mods(xkb::STATE_MODS_LOCKED),
            layout_locked: state.serialize_layout(xkb::STATE_LAYOUT_LOCKED),
        };
    }
}

/// Mapping of a keymap's LED indices, resolved once per keymap compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LedMapping {
    num: Option<xkb::LedIndex>,
    caps: Option<xkb::LedIndex>,
    scroll: Option<xkb::LedIndex>,
}

impl LedMapping {
    fn from_keymap(keymap: &xkb::Keymap) -> Self {
        let lookup = |name: &str| match keymap.led_get_index(name) {
            xkb::LED_INVALID => None,
            index => Some(index),
        };
        LedMapping {
            num: lookup(xkb::LED_NAME_NUM),
            caps: lookup(xkb::LED_NAME_CAPS),
            scroll: lookup(xkb::LED_NAME_SCROLL),
        }
    }
}

/// Cached on/off state of the three standard keyboard LEDs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LedState {
    /// Num lock LED.
    pub num: Option<bool>,
    /// Caps lock LED.
    pub caps: Option<bool>,
    /// Scroll lock LED.
    pub scroll: Option<bool>,
}

impl LedState {
    fn update_with(&mut self, state: &xkb::State, mapping: &LedMapping) -> bool {
        let previous = *self;
        self.num = mapping.num.map(|idx| state.led_index_is_active(idx));
        self.caps = mapping.caps.map(|idx| state.led_index_is_active(idx));
        self.scroll = mapping.scroll.map(|idx| state.led_index_is_active(idx));
        *self != previous
    }
}

/// Which component(s) changed as a result of a key or mask update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeMask {
    /// Modifier state changed.
    pub mods: bool,
    /// LED state changed.
    pub leds: bool,
}

/// The keyboard state machine (C7): wraps an xkbcommon keymap/state,
/// tracks currently-pressed keys, modifiers, LEDs and the active layout.
pub struct KeyboardState {
    context: xkb::Context,
    keymap: xkb::Keymap,
    state: xkb::State,
    led_mapping: LedMapping,
    led_state: LedState,
    mods_state: ModifiersState,
    pressed: std::collections::HashSet<Keycode>,
}

// xkbcommon types are not `Send`/`Sync` by default binding, but per the
// engine's single-threaded model (spec §5) the keyboard never crosses
// threads; the wrapper as a whole is accessed only from the dispatch loop.
unsafe impl Send for KeyboardState {}

impl fmt::Debug for KeyboardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyboardState")
            .field("mods_state", &self.mods_state)
            .field("led_state", &self.led_state)
            .finish()
    }
}

impl KeyboardState {
    /// Compiles `xkb_config` into a fresh keymap and state.
    #[instrument(skip(xkb_config))]
    pub fn new(xkb_config: XkbConfig<'_>) -> Result<Self, KeyboardError> {
        let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
        let keymap = xkb_config.compile_keymap(&context)?;
        let state = xkb::State::new(&keymap);
        let led_mapping = LedMapping::from_keymap(&keymap);
        let mut led_state = LedState::default();
        led_state.update_with(&state, &led_mapping);
        let mut mods_state = ModifiersState::default();
        mods_state.update_with(&state);

        Ok(KeyboardState {
            context,
            keymap,
            state,
            led_mapping,
            led_state,
            mods_state,
            pressed: Default::default(),
        })
    }

    /// Replaces the active keymap, preserving no state: the new keymap's
    /// fresh `xkb::State` starts unmodified (used on [`Seat::reclaim`](crate::seat::Seat::reclaim)
    /// where the caller re-applies the prior latched/locked mask via
    /// [`Self::update_mask`] afterwards).
    #[instrument(skip(self, xkb_config))]
    pub fn set_keymap(&mut self, xkb_config: XkbConfig<'_>) -> Result<(), KeyboardError> {
        let keymap = xkb_config.compile_keymap(&self.context)?;
        self.state = xkb::State::new(&keymap);
        self.led_mapping = LedMapping::from_keymap(&keymap);
        self.keymap = keymap;
        self.pressed.clear();
        self.mods_state.update_with(&self.state);
        self.led_state.update_with(&self.state, &self.led_mapping);
        Ok(())
    }

    /// Current logical modifier state.
    pub fn modifiers(&self) -> ModifiersState {
        self.mods_state
    }

    /// Current LED state.
    pub fn led_state(&self) -> LedState {
        self.led_state
    }

    /// Number of distinct layouts in the current keymap.
    pub fn num_layouts(&self) -> u32 {
        self.keymap.num_layouts()
    }

    /// Currently-effective layout index.
    pub fn layout_index(&self) -> u32 {
        (0..self.keymap.num_layouts())
            .find(|&idx| {
                self.state
                    .layout_index_is_active(idx, xkb::ffi::XKB_STATE_LAYOUT_EFFECTIVE)
            })
            .unwrap_or(0)
    }

    /// Human-readable layout name.
    pub fn layout_name(&self, index: u32) -> &str {
        self.keymap.layout_get_name(index)
    }

    /// Whether `keycode` should auto-repeat per the active keymap (C8 "on
    /// key-down of a repeatable keycode"); modifier keys typically report
    /// `false`.
    pub fn key_repeats(&self, keycode: Keycode) -> bool {
        self.keymap.key_repeats(keycode)
    }

    /// Updates a single key's pressed state (C14's per-event entry point).
    /// Returns the [`ChangeMask`] of what changed. Synthetic
    /// `AUTOREPEAT`-sentinel firings must never call this (I8).
    pub fn update_key(&mut self, keycode: Keycode, pressed: bool) -> ChangeMask {
        let direction = if pressed {
            self.pressed.insert(keycode);
            xkb::KeyDirection::Down
        } else {
            self.pressed.remove(&keycode);
            xkb::KeyDirection::Up
        };

        let components = self.state.update_key(keycode, direction);
        let mods_changed = components != 0;
        if mods_changed {
            self.mods_state.update_with(&self.state);
        }
        let leds_changed = self.led_state.update_with(&self.state, &self.led_mapping);
        trace!(target: "input", ?keycode, pressed, mods_changed, leds_changed, "keyboard key update");
        ChangeMask { mods: mods_changed, leds: leds_changed }
    }

    /// Re-applies an explicit serialized modifier mask plus layout index,
    /// the shared primitive behind layout cycling and numlock toggling
    /// (§4.7/§4.12 "with_xkb_context").
    pub fn update_mask(&mut self, mods: SerializedMods, layout: u32) -> ChangeMask {
        let components = self
            .state
            .update_mask(mods.depressed, mods.latched, mods.locked, 0, 0, layout);
        let mods_changed = components != 0;
        if mods_changed {
            self.mods_state.update_with(&self.state);
        }
        let leds_changed = self.led_state.update_with(&self.state, &self.led_mapping);
        ChangeMask { mods: mods_changed, leds: leds_changed }
    }

    /// Switches to layout `index`, preserving the current depressed/
    /// latched/locked mask (R1: round-trips `layout_index`).
    pub fn set_layout_index(&mut self, index: u32) -> ChangeMask {
        let mods = self.mods_state.serialized;
        self.update_mask(mods, index)
    }

    /// Looks up a named LED's index in the current keymap.
    pub fn led_index(&self, name: &str) -> Option<xkb::LedIndex> {
        match self.keymap.led_get_index(name) {
            xkb::LED_INVALID => None,
            idx => Some(idx),
        }
    }

    /// Whether the LED at `index` is currently active.
    pub fn led_index_is_active(&self, index: xkb::LedIndex) -> bool {
        self.state.led_index_is_active(index)
    }

    /// Toggles numlock: computes Mod2's bit from the keymap, flips it in
    /// the locked mask, and re-applies the mask preserving layout (R3: a
    /// toggle-then-untoggle restores the locked mask exactly).
    pub fn toggle_numlock(&mut self) -> ChangeMask {
        let mod_index = self.keymap.mod_get_index(xkb::MOD_NAME_NUM);
        if mod_index == xkb::MOD_INVALID {
            return ChangeMask::default();
        }
        let bit = 1u32 << mod_index;
        let mut mods = self.mods_state.serialized;
        mods.locked ^= bit;
        let layout = self.layout_index();
        self.update_mask(mods, layout)
    }

    /// The serialized depressed/latched/locked mask plus locked layout, for
    /// saving/restoring state across a keymap replacement (§4.15 reclaim).
    pub fn serialized_mods(&self) -> SerializedMods {
        self.mods_state.serialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> XkbConfig<'static> {
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
    fn layout_index_roundtrips() {
        let mut kbd = KeyboardState::new(test_config()).unwrap();
        assert_eq!(kbd.layout_index(), 0);
        kbd.set_layout_index(0);
        assert_eq!(kbd.layout_index(), 0);
    }

    #[test]
    fn numlock_toggle_is_involutive() {
        let mut kbd = KeyboardState::new(test_config()).unwrap();
        let before = kbd.serialized_mods();
        kbd.toggle_numlock();
        kbd.toggle_numlock();
        let after = kbd.serialized_mods();
        assert_eq!(before, after);
    }

    #[test]
    fn update_key_tracks_pressed_state() {
        let mut kbd = KeyboardState::new(test_config()).unwrap();
        // Keycode 38 ('A' on a typical US layout, offset +8 per xkb convention).
        let _ = kbd.update_key(Keycode::from(38u32), true);
        assert!(kbd.pressed.contains(&Keycode::from(38u32)));
        let _ = kbd.update_key(Keycode::from(38u32), false);
        assert!(!kbd.pressed.contains(&Keycode::from(38u32)));
    }
}
