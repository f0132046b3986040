//! Key auto-repeat timer (C8).
//!
//! Grounded on the `calloop::timer::Timer` / `LoopHandle::insert_source` /
//! `TimeoutAction` idiom used for the idle-notify timeout in
//! `wayland/idle_notify/mod.rs`: register a one-shot timer for the initial
//! delay, then have the callback re-arm itself for the repeat interval by
//! returning `TimeoutAction::ToDuration` instead of `Drop`.

use std::time::Duration;

use calloop::timer::{TimeoutAction, Timer};
use calloop::{LoopHandle, RegistrationToken};

use crate::keyboard::Keycode;

/// Initial delay before the first repeated key event (I8 default).
pub const DEFAULT_REPEAT_DELAY: Duration = Duration::from_millis(250);
/// Interval between subsequent repeated key events (I8 default).
pub const DEFAULT_REPEAT_INTERVAL: Duration = Duration::from_millis(33);

/// Auto-repeat timing parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatConfig {
    /// Delay before the first repeat.
    pub delay: Duration,
    /// Delay between subsequent repeats.
    pub interval: Duration,
}

impl Default for RepeatConfig {
    fn default() -> Self {
        RepeatConfig {
            delay: DEFAULT_REPEAT_DELAY,
            interval: DEFAULT_REPEAT_INTERVAL,
        }
    }
}

/// The key currently being repeated, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingRepeat {
    keycode: Keycode,
    device_id: u32,
}

/// Owns the calloop timer token driving key auto-repeat for one keyboard.
///
/// A key-down on a repeatable key schedules a timer; any key-up, a
/// different key-down, or device removal cancels it (I8). The timer
/// re-arms itself on every fire until cancelled, rather than being
/// reinserted from the dispatch loop, mirroring the idle-notify timeout's
/// self-rearming pattern.
#[derive(Debug, Default)]
pub struct RepeatTimer {
    token: Option<RegistrationToken>,
    pending: Option<PendingRepeat>,
    config: RepeatConfig,
    enabled: bool,
}

impl RepeatTimer {
    /// Creates a disabled repeat timer with default timing.
    pub fn new() -> Self {
        RepeatTimer {
            token: None,
            pending: None,
            config: RepeatConfig::default(),
            enabled: false,
        }
    }

    /// Enables or disables auto-repeat; disabling cancels any pending timer.
    pub fn set_enabled<D: 'static>(&mut self, handle: &LoopHandle<'_, D>, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel(handle);
        }
    }

    /// Whether auto-repeat is currently enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Updates the delay/interval used for future repeat schedules.
    pub fn set_config(&mut self, config: RepeatConfig) {
        self.config = config;
    }

    /// The key currently scheduled to repeat, if any.
    pub fn pending(&self) -> Option<(Keycode, u32)> {
        self.pending.map(|p| (p.keycode, p.device_id))
    }

    /// Cancels any existing repeat and, if enabled, schedules a fresh one
    /// for `keycode` on `device_id`. `on_fire` is invoked on every repeat
    /// tick (C8's synthesized `Repeated` transition).
    pub fn schedule<D, F>(&mut self, handle: &LoopHandle<'_, D>, keycode: Keycode, device_id: u32, mut on_fire: F)
    where
        D: 'static,
        F: FnMut(Keycode, u32) + 'static,
    {
        self.cancel(handle);
        if !self.enabled {
            return;
        }

        self.pending = Some(PendingRepeat { keycode, device_id });
        let interval = self.config.interval;
        let inserted = handle.insert_source(Timer::from_duration(self.config.delay), move |_, _, _data| {
            on_fire(keycode, device_id);
            TimeoutAction::ToDuration(interval)
        });
        self.token = inserted.ok();
    }

    /// Cancels any pending repeat timer (key-up, other key-down, or device
    /// removal).
    pub fn cancel<D: 'static>(&mut self, handle: &LoopHandle<'_, D>) {
        if let Some(token) = self.token.take() {
            handle.remove(token);
        }
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = RepeatConfig::default();
        assert_eq!(config.delay, Duration::from_millis(250));
        assert_eq!(config.interval, Duration::from_millis(33));
    }

    #[test]
    fn disabled_timer_does_not_schedule() {
        let event_loop = calloop::EventLoop::<()>::try_new().unwrap();
        let handle = event_loop.handle();
        let mut timer = RepeatTimer::new();
        assert!(!timer.is_enabled());
        timer.schedule(&handle, Keycode::from(38u32), 0, |_, _| {});
        assert!(timer.pending().is_none());
    }

    #[test]
    fn enabling_and_scheduling_tracks_pending_key() {
        let event_loop = calloop::EventLoop::<()>::try_new().unwrap();
        let handle = event_loop.handle();
        let mut timer = RepeatTimer::new();
        timer.set_enabled(&handle, true);
        timer.schedule(&handle, Keycode::from(38u32), 1, |_, _| {});
        assert_eq!(timer.pending(), Some((Keycode::from(38u32), 1)));

        timer.cancel(&handle);
        assert!(timer.pending().is_none());
    }
}
