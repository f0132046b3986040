//! Error types for the input seat engine.
//!
//! Per the engine's error taxonomy, only *initialization* failures are
//! propagated as `Result`s; transient, invariant-violation, decode-miss and
//! stale-slot conditions are handled in place with a `tracing::warn!` and
//! never surface as an `Err` (see [`crate::seat`] and [`crate::device`]).

use thiserror::Error;

/// Failure constructing or initializing a [`Seat`](crate::seat::Seat).
#[derive(Debug, Error)]
pub enum SeatInitError {
    /// The xkb keymap could not be compiled from the given configuration.
    #[error("failed to compile xkb keymap")]
    BadKeymap,
    /// The underlying event source could not be created (e.g. libinput
    /// context creation, seat assignment failure).
    #[error("failed to initialize input event source: {0}")]
    EventSource(#[source] std::io::Error),
}

/// Failure updating the keyboard's keymap or layout at runtime.
#[derive(Debug, Error)]
pub enum KeyboardError {
    /// The replacement keymap failed to compile.
    #[error("failed to compile xkb keymap")]
    BadKeymap,
    /// xkbcommon internally failed to build a state machine for the keymap.
    #[error("failed to create xkb state")]
    BadState,
}

/// Reported by [`crate::seat::Seat::query_state`] when asked about a device
/// id that isn't registered, or a touch sequence with no live slot. Not a
/// taxonomy error class of its own — just the one fallible query in the
/// public surface.
#[derive(Debug, Error)]
#[error("no such device or sequence")]
pub struct NotFound;
