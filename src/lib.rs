#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! # seatd-input: an input seat engine
//!
//! This crate ingests libinput-like raw device events and turns them into a
//! normalized, host-agnostic stream of pointer, keyboard, touch, tablet and
//! gesture events. It owns per-device bookkeeping, the keyboard and pointer
//! state machines, touch-slot tracking, scroll accumulation and the motion
//! pipeline; it does not touch rendering, a wire protocol, or window
//! management, all of which live behind a handful of host-provided traits
//! ([`seat::SeatHandler`], [`viewport::ViewportProvider`]).
//!
//! ## Structure of the crate
//!
//! [`backend`] defines the generic [`backend::input::InputBackend`] trait
//! family any raw event source implements, plus a concrete libinput-backed
//! implementation behind the `backend_libinput` feature. [`seat`] is the
//! central handle a host owns: it wraps the [`device`] registry, [`keyboard`]
//! state, [`touch`] slots, [`tablet`] tool table, [`scroll`] accumulators and
//! the [`motion`] pipeline, and exposes the host-facing control surface.
//! [`translator`] turns one raw event into zero or more [`event::Event`]s;
//! [`dispatch`] is the small amount of glue that runs the translator inside a
//! [`calloop`] event loop and wires the side-channel notifications (key
//! repeat, LED sync, touch-mode change) that live outside the event stream.
//!
//! ## General principles
//!
//! ### The event loop and state handling
//!
//! The engine is built around [`calloop`], a callback-oriented event loop: a
//! host registers an [`backend::input::InputBackend`]'s event source on its
//! own [`calloop::EventLoop`] and calls [`dispatch::dispatch`] once per raw
//! event, threading its own `&mut Seat` and [`seat::SeatHandler`] through. The
//! engine holds no global or thread-local state; every method here takes
//! `&mut Seat` explicitly.
//!
//! ### Logging
//!
//! The crate logs through [`tracing`]: `debug!`/`trace!` on the per-event hot
//! path, `warn!`/`error!` on invariant-violation and transient-error paths
//! (duplicate release, event from an unregistered device).

pub mod backend;
pub mod barrier;
pub mod constraint;
pub mod device;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod keyboard;
pub mod motion;
pub mod repeat;
pub mod scroll;
pub mod seat;
pub mod tablet;
pub mod touch;
pub mod translator;
pub mod utils;
pub mod viewport;
