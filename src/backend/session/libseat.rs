//! [`DevicePermission`] backed by `libseat`, for hosts that run under a
//! seat daemon instead of opening device nodes directly (§9 design note).
//!
//! `DevicePermission` has no VT-switch or session-lost surface to report
//! back through a `calloop::EventSource`, so there is no notifier half
//! here, just the active flag and the open/close bookkeeping.

use std::collections::HashMap;
use std::io;
use std::os::unix::io::{AsFd, AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use libseat::{Seat, SeatEvent};
use tracing::debug;

use super::DevicePermission;

/// Opens and closes device nodes through a libseat seat, tracking the
/// enable/disable state libseat reports instead of assuming the process
/// always owns its devices.
#[derive(Debug)]
pub struct LibseatDevicePermission {
    seat: Seat,
    active: Arc<AtomicBool>,
    devices: HashMap<RawFd, libseat::Device>,
}

impl LibseatDevicePermission {
    /// Opens a libseat seat, blocking on the initial dispatch so `is_active`
    /// reflects reality immediately rather than defaulting to `false` until
    /// the first poll.
    pub fn new() -> io::Result<Self> {
        let active = Arc::new(AtomicBool::new(false));
        let active_for_cb = active.clone();
        let mut seat = Seat::open(move |_seat, event| match event {
            SeatEvent::Enable => {
                debug!("libseat: seat enabled");
                active_for_cb.store(true, Ordering::SeqCst);
            }
            SeatEvent::Disable => {
                debug!("libseat: seat disabled");
                active_for_cb.store(false, Ordering::SeqCst);
            }
        })
        .map_err(|errno| io::Error::from_raw_os_error(errno.into()))?;

        // an Enable event is often already queued right after open
        seat.dispatch(0).map_err(|errno| io::Error::from_raw_os_error(errno.into()))?;

        Ok(LibseatDevicePermission {
            seat,
            active,
            devices: HashMap::new(),
        })
    }
}

impl DevicePermission for LibseatDevicePermission {
    fn open_restricted(&mut self, path: &Path, _flags: i32) -> io::Result<OwnedFd> {
        let device = self
            .seat
            .open_device(&path)
            .map_err(|errno| io::Error::from_raw_os_error(errno.into()))?;
        let raw_fd = device.as_fd().as_raw_fd();
        self.devices.insert(raw_fd, device);
        // SAFETY: libseat::Device does not close the fd on drop; we hand out
        // an OwnedFd and reclaim the libseat::Device on close_restricted.
        Ok(unsafe { OwnedFd::from_raw_fd(raw_fd) })
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        if let Some(device) = self.devices.remove(&fd.as_fd().as_raw_fd()) {
            if let Err(errno) = self.seat.close_device(device) {
                debug!(%errno, "libseat: close_device failed");
            }
        }
        // fd is closed on drop here
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
