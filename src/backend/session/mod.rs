//! Device-permission capability (§9 design note: "Global callbacks for
//! device open/close... an explicit `DevicePermission` capability passed
//! into the engine constructor").
//!
//! Grounded on two real-world shapes: libinput's own `libinput_interface`
//! (`open_restricted`/`close_restricted`, which the `input` crate surfaces
//! as [`input::LibinputInterface`] when the `backend_libinput` feature is
//! enabled) and smithay's session `open`/`close`/`is_active` trait. Rather
//! than a process-wide singleton callback pair, the capability is an object
//! the caller constructs once and hands to [`crate::seat::Seat::new`].

use std::io;
use std::os::unix::io::OwnedFd;
use std::path::Path;

#[cfg(feature = "backend_session_libseat")]
pub mod libseat;
#[cfg(feature = "backend_session_libseat")]
pub use self::libseat::LibseatDevicePermission;

/// Delegates device-open permission decisions to the host (logind, direct
/// root access, a test double, ...), replacing a pair of global callbacks.
pub trait DevicePermission: std::fmt::Debug {
    /// Open the device node at `path` with the given raw open flags
    /// (`O_RDWR`, `O_NONBLOCK`, as defined by the libinput interface
    /// contract), returning an owned fd on success.
    fn open_restricted(&mut self, path: &Path, flags: i32) -> io::Result<OwnedFd>;

    /// Close a previously opened device fd.
    fn close_restricted(&mut self, fd: OwnedFd);

    /// Whether this session currently owns its devices (`false` while
    /// released for a VT switch).
    fn is_active(&self) -> bool;
}

/// The trivial [`DevicePermission`] that opens device nodes directly via
/// `open(2)`, appropriate when the process already has the required
/// privileges (root, or a udev `uaccess` tag).
#[derive(Debug, Default)]
pub struct DirectDevicePermission {
    active: bool,
}

impl DirectDevicePermission {
    /// Construct a new, active direct-open permission source.
    pub fn new() -> Self {
        DirectDevicePermission { active: true }
    }
}

impl DevicePermission for DirectDevicePermission {
    fn open_restricted(&mut self, path: &Path, flags: i32) -> io::Result<OwnedFd> {
        use std::os::unix::io::FromRawFd;
        let cpath = std::ffi::CString::new(path.as_os_str().as_encoded_bytes())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let fd = unsafe { libc::open(cpath.as_ptr(), flags) };
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(unsafe { OwnedFd::from_raw_fd(fd) })
    }

    fn close_restricted(&mut self, fd: OwnedFd) {
        drop(fd);
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_permission_starts_active() {
        let perm = DirectDevicePermission::new();
        assert!(perm.is_active());
    }
}
