//! Safe RAII wrapper for a Windows process HANDLE
//!
//! The handle is closed exactly once: either explicitly through
//! `ProcessHandle::close`, which consumes the wrapper, or when it goes
//! out of scope.

use std::mem::ManuallyDrop;

use tracing::{trace, warn};
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Threading::{OpenProcess, PROCESS_ACCESS_RIGHTS};

/// A safe wrapper around a Windows process HANDLE.
/// Automatically closes the handle when dropped.
#[derive(Debug)]
pub struct ProcessHandle(HANDLE);

impl ProcessHandle {
    /// Opens a process by PID with the specified access mask.
    ///
    /// # Arguments
    /// * `pid` - The process identifier
    /// * `access` - The raw access-rights bitmask requested for the handle
    ///
    /// # Returns
    /// * `Ok(ProcessHandle)` - A wrapped handle to the process
    /// * `Err` - If the process cannot be opened (access denied, process exited, etc.)
    ///
    /// A NULL handle from OpenProcess is always reported as `Err`, so an
    /// `Ok` handle is never invalid.
    pub fn open(pid: u32, access: u32) -> windows::core::Result<Self> {
        // SAFETY: OpenProcess is safe to call with any parameters; failure
        // is reported through the Result.
        let handle = unsafe { OpenProcess(PROCESS_ACCESS_RIGHTS(access), false, pid)? };
        trace!(pid, access, handle = ?handle.0, "OpenProcess");
        Ok(Self(handle))
    }

    /// Returns the raw HANDLE for use with Win32 APIs.
    ///
    /// The borrow ties the raw value to this wrapper, so it cannot be used
    /// once the handle has been closed.
    pub fn as_raw(&self) -> HANDLE {
        self.0
    }

    /// Closes the handle now and reports whether CloseHandle succeeded.
    pub fn close(self) -> windows::core::Result<()> {
        let this = ManuallyDrop::new(self);
        trace!(handle = ?this.0 .0, "CloseHandle");
        // SAFETY: We own this handle and Drop will not run for it.
        unsafe { CloseHandle(this.0) }
    }
}

impl Drop for ProcessHandle {
    fn drop(&mut self) {
        trace!(handle = ?self.0 .0, "CloseHandle on drop");
        // SAFETY: We own this handle and it's valid (we got it from OpenProcess).
        // CloseHandle is safe to call on a valid handle exactly once.
        if let Err(e) = unsafe { CloseHandle(self.0) } {
            warn!(error = %e, "CloseHandle failed");
        }
    }
}
