//! FFI module - Safe wrappers around Win32 handles and error codes
//!
//! This module provides the RAII wrapper for process handles, ensuring
//! CloseHandle runs when a handle goes out of scope, plus helpers for
//! turning windows-crate errors back into plain Win32 error codes.

mod handles;

pub use handles::ProcessHandle;

use windows::Win32::Foundation::{GetLastError, SetLastError, WIN32_ERROR};

/// HRESULT facility bits used by HRESULT_FROM_WIN32
const FACILITY_WIN32_MASK: u32 = 0x8007_0000;

/// Extracts the Win32 error code from a windows-crate error.
///
/// Errors built from GetLastError are wrapped as `0x8007xxxx` HRESULTs;
/// those are unwrapped back to `xxxx`. Any other HRESULT is returned as is.
pub fn win32_code(err: &windows::core::Error) -> u32 {
    let hr = err.code().0 as u32;
    if hr & 0xFFFF_0000 == FACILITY_WIN32_MASK {
        hr & 0xFFFF
    } else {
        hr
    }
}

/// Returns the calling thread's last Win32 error code.
pub fn last_error() -> u32 {
    // SAFETY: GetLastError only reads thread-local state.
    unsafe { GetLastError().0 }
}

/// Overwrites the calling thread's last Win32 error code.
pub fn set_last_error(code: u32) {
    // SAFETY: SetLastError only writes thread-local state.
    unsafe { SetLastError(WIN32_ERROR(code)) }
}
