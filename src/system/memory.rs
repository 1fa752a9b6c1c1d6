//! Typed access to another process's memory
//!
//! `ProcessMemory` owns one process handle for its lifetime and forwards
//! reads and writes to ReadProcessMemory / WriteProcessMemory, sizing each
//! call from the value's data type.

use std::ffi::c_void;

use tracing::{debug, trace, warn};
use windows::Win32::System::Diagnostics::Debug::{ReadProcessMemory, WriteProcessMemory};

use crate::constants::DEFAULT_ACCESS_MASK;
use crate::error::{ProcessError, ProcessResult};
use crate::ffi::{self, ProcessHandle};

use super::data_type::{Primitive, Value};

/// An open process whose memory can be read and written.
#[derive(Debug)]
pub struct ProcessMemory {
    pid: u32,
    access: u32,
    handle: ProcessHandle,
}

impl ProcessMemory {
    /// Opens `pid` with the default access mask (`0x001F0FFF`).
    pub fn open(pid: u32) -> ProcessResult<Self> {
        Self::open_with_access(pid, DEFAULT_ACCESS_MASK)
    }

    /// Opens `pid` requesting exactly `access`.
    ///
    /// # Returns
    /// * `Ok(ProcessMemory)` - The process is open and usable
    /// * `Err(ProcessError::OpenFailed)` - OpenProcess failed; nothing is held
    pub fn open_with_access(pid: u32, access: u32) -> ProcessResult<Self> {
        let handle = ProcessHandle::open(pid, access).map_err(|e| {
            let code = ffi::win32_code(&e);
            warn!(pid, access, code, "failed to open process");
            ProcessError::OpenFailed { pid, code }
        })?;

        debug!(pid, access, "opened process");
        Ok(Self { pid, access, handle })
    }

    /// Process identifier this accessor was opened for
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Access mask the handle was requested with
    pub fn access(&self) -> u32 {
        self.access
    }

    /// Reads `buffer.len()` bytes at `address` into `buffer`.
    ///
    /// Returns false on failure; `last_error` then holds the reason.
    pub fn read_bytes(&self, address: usize, buffer: &mut [u8]) -> bool {
        self.read_into(address, buffer).is_ok()
    }

    /// Writes `data` at `address`.
    ///
    /// Returns false on failure; `last_error` then holds the reason.
    pub fn write_bytes(&self, address: usize, data: &[u8]) -> bool {
        self.write_from(address, data).is_ok()
    }

    /// Reads a value of `buffer`'s type at `address` into `buffer`.
    ///
    /// The byte count is the size of the buffer's data type. On failure the
    /// buffer is left untouched and false is returned.
    pub fn read_value(&self, address: usize, buffer: &mut Value) -> bool {
        self.fill(address, buffer).is_ok()
    }

    /// Writes `value` at `address`, sized by its data type.
    pub fn write_value(&self, address: usize, value: &Value) -> bool {
        self.write_from(address, &value.to_ne_bytes()).is_ok()
    }

    /// Reads a `T` at `address`.
    pub fn read<T: Primitive>(&self, address: usize) -> ProcessResult<T> {
        let size = T::DATA_TYPE.size();
        let mut buffer = T::DATA_TYPE.zeroed();
        self.fill(address, &mut buffer)
            .map_err(|code| ProcessError::ReadFailed { address, size, code })?;
        T::from_value(buffer).ok_or(ProcessError::ReadFailed { address, size, code: 0 })
    }

    /// Writes `value` as a `T` at `address`.
    pub fn write<T: Primitive>(&self, address: usize, value: T) -> ProcessResult<()> {
        let size = T::DATA_TYPE.size();
        self.write_from(address, &value.into_value().to_ne_bytes())
            .map_err(|code| ProcessError::WriteFailed { address, size, code })
    }

    /// The OS's most recent error code for the calling thread.
    pub fn last_error(&self) -> u32 {
        ffi::last_error()
    }

    /// Releases the process handle.
    ///
    /// Consuming `self` rules out any use after release. Dropping the
    /// accessor releases the handle as well; `close` only adds the result.
    pub fn close(self) -> ProcessResult<()> {
        let pid = self.pid;
        self.handle.close().map_err(|e| ProcessError::CloseFailed {
            code: ffi::win32_code(&e),
        })?;
        debug!(pid, "closed process");
        Ok(())
    }

    fn fill(&self, address: usize, buffer: &mut Value) -> Result<(), u32> {
        let data_type = buffer.data_type();
        let mut bytes = vec![0u8; data_type.size()];
        self.read_into(address, &mut bytes)?;

        if let Some(value) = Value::from_ne_bytes(data_type, &bytes) {
            *buffer = value;
        }
        Ok(())
    }

    fn read_into(&self, address: usize, buffer: &mut [u8]) -> Result<(), u32> {
        let mut transferred = 0usize;
        // SAFETY: the handle is open for as long as `self` lives and the
        // destination is a live, writable buffer of exactly `buffer.len()` bytes.
        let result = unsafe {
            ReadProcessMemory(
                self.handle.as_raw(),
                address as *const c_void,
                buffer.as_mut_ptr() as *mut c_void,
                buffer.len(),
                Some(&mut transferred as *mut usize),
            )
        };

        match result {
            Ok(()) => {
                trace!(pid = self.pid, address, size = buffer.len(), transferred, "read");
                Ok(())
            }
            Err(e) => {
                let code = ffi::win32_code(&e);
                warn!(pid = self.pid, address, size = buffer.len(), code, "ReadProcessMemory failed");
                // logging may have touched the thread's error slot
                ffi::set_last_error(code);
                Err(code)
            }
        }
    }

    fn write_from(&self, address: usize, data: &[u8]) -> Result<(), u32> {
        let mut transferred = 0usize;
        // SAFETY: the handle is open for as long as `self` lives and the
        // source is a live buffer of exactly `data.len()` bytes.
        let result = unsafe {
            WriteProcessMemory(
                self.handle.as_raw(),
                address as *const c_void,
                data.as_ptr() as *const c_void,
                data.len(),
                Some(&mut transferred as *mut usize),
            )
        };

        match result {
            Ok(()) => {
                trace!(pid = self.pid, address, size = data.len(), transferred, "write");
                Ok(())
            }
            Err(e) => {
                let code = ffi::win32_code(&e);
                warn!(pid = self.pid, address, size = data.len(), code, "WriteProcessMemory failed");
                ffi::set_last_error(code);
                Err(code)
            }
        }
    }
}
