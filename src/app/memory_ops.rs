//! Memory commands (read, write, demo)

use tracing::warn;

use super::cli::Target;
use crate::error::ProcessResult;
use crate::system::{DataType, Value};

#[cfg(windows)]
pub use self::imp::{demo, read, write};

#[cfg(not(windows))]
pub use self::unsupported::{demo, read, write};

/// Combines a command's outcome with the result of closing its handle.
///
/// The command's own error wins; a close failure is only reported when
/// the command itself succeeded.
#[cfg_attr(not(windows), allow(dead_code))]
fn with_close(outcome: Result<(), String>, closed: ProcessResult<()>) -> Result<(), String> {
    match (outcome, closed) {
        (Err(e), Err(close)) => {
            warn!(error = %close, "close failed after command error");
            Err(e)
        }
        (Ok(()), Err(close)) => Err(close.into()),
        (outcome, Ok(())) => outcome,
    }
}

#[cfg(windows)]
mod imp {
    use std::io;

    use tracing::info;

    use super::{with_close, DataType, Target, Value};
    use crate::constants::DEMO_WRITE_VALUE;
    use crate::error::ProcessError;
    use crate::system::ProcessMemory;
    use crate::ui;

    fn open(target: &Target) -> Result<ProcessMemory, String> {
        let memory = ProcessMemory::open_with_access(target.pid, target.access)?;
        info!(pid = target.pid, address = target.address, "process open");
        Ok(memory)
    }

    /// Reads one value of `data_type` and prints it.
    pub fn read(target: Target, data_type: DataType) -> Result<(), String> {
        let memory = open(&target)?;
        let mut stdout = io::stdout();

        let mut buffer = data_type.zeroed();
        let ok = memory.read_value(target.address, &mut buffer);
        let code = memory.last_error();
        print_rpm(&mut stdout, ok, code)?;

        if ok {
            ui::field_line(&mut stdout, data_type.name(), &buffer.to_string())
                .map_err(|e| e.to_string())?;
        }

        let outcome = if ok {
            Ok(())
        } else {
            Err(ProcessError::ReadFailed {
                address: target.address,
                size: data_type.size(),
                code,
            }
            .into())
        };
        with_close(outcome, memory.close())
    }

    /// Writes `value` and reports the outcome.
    pub fn write(target: Target, value: Value) -> Result<(), String> {
        let memory = open(&target)?;
        let mut stdout = io::stdout();

        let ok = memory.write_value(target.address, &value);
        let code = memory.last_error();
        print_wpm(&mut stdout, ok, code)?;

        let outcome = if ok {
            Ok(())
        } else {
            Err(ProcessError::WriteFailed {
                address: target.address,
                size: value.data_type().size(),
                code,
            }
            .into())
        };
        with_close(outcome, memory.close())
    }

    /// Reads a double at the target address, then writes a float there.
    ///
    /// The write is attempted even when the read fails.
    pub fn demo(target: Target) -> Result<(), String> {
        let memory = open(&target)?;
        let mut stdout = io::stdout();

        let mut buffer = DataType::Double.zeroed();
        let read_ok = memory.read_value(target.address, &mut buffer);
        let read_code = memory.last_error();
        print_rpm(&mut stdout, read_ok, read_code)?;
        ui::field_line(&mut stdout, "value", &buffer.to_string()).map_err(|e| e.to_string())?;

        let write_ok = memory.write_value(target.address, &Value::Float(DEMO_WRITE_VALUE));
        let write_code = memory.last_error();
        print_wpm(&mut stdout, write_ok, write_code)?;

        let outcome = if !read_ok {
            Err(ProcessError::ReadFailed {
                address: target.address,
                size: DataType::Double.size(),
                code: read_code,
            }
            .into())
        } else if !write_ok {
            Err(ProcessError::WriteFailed {
                address: target.address,
                size: DataType::Float.size(),
                code: write_code,
            }
            .into())
        } else {
            Ok(())
        };
        with_close(outcome, memory.close())
    }

    fn print_rpm(out: &mut io::Stdout, ok: bool, code: u32) -> Result<(), String> {
        ui::status_line(out, ok, &format!("RPM result: {} - err code: {}", ok, code))
            .map_err(|e| e.to_string())
    }

    fn print_wpm(out: &mut io::Stdout, ok: bool, code: u32) -> Result<(), String> {
        ui::status_line(out, ok, &format!("WPM result: {} - err code: {}", ok, code))
            .map_err(|e| e.to_string())
    }
}

#[cfg(not(windows))]
mod unsupported {
    use super::{DataType, Target, Value};
    use crate::error::ProcessError;

    pub fn read(_target: Target, _data_type: DataType) -> Result<(), String> {
        Err(ProcessError::Unsupported.into())
    }

    pub fn write(_target: Target, _value: Value) -> Result<(), String> {
        Err(ProcessError::Unsupported.into())
    }

    pub fn demo(_target: Target) -> Result<(), String> {
        Err(ProcessError::Unsupported.into())
    }
}
