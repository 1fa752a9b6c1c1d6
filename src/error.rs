//! Custom error types for type-safe error handling
//!
//! Structured error enums for the process-memory accessor, the typed value
//! parser and the instruction-table regenerator.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::system::DataType;

// ============================================================================
// Process Error
// ============================================================================

/// Errors that can occur while opening, accessing or closing a process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// OpenProcess failed; no handle was acquired
    OpenFailed {
        /// Target process identifier
        pid: u32,
        /// Win32 error code
        code: u32,
    },

    /// ReadProcessMemory failed
    ReadFailed {
        /// Address in the target process
        address: usize,
        /// Number of bytes requested
        size: usize,
        /// Win32 error code
        code: u32,
    },

    /// WriteProcessMemory failed
    WriteFailed {
        /// Address in the target process
        address: usize,
        /// Number of bytes requested
        size: usize,
        /// Win32 error code
        code: u32,
    },

    /// CloseHandle failed
    CloseFailed {
        /// Win32 error code
        code: u32,
    },

    /// Process memory access is only available on Windows
    Unsupported,
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::OpenFailed { pid, code } => {
                write!(f, "Failed to open process {} (error code: {})", pid, code)
            }
            ProcessError::ReadFailed { address, size, code } => {
                write!(
                    f,
                    "Failed to read {} bytes at 0x{:X} (error code: {})",
                    size, address, code
                )
            }
            ProcessError::WriteFailed { address, size, code } => {
                write!(
                    f,
                    "Failed to write {} bytes at 0x{:X} (error code: {})",
                    size, address, code
                )
            }
            ProcessError::CloseFailed { code } => {
                write!(f, "Failed to close process handle (error code: {})", code)
            }
            ProcessError::Unsupported => {
                write!(f, "Process memory access requires Windows")
            }
        }
    }
}

impl std::error::Error for ProcessError {}

// ============================================================================
// Value Error
// ============================================================================

/// Errors raised while turning user text into a typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The text is not a valid value of the requested type
    Invalid {
        data_type: DataType,
        input: String,
        reason: &'static str,
    },

    /// No data type goes by this name or tag
    UnknownType { name: String },
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueError::Invalid { data_type, input, reason } => {
                write!(f, "invalid {} value '{}': {}", data_type.name(), input, reason)
            }
            ValueError::UnknownType { name } => {
                write!(f, "unknown data type '{}'. Run 'types' for the list", name)
            }
        }
    }
}

impl std::error::Error for ValueError {}

// ============================================================================
// Regen Error
// ============================================================================

/// Errors from the instruction-table regenerator.
///
/// All of these are raised before the target file is written, so a failed
/// file is always left as it was.
#[derive(Debug)]
pub enum RegenError {
    /// Reading or persisting the file failed
    Io { path: PathBuf, source: io::Error },

    /// No `<ident>[] = {` table in the file
    TableNotFound { path: PathBuf, ident: String },

    /// The table holds no quoted instruction names
    EmptyTable { path: PathBuf },

    /// A marker comment line is missing
    MarkerNotFound { path: PathBuf, marker: String },

    /// The end marker comes before the begin marker
    MarkersOutOfOrder { path: PathBuf },
}

impl fmt::Display for RegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegenError::Io { path, source } => {
                write!(f, "{}: {}", path.display(), source)
            }
            RegenError::TableNotFound { path, ident } => {
                write!(f, "Cannot match instruction data '{}[]' in {}", ident, path.display())
            }
            RegenError::EmptyTable { path } => {
                write!(f, "Instruction table in {} has no names", path.display())
            }
            RegenError::MarkerNotFound { path, marker } => {
                write!(f, "Marker '{}' not found in {}", marker, path.display())
            }
            RegenError::MarkersOutOfOrder { path } => {
                write!(f, "End marker precedes begin marker in {}", path.display())
            }
        }
    }
}

impl std::error::Error for RegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegenError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ============================================================================
// Conversion helpers
// ============================================================================

impl From<ProcessError> for String {
    fn from(err: ProcessError) -> String {
        err.to_string()
    }
}

impl From<ValueError> for String {
    fn from(err: ValueError) -> String {
        err.to_string()
    }
}

impl From<RegenError> for String {
    fn from(err: RegenError) -> String {
        err.to_string()
    }
}

// ============================================================================
// Result type aliases
// ============================================================================

/// Result type for process operations
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Result type for value parsing
pub type ValueResult<T> = Result<T, ValueError>;

/// Result type for regenerator operations
pub type RegenResult<T> = Result<T, RegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_error_display() {
        let err = ProcessError::ReadFailed { address: 0x63DE0C, size: 8, code: 299 };
        assert_eq!(
            err.to_string(),
            "Failed to read 8 bytes at 0x63DE0C (error code: 299)"
        );
    }

    #[test]
    fn test_value_error_into_string() {
        let msg: String = ValueError::UnknownType { name: "quad".to_string() }.into();
        assert_eq!(msg, "unknown data type 'quad'. Run 'types' for the list");
    }

    #[test]
    fn test_regen_error_source() {
        use std::error::Error;

        let err = RegenError::Io {
            path: PathBuf::from("DefsX86X64.cpp"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.source().is_some());

        let err = RegenError::EmptyTable { path: PathBuf::from("a.cpp") };
        assert!(err.source().is_none());
    }
}
