//! System module - Typed values and process memory access
//!
//! The data model compiles everywhere; the accessor itself wraps Win32
//! calls and is only built on Windows.

mod data_type;
#[cfg(windows)]
mod memory;

pub use data_type::{parse_integer, DataType, Primitive, Value};
#[cfg(windows)]
pub use memory::ProcessMemory;
