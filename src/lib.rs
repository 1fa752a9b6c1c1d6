//! procmem
//!
//! Typed reads and writes into another Windows process's memory, plus a
//! regenerator that packs an assembler's instruction-name table into one
//! string constant addressed by offset symbols.
//!
//! The data model and the regenerator are portable; the process accessor
//! and its Win32 plumbing only build on Windows.

pub mod app;
pub mod codegen;
pub mod constants;
pub mod error;
#[cfg(windows)]
pub mod ffi;
pub mod logging;
pub mod system;
pub mod ui;
