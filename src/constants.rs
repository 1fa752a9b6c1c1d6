//! Centralized constants for the application
//!
//! This module contains the defaults and fixed strings used throughout
//! the application, making them easy to find and modify.

// ============================================================================
// Application Info
// ============================================================================

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// Application version from Cargo.toml
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding an explicit log filter
pub const LOG_ENV_VAR: &str = "PROCMEM_LOG";

// ============================================================================
// Process Access
// ============================================================================

/// STANDARD_RIGHTS_REQUIRED
pub const STANDARD_RIGHTS_REQUIRED: u32 = 0x000F_0000;

/// SYNCHRONIZE
pub const SYNCHRONIZE: u32 = 0x0010_0000;

/// Default access mask requested by `ProcessMemory::open`
/// (the pre-Vista PROCESS_ALL_ACCESS value)
pub const DEFAULT_ACCESS_MASK: u32 = STANDARD_RIGHTS_REQUIRED | SYNCHRONIZE | 0xFFF;

// ============================================================================
// Demo
// ============================================================================

/// Value written by the `demo` command
pub const DEMO_WRITE_VALUE: f32 = 1.5;

// ============================================================================
// Instruction Table Regeneration
// ============================================================================

/// File processed when `regen` is given no paths
pub const DEFAULT_REGEN_FILE: &str = "DefsX86X64.cpp";

/// Identifier of the instruction description table
pub const DEFAULT_TABLE_IDENT: &str = "instructionDescription";

/// Name of the emitted packed string constant
pub const DEFAULT_BLOB_NAME: &str = "instructionName";

/// Prefix of each emitted offset symbol
pub const DEFAULT_SYMBOL_PREFIX: &str = "INST_";

/// Suffix of each emitted offset symbol
pub const DEFAULT_SYMBOL_SUFFIX: &str = "_INDEX";

/// Comment line opening the generated region
pub const BEGIN_MARKER: &str = "// ${INSTRUCTION_DATA_BEGIN}";

/// Comment line closing the generated region
pub const END_MARKER: &str = "// ${INSTRUCTION_DATA_END}";
