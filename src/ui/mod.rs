//! Terminal output
//!
//! Command results go to stdout as coloured status lines; errors go to
//! stderr. Diagnostics are logged through `tracing` instead.

mod report;

pub use report::{error_line, field_line, regen_line, status_line, types_table};
