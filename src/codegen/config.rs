//! Regenerator settings

use crate::constants::{
    BEGIN_MARKER, DEFAULT_BLOB_NAME, DEFAULT_SYMBOL_PREFIX, DEFAULT_SYMBOL_SUFFIX,
    DEFAULT_TABLE_IDENT, END_MARKER,
};

/// Names and markers the regenerator looks for and emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenConfig {
    /// Identifier of the `<ident>[] = { ... }` table to read names from
    pub table_ident: String,
    /// Name of the emitted `const char <blob>[]` constant
    pub blob_name: String,
    /// Prepended to every offset symbol
    pub symbol_prefix: String,
    /// Appended to every offset symbol
    pub symbol_suffix: String,
    /// Comment line after which generated text starts
    pub begin_marker: String,
    /// Comment line before which generated text ends
    pub end_marker: String,
}

impl Default for RegenConfig {
    fn default() -> Self {
        Self {
            table_ident: DEFAULT_TABLE_IDENT.to_string(),
            blob_name: DEFAULT_BLOB_NAME.to_string(),
            symbol_prefix: DEFAULT_SYMBOL_PREFIX.to_string(),
            symbol_suffix: DEFAULT_SYMBOL_SUFFIX.to_string(),
            begin_marker: BEGIN_MARKER.to_string(),
            end_marker: END_MARKER.to_string(),
        }
    }
}

impl RegenConfig {
    /// Offset symbol for an instruction name.
    ///
    /// `"lock cmpxchg"` becomes `INST_LOCK_CMPXCHG_INDEX` with the defaults.
    pub fn symbol_for(&self, name: &str) -> String {
        format!(
            "{}{}{}",
            self.symbol_prefix,
            name.to_uppercase().replace(' ', "_"),
            self.symbol_suffix
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_for() {
        let config = RegenConfig::default();
        assert_eq!(config.symbol_for("mov"), "INST_MOV_INDEX");
        assert_eq!(config.symbol_for("lock cmpxchg"), "INST_LOCK_CMPXCHG_INDEX");
        assert_eq!(config.symbol_for("amd_prefetch"), "INST_AMD_PREFETCH_INDEX");
    }
}
