//! Packed instruction-name table
//!
//! Unique names are laid out back to back, each followed by one NUL, and
//! addressed by byte offset. The table also renders itself as the C++
//! text that replaces the generated region.

use std::collections::HashMap;
use std::fmt::Write;

use super::config::RegenConfig;

/// Unique instruction names in first-occurrence order, with their offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionTable {
    names: Vec<String>,
    offsets: HashMap<String, usize>,
    packed_len: usize,
}

impl InstructionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from names in source order; later duplicates are dropped.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for name in names {
            table.insert(name.as_ref());
        }
        table
    }

    /// Adds `name` if unseen and returns its offset.
    pub fn insert(&mut self, name: &str) -> usize {
        if let Some(&offset) = self.offsets.get(name) {
            return offset;
        }

        let offset = self.packed_len;
        self.names.push(name.to_string());
        self.offsets.insert(name.to_string(), offset);
        self.packed_len += name.len() + 1;
        offset
    }

    /// Byte offset of `name` in the packed blob
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        self.offsets.get(name).copied()
    }

    /// Number of unique names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Size of the packed blob in bytes, terminators included
    pub fn packed_len(&self) -> usize {
        self.packed_len
    }

    /// Names and offsets in blob order
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.names.iter().map(|name| (name.as_str(), self.offsets[name]))
    }

    /// The packed blob itself: every name followed by a NUL
    pub fn packed(&self) -> String {
        let mut blob = String::with_capacity(self.packed_len);
        for name in &self.names {
            blob.push_str(name);
            blob.push('\0');
        }
        blob
    }

    /// Renders the string constant and the offset symbols.
    ///
    /// ```text
    /// const char instructionName[] =
    ///   "adc\0"
    ///   "add\0"
    ///   ;
    ///
    /// #define INST_ADC_INDEX 0
    /// #define INST_ADD_INDEX 4
    /// ```
    pub fn render(&self, config: &RegenConfig, newline: &str) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = write!(out, "const char {}[] ={}", config.blob_name, newline);
        for name in &self.names {
            let _ = write!(out, "  \"{}\\0\"{}", name, newline);
        }
        let _ = write!(out, "  ;{}{}", newline, newline);

        for (name, offset) in self.entries() {
            let _ = write!(out, "#define {} {}{}", config.symbol_for(name), offset, newline);
        }

        out
    }
}
